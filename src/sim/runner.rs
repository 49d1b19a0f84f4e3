use nalgebra::Vector2;
use tracing::{debug, trace, warn};

use super::integrator::{dp5_step, error_scale, initial_step, rms_norm, ERROR_ORDER};
use super::trace::{Sample, Trace};
use crate::dynamics;
use crate::dynamics::state::{SimConfig, State};
use crate::error::{SimError, SimResult};
use crate::physics::Constants;
use crate::vehicle::VehicleParams;

// ---------------------------------------------------------------------------
// Step-size controller
// ---------------------------------------------------------------------------

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 10.0;

fn grow_factor(err_norm: f64) -> f64 {
    if err_norm == 0.0 {
        MAX_FACTOR
    } else {
        (SAFETY * err_norm.powf(-1.0 / (ERROR_ORDER + 1) as f64)).min(MAX_FACTOR)
    }
}

fn shrink_factor(err_norm: f64) -> f64 {
    if err_norm.is_finite() {
        (SAFETY * err_norm.powf(-1.0 / (ERROR_ORDER + 1) as f64)).max(MIN_FACTOR)
    } else {
        MIN_FACTOR
    }
}

// ---------------------------------------------------------------------------
// Full acceleration run
// ---------------------------------------------------------------------------

/// Integrate the vehicle from `config.initial` at t = 0 to `config.horizon_s`.
///
/// Output times are solver-chosen and strictly increasing; the first sample
/// is the initial state at t = 0 and the last sits exactly on the horizon.
/// A step size collapse or an exhausted step budget is an error, never a
/// shortened trace.
pub fn simulate(vehicle: &VehicleParams, config: &SimConfig, consts: &Constants) -> SimResult<Trace> {
    vehicle.validate()?;

    let init = config.initial;
    if !init.is_finite() || init.vel <= 0.0 {
        return Err(SimError::SingularState { velocity: init.vel });
    }
    if !config.horizon_s.is_finite() || config.horizon_s <= 0.0 {
        return Err(SimError::InvalidParameter { what: "horizon_s", value: config.horizon_s });
    }

    let rhs = |t: f64, y: &Vector2<f64>| {
        dynamics::derivative(t, &State::from_vector(y), vehicle, consts).to_vector()
    };

    let t_end = config.horizon_s;
    let mut t = 0.0;
    let mut y = init.to_vector();
    let mut f = rhs(t, &y);
    let mut h = initial_step(&rhs, t, &y, &f, t_end, config.rtol, config.atol);

    debug!(
        power_kw = vehicle.power_kw,
        cda_m2 = vehicle.cda_m2,
        mass_kg = vehicle.mass_kg,
        horizon_s = t_end,
        h0 = h,
        "starting acceleration run"
    );

    let mut trajectory = Trace::with_capacity(64);
    trajectory.push(Sample { time: t, state: init });

    let mut steps = 0usize;
    let mut rejections = 0usize;

    while t < t_end {
        if steps >= config.max_steps {
            warn!(t, steps, "step budget exhausted");
            return Err(SimError::ConvergenceFailed {
                time: t,
                step: h,
                reason: "step budget exhausted",
            });
        }
        steps += 1;

        let min_step = config.min_step.max(10.0 * f64::EPSILON * t.abs());
        let mut step_rejected = false;

        // Retry the step with shrinking h until the error is acceptable.
        let (t_new, accepted) = loop {
            if h < min_step {
                warn!(t, h, "step size collapsed");
                return Err(SimError::ConvergenceFailed {
                    time: t,
                    step: h,
                    reason: "step size fell below minimum",
                });
            }

            let last = h >= t_end - t;
            let h_try = if last { t_end - t } else { h };
            let t_new = if last { t_end } else { t + h_try };

            let step = dp5_step(&rhs, t, &y, &f, h_try);
            let err_norm = if step.is_finite() && step.y.y > 0.0 {
                let scale = error_scale(&y, &step.y, config.rtol, config.atol);
                rms_norm(&step.err, &scale)
            } else {
                f64::INFINITY
            };

            if err_norm < 1.0 {
                let mut factor = grow_factor(err_norm);
                if step_rejected {
                    factor = factor.min(1.0);
                }
                h = h_try * factor;
                break (t_new, step);
            }

            trace!(t, h = h_try, err_norm, "step rejected");
            rejections += 1;
            step_rejected = true;
            h = h_try * shrink_factor(err_norm);
        };

        t = t_new;
        y = accepted.y;
        f = accepted.f;
        trajectory.push(Sample { time: t, state: State::from_vector(&y) });
    }

    debug!(
        samples = trajectory.len(),
        steps,
        rejections,
        final_speed_ms = y.y,
        "acceleration run finished"
    );

    Ok(trajectory)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
