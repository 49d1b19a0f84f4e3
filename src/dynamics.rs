pub mod state;

use crate::physics::aerodynamics::{drag_force, traction_force};
use crate::physics::Constants;
use crate::vehicle::VehicleParams;

use state::{Deriv, State};

// ---------------------------------------------------------------------------
// Equations of motion (1DOF, constant power)
// ---------------------------------------------------------------------------

/// Compute the state derivative at `time`.
///
/// Forces modeled:
///   1. Traction - constant power, `P / v`
///   2. Drag     - quadratic, `1/2 rho CdA v^2`
///
/// The model is time-invariant; `time` is accepted so the signature matches
/// a general `f(t, y)` right-hand side.
///
/// Precondition: `state.vel != 0`. Traction is singular at standstill and is
/// not guarded here; the runner refuses such initial states.
pub fn derivative(_time: f64, state: &State, vehicle: &VehicleParams, consts: &Constants) -> Deriv {
    let v = state.vel;
    let f_traction = traction_force(vehicle.power_kw * consts.kw_to_w, v);
    let f_drag = drag_force(v, consts.air_density, vehicle.cda_m2);

    Deriv {
        dpos: v,
        dvel: (f_traction - f_drag) / vehicle.mass_kg,
    }
}

/// Speed where traction balances drag, in m/s.
///
/// `P = 1/2 rho CdA v^3`, so `v = cbrt(P / (1/2 rho CdA))`. Independent of mass.
pub fn terminal_speed_ms(vehicle: &VehicleParams, consts: &Constants) -> f64 {
    (vehicle.power_kw * consts.kw_to_w / (0.5 * vehicle.cda_m2 * consts.air_density)).cbrt()
}

/// Top speed in display units (km/h).
pub fn terminal_speed(vehicle: &VehicleParams, consts: &Constants) -> f64 {
    consts.to_display(terminal_speed_ms(vehicle, consts))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vehicle::presets;
    use proptest::prelude::*;

    #[test]
    fn derivative_at_rolling_start() {
        let v = presets::reference();
        let d = derivative(0.0, &State::new(0.0, 10.0), &v, &Constants::default());
        assert!((d.dpos - 10.0).abs() < 1e-12);
        assert!((d.dvel - 49.8375).abs() < 1e-9, "got {}", d.dvel);
    }

    #[test]
    fn derivative_ignores_time_and_position() {
        let v = presets::reference();
        let c = Constants::default();
        let a = derivative(0.0, &State::new(0.0, 25.0), &v, &c);
        let b = derivative(7.5, &State::new(123.0, 25.0), &v, &c);
        assert_eq!(a, b);
    }

    #[test]
    fn top_speed_reference_value() {
        let v = presets::reference();
        let top = terminal_speed(&v, &Constants::default());
        assert!((top - 243.038_297_224_498_9).abs() < 1e-9, "got {}", top);
    }

    #[test]
    fn acceleration_vanishes_at_terminal_speed() {
        let v = presets::reference();
        let c = Constants::default();
        let vt = terminal_speed_ms(&v, &c);
        let d = derivative(0.0, &State::new(0.0, vt), &v, &c);
        assert!(d.dvel.abs() < 1e-9, "residual accel {}", d.dvel);
    }

    #[test]
    fn decelerates_above_terminal_speed() {
        let v = presets::reference();
        let c = Constants::default();
        let vt = terminal_speed_ms(&v, &c);
        let d = derivative(0.0, &State::new(0.0, vt * 1.2), &v, &c);
        assert!(d.dvel < 0.0);
    }

    #[test]
    fn streamliner_is_faster() {
        let c = Constants::default();
        let base = terminal_speed(&presets::reference(), &c);
        let fast = terminal_speed(&presets::streamliner(), &c);
        assert!(fast > base);
    }

    #[test]
    fn denser_air_lowers_top_speed() {
        let v = presets::reference();
        let thick = Constants { air_density: 2.6, ..Constants::default() };
        let top = terminal_speed(&v, &Constants::default());
        let top_thick = terminal_speed(&v, &thick);
        // cube root of 2
        assert!((top / top_thick - 2f64.cbrt()).abs() < 1e-9);
    }

    #[test]
    fn singular_at_standstill() {
        let v = presets::reference();
        let d = derivative(0.0, &State::new(0.0, 0.0), &v, &Constants::default());
        assert!(!d.is_finite());
    }

    proptest! {
        #[test]
        fn top_speed_independent_of_mass(
            power in 1.0_f64..1000.0,
            cda in 0.05_f64..2.0,
            m1 in 1.0_f64..5000.0,
            m2 in 1.0_f64..5000.0,
        ) {
            let c = Constants::default();
            let a = terminal_speed(&VehicleParams::new(power, cda, m1), &c);
            let b = terminal_speed(&VehicleParams::new(power, cda, m2), &c);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn top_speed_monotone_in_power_and_drag(
            power in 1.0_f64..1000.0,
            cda in 0.05_f64..2.0,
            mass in 1.0_f64..5000.0,
        ) {
            let c = Constants::default();
            let base = terminal_speed(&VehicleParams::new(power, cda, mass), &c);
            let more_power = terminal_speed(&VehicleParams::new(power * 2.0, cda, mass), &c);
            let more_drag = terminal_speed(&VehicleParams::new(power, cda * 2.0, mass), &c);
            prop_assert!(more_power > base);
            prop_assert!(more_drag < base);
        }
    }
}
