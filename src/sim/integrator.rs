use nalgebra::Vector2;

// ---------------------------------------------------------------------------
// Dormand-Prince 5(4) embedded pair
// ---------------------------------------------------------------------------

const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights (also row 7 of the tableau, hence FSAL)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// b - b_hat, difference between the 5th and embedded 4th-order solutions
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

/// Order of the embedded error estimator; step factors scale with err^(-1/(ORDER+1)).
pub const ERROR_ORDER: i32 = 4;

/// Result of one trial step.
#[derive(Debug, Clone)]
pub struct Dp5Step {
    pub y: Vector2<f64>,
    /// Derivative at the new point; reused as k1 of the next step.
    pub f: Vector2<f64>,
    /// Local error estimate.
    pub err: Vector2<f64>,
}

impl Dp5Step {
    pub fn is_finite(&self) -> bool {
        self.y.iter().chain(self.f.iter()).chain(self.err.iter()).all(|x| x.is_finite())
    }
}

/// Single Dormand-Prince step of size `h` from `(t, y)`, given `k1 = f(t, y)`.
pub fn dp5_step<F>(rhs: &F, t: f64, y: &Vector2<f64>, k1: &Vector2<f64>, h: f64) -> Dp5Step
where
    F: Fn(f64, &Vector2<f64>) -> Vector2<f64>,
{
    let k2 = rhs(t + C2 * h, &(y + k1 * (A21 * h)));
    let k3 = rhs(t + C3 * h, &(y + (k1 * A31 + k2 * A32) * h));
    let k4 = rhs(t + C4 * h, &(y + (k1 * A41 + k2 * A42 + k3 * A43) * h));
    let k5 = rhs(t + C5 * h, &(y + (k1 * A51 + k2 * A52 + k3 * A53 + k4 * A54) * h));
    let k6 = rhs(t + h, &(y + (k1 * A61 + k2 * A62 + k3 * A63 + k4 * A64 + k5 * A65) * h));

    let y_new = y + (k1 * B1 + k3 * B3 + k4 * B4 + k5 * B5 + k6 * B6) * h;
    let k7 = rhs(t + h, &y_new);

    let err = (k1 * E1 + k3 * E3 + k4 * E4 + k5 * E5 + k6 * E6 + k7 * E7) * h;

    Dp5Step { y: y_new, f: k7, err }
}

/// RMS of `v / scale`, componentwise.
pub fn rms_norm(v: &Vector2<f64>, scale: &Vector2<f64>) -> f64 {
    let scaled = v.component_div(scale);
    (scaled.norm_squared() / scaled.len() as f64).sqrt()
}

/// Tolerance scale `atol + rtol * max(|y0|, |y1|)`.
pub fn error_scale(y0: &Vector2<f64>, y1: &Vector2<f64>, rtol: f64, atol: f64) -> Vector2<f64> {
    y0.abs().sup(&y1.abs()).map(|m| atol + rtol * m)
}

/// Starting step size (Hairer, Norsett & Wanner, "Solving ODEs I", II.4).
pub fn initial_step<F>(
    rhs: &F,
    t0: f64,
    y0: &Vector2<f64>,
    f0: &Vector2<f64>,
    t_bound: f64,
    rtol: f64,
    atol: f64,
) -> f64
where
    F: Fn(f64, &Vector2<f64>) -> Vector2<f64>,
{
    let span = t_bound - t0;
    if span <= 0.0 {
        return 0.0;
    }
    let scale = y0.abs().map(|m| atol + rtol * m);
    let d0 = rms_norm(y0, &scale);
    let d1 = rms_norm(f0, &scale);

    let h0 = if d0 < 1e-5 || d1 < 1e-5 { 1e-6 } else { 0.01 * d0 / d1 };
    let h0 = h0.min(span);

    let y1 = y0 + f0 * h0;
    let f1 = rhs(t0 + h0, &y1);
    if !f1.iter().all(|x| x.is_finite()) {
        return h0;
    }
    let d2 = rms_norm(&(f1 - f0), &scale) / h0;

    let h1 = if d1 <= 1e-15 && d2 <= 1e-15 {
        (h0 * 1e-3).max(1e-6)
    } else {
        (0.01 / d1.max(d2)).powf(1.0 / (ERROR_ORDER + 1) as f64)
    };

    (100.0 * h0).min(h1).min(span)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn growth(_t: f64, y: &Vector2<f64>) -> Vector2<f64> {
        *y
    }

    #[test]
    fn fifth_order_on_exponential() {
        let y0 = Vector2::new(1.0, 2.0);
        let mut y = y0;
        let mut k = growth(0.0, &y);
        let h = 0.1;
        for i in 0..10 {
            let s = dp5_step(&growth, i as f64 * h, &y, &k, h);
            y = s.y;
            k = s.f;
        }
        let e = std::f64::consts::E;
        assert!((y.x - e).abs() < 1e-6, "got {}", y.x);
        assert!((y.y - 2.0 * e).abs() < 2e-6, "got {}", y.y);
    }

    #[test]
    fn fsal_derivative_matches_rhs() {
        let y = Vector2::new(1.0, -0.5);
        let s = dp5_step(&growth, 0.0, &y, &growth(0.0, &y), 0.2);
        assert!((s.f - growth(0.2, &s.y)).norm() < 1e-15);
    }

    #[test]
    fn error_estimate_shrinks_with_step() {
        let y = Vector2::new(1.0, 1.0);
        let k = growth(0.0, &y);
        let big = dp5_step(&growth, 0.0, &y, &k, 0.5).err.norm();
        let small = dp5_step(&growth, 0.0, &y, &k, 0.25).err.norm();
        // local error is O(h^5): halving h cuts it by roughly 32
        assert!(small < big / 16.0, "big={big:e} small={small:e}");
    }

    #[test]
    fn linear_problem_has_zero_error() {
        let constant = |_t: f64, _y: &Vector2<f64>| Vector2::new(1.0, 0.0);
        let y = Vector2::new(0.0, 3.0);
        let s = dp5_step(&constant, 0.0, &y, &constant(0.0, &y), 2.0);
        assert!((s.y.x - 2.0).abs() < 1e-14);
        assert!(s.err.norm() < 1e-14);
    }

    #[test]
    fn initial_step_is_bounded_by_span() {
        let y = Vector2::new(1.0, 1.0);
        let h = initial_step(&growth, 0.0, &y, &growth(0.0, &y), 1e-3, 1e-3, 1e-6);
        assert!(h > 0.0 && h <= 1e-3);
    }
}
