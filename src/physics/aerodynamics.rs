/// Aerodynamic drag force magnitude, N.
///
/// `F = 1/2 * rho * CdA * v^2`, always opposing motion along the road.
pub fn drag_force(speed: f64, air_density: f64, cda: f64) -> f64 {
    let q_dyn = 0.5 * air_density * speed * speed;
    q_dyn * cda
}

/// Tractive force of a constant-power source, N.
///
/// `F = P / v`. Unbounded as `v -> 0`; callers must keep `speed != 0`.
pub fn traction_force(power_w: f64, speed: f64) -> f64 {
    power_w / speed
}
