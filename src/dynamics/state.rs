use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Longitudinal state: position along the road and forward speed
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub pos: f64, // m
    pub vel: f64, // m/s, must stay > 0
}

impl State {
    pub fn new(pos: f64, vel: f64) -> Self {
        Self { pos, vel }
    }

    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.pos, self.vel)
    }

    pub fn from_vector(v: &Vector2<f64>) -> Self {
        Self { pos: v.x, vel: v.y }
    }

    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

// ---------------------------------------------------------------------------
// State derivative
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Deriv {
    pub dpos: f64, // velocity, m/s
    pub dvel: f64, // acceleration, m/s^2
}

impl Deriv {
    pub fn to_vector(&self) -> Vector2<f64> {
        Vector2::new(self.dpos, self.dvel)
    }

    pub fn is_finite(&self) -> bool {
        self.dpos.is_finite() && self.dvel.is_finite()
    }
}

// ---------------------------------------------------------------------------
// Simulation config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub horizon_s: f64,
    pub initial: State,
    pub rtol: f64,
    pub atol: f64,
    pub min_step: f64,
    pub max_steps: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            horizon_s: 20.0,
            initial: State::new(0.0, 10.0), // rolling start, v > 0
            rtol: 1e-3,
            atol: 1e-6,
            min_step: 1e-10,
            max_steps: 100_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vector_conversion() {
        let s = State::new(3.0, 4.0);
        assert_eq!(State::from_vector(&s.to_vector()), s);
    }

    #[test]
    fn config_from_partial_json() {
        let c: SimConfig = serde_json::from_str(r#"{"horizon_s": 5.0, "rtol": 1e-6}"#).unwrap();
        assert!((c.horizon_s - 5.0).abs() < 1e-12);
        assert!((c.rtol - 1e-6).abs() < 1e-18);
        assert_eq!(c.initial, State::new(0.0, 10.0));
        assert_eq!(c.max_steps, 100_000);
    }
}
