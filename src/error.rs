//! Error types for simulation and rendering.

use thiserror::Error;

/// Errors surfaced by the simulation core and its renderers.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid parameter {what}: {value}")]
    InvalidParameter { what: &'static str, value: f64 },

    #[error("Singular state: velocity {velocity} m/s (must be > 0)")]
    SingularState { velocity: f64 },

    #[error("Simulation failed to converge at t={time:.6} s (step {step:.3e} s): {reason}")]
    ConvergenceFailed {
        time: f64,
        step: f64,
        reason: &'static str,
    },

    #[error("Trace time not strictly increasing at sample {index} (t={time})")]
    NonMonotonicTrace { index: usize, time: f64 },

    #[error("Chart rendering failed: {message}")]
    Render { message: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type SimResult<T> = Result<T, SimError>;
