pub mod event;
pub mod integrator;
pub mod runner;
pub mod trace;

pub use runner::simulate;
pub use trace::{Sample, Trace};
