//! Longitudinal acceleration of a constant-power vehicle.
//!
//! Three scalars drive everything: power, drag area and mass. [`solve`]
//! integrates the speed trace with an adaptive Dormand-Prince solver and
//! [`chart`] renders it together with the closed-form top speed.

pub mod dynamics;
pub mod error;
pub mod io;
pub mod physics;
pub mod sim;
pub mod vehicle;

pub use dynamics::state::{SimConfig, State};
pub use dynamics::{derivative, terminal_speed, terminal_speed_ms};
pub use error::{SimError, SimResult};
pub use io::{render_chart, render_samples, ChartMarkup, Samples};
pub use physics::Constants;
pub use sim::{simulate, Sample, Trace};
pub use vehicle::VehicleParams;

/// Simulate the reference scenario: 20 s from a 10 m/s rolling start.
pub fn solve(vehicle: &VehicleParams) -> SimResult<Trace> {
    simulate(vehicle, &SimConfig::default(), &Constants::default())
}

/// Chart the reference scenario as SVG markup.
pub fn chart(vehicle: &VehicleParams) -> SimResult<ChartMarkup> {
    render_chart(vehicle, &SimConfig::default(), &Constants::default())
}
