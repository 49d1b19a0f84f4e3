pub mod aerodynamics;
pub mod constants;

pub use constants::Constants;
