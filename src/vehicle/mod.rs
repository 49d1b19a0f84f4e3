pub mod params;

pub use params::VehicleParams;

// ---------------------------------------------------------------------------
// Preset vehicles
// ---------------------------------------------------------------------------

pub mod presets {
    use super::VehicleParams;

    /// Light, high-power reference vehicle (100 kW, CdA 0.5 m^2, 200 kg).
    pub fn reference() -> VehicleParams {
        VehicleParams::new(100.0, 0.5, 200.0)
    }

    /// Reference vehicle with doubled power and halved drag area.
    pub fn streamliner() -> VehicleParams {
        VehicleParams::new(200.0, 0.25, 200.0)
    }
}
