use serde::Deserialize;

// ---------------------------------------------------------------------------
// Physical constants and unit conversions
// ---------------------------------------------------------------------------

pub const RHO_AIR: f64 = 1.3; // fixed air density, kg/m^3
pub const KW_TO_W: f64 = 1000.0;
pub const MS_TO_KMH: f64 = 3.6;

/// Constants injected into the dynamics model.
///
/// Kept as a value rather than globals so tests can run non-standard
/// atmospheres without touching the model code.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct Constants {
    pub air_density: f64, // kg/m^3
    pub kw_to_w: f64,
    pub ms_to_kmh: f64,
}

impl Constants {
    pub const STANDARD: Constants = Constants {
        air_density: RHO_AIR,
        kw_to_w: KW_TO_W,
        ms_to_kmh: MS_TO_KMH,
    };

    /// Convert a speed in m/s to display units (km/h).
    pub fn to_display(&self, speed_ms: f64) -> f64 {
        speed_ms * self.ms_to_kmh
    }

    /// Convert a speed in display units (km/h) back to m/s.
    pub fn from_display(&self, speed_kmh: f64) -> f64 {
        speed_kmh / self.ms_to_kmh
    }
}

impl Default for Constants {
    fn default() -> Self {
        Self::STANDARD
    }
}
