use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

// ---------------------------------------------------------------------------
// Vehicle parameters (the three scalars the whole model is driven by)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VehicleParams {
    pub power_kw: f64, // kW, constant at the wheels
    pub cda_m2: f64,   // drag coefficient x frontal area, m^2
    pub mass_kg: f64,  // kg
}

impl VehicleParams {
    pub fn new(power_kw: f64, cda_m2: f64, mass_kg: f64) -> Self {
        Self { power_kw, cda_m2, mass_kg }
    }

    /// Check the invariants the dynamics model relies on.
    ///
    /// All fields finite, `mass_kg > 0`, `cda_m2 > 0`, `power_kw >= 0`.
    pub fn validate(&self) -> SimResult<()> {
        let fields = [
            ("power_kw", self.power_kw),
            ("cda_m2", self.cda_m2),
            ("mass_kg", self.mass_kg),
        ];
        for (what, value) in fields {
            if !value.is_finite() {
                return Err(SimError::InvalidParameter { what, value });
            }
        }
        if self.mass_kg <= 0.0 {
            return Err(SimError::InvalidParameter { what: "mass_kg", value: self.mass_kg });
        }
        if self.cda_m2 <= 0.0 {
            return Err(SimError::InvalidParameter { what: "cda_m2", value: self.cda_m2 });
        }
        if self.power_kw < 0.0 {
            return Err(SimError::InvalidParameter { what: "power_kw", value: self.power_kw });
        }
        Ok(())
    }

    /// Power-to-weight ratio, kW/kg.
    pub fn power_to_weight(&self) -> f64 {
        self.power_kw / self.mass_kg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_vehicle_is_valid() {
        assert!(VehicleParams::new(100.0, 0.5, 200.0).validate().is_ok());
    }

    #[test]
    fn zero_mass_rejected() {
        let err = VehicleParams::new(100.0, 0.5, 0.0).validate().unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { what: "mass_kg", .. }));
    }

    #[test]
    fn zero_drag_area_rejected() {
        let err = VehicleParams::new(100.0, 0.0, 200.0).validate().unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { what: "cda_m2", .. }));
    }

    #[test]
    fn negative_power_rejected_zero_power_allowed() {
        assert!(VehicleParams::new(-1.0, 0.5, 200.0).validate().is_err());
        assert!(VehicleParams::new(0.0, 0.5, 200.0).validate().is_ok());
    }

    #[test]
    fn non_finite_rejected() {
        let err = VehicleParams::new(f64::NAN, 0.5, 200.0).validate().unwrap_err();
        assert!(matches!(err, SimError::InvalidParameter { what: "power_kw", .. }));
        assert!(VehicleParams::new(100.0, 0.5, f64::INFINITY).validate().is_err());
    }

    #[test]
    fn deserializes_from_json() {
        let v: VehicleParams =
            serde_json::from_str(r#"{"power_kw": 200, "cda_m2": 0.25, "mass_kg": 200}"#).unwrap();
        assert_eq!(v, VehicleParams::new(200.0, 0.25, 200.0));
    }
}
