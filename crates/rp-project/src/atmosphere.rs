//! International Standard Atmosphere, troposphere and lower stratosphere.

use rp_core::units::{DynVisc, Density};
use rp_core::{kg_per_m3, pa_s};
use serde::{Deserialize, Serialize};

use crate::schema::FluidDef;
use crate::validate::ValidationError;

/// Specific gas constant of dry air [J/(kg·K)]
pub const R_AIR: f64 = 287.052_87;
pub const T_SL_K: f64 = 288.15;
pub const P_SL_PA: f64 = 101_325.0;
/// Troposphere lapse rate [K/m]
pub const LAPSE_RATE: f64 = 0.0065;
pub const TROPOPAUSE_M: f64 = 11_000.0;
/// Upper limit of the isothermal layer
pub const MAX_ALTITUDE_M: f64 = 20_000.0;
pub const MIN_ALTITUDE_M: f64 = -610.0;

const SUTHERLAND_C1: f64 = 1.458e-6;
const SUTHERLAND_S: f64 = 110.4;

/// Air state at one altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Atmosphere {
    pub altitude_m: f64,
    pub temperature_k: f64,
    pub pressure_pa: f64,
    pub density_kg_m3: f64,
    pub viscosity_pa_s: f64,
}

impl Atmosphere {
    /// ISA state at a geopotential altitude.
    ///
    /// `temperature_offset_k` shifts the temperature profile without changing
    /// the pressure profile (hot/cold day), so it only moves ρ and μ.
    pub fn standard(altitude_m: f64, temperature_offset_k: f64) -> Result<Self, ValidationError> {
        if !altitude_m.is_finite() || !(MIN_ALTITUDE_M..=MAX_ALTITUDE_M).contains(&altitude_m) {
            return Err(ValidationError::InvalidValue {
                field: "fluid.altitude_m".into(),
                value: altitude_m.to_string(),
                reason: format!("must lie in [{MIN_ALTITUDE_M}, {MAX_ALTITUDE_M}] m"),
            });
        }

        let g0 = rp_core::constants::G0_MPS2;
        let t_tropopause = T_SL_K - LAPSE_RATE * TROPOPAUSE_M;
        let (t_std, pressure) = if altitude_m <= TROPOPAUSE_M {
            let t = T_SL_K - LAPSE_RATE * altitude_m;
            (t, P_SL_PA * (t / T_SL_K).powf(g0 / (LAPSE_RATE * R_AIR)))
        } else {
            let p11 = P_SL_PA * (t_tropopause / T_SL_K).powf(g0 / (LAPSE_RATE * R_AIR));
            let p = p11 * (-g0 * (altitude_m - TROPOPAUSE_M) / (R_AIR * t_tropopause)).exp();
            (t_tropopause, p)
        };

        let temperature = t_std + temperature_offset_k;
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(ValidationError::InvalidValue {
                field: "fluid.temperature_offset_k".into(),
                value: temperature_offset_k.to_string(),
                reason: "temperature must stay above absolute zero".into(),
            });
        }

        Ok(Self {
            altitude_m,
            temperature_k: temperature,
            pressure_pa: pressure,
            density_kg_m3: pressure / (R_AIR * temperature),
            viscosity_pa_s: sutherland_viscosity(temperature),
        })
    }

    pub fn density(&self) -> Density {
        kg_per_m3(self.density_kg_m3)
    }

    pub fn viscosity(&self) -> DynVisc {
        pa_s(self.viscosity_pa_s)
    }
}

impl FluidDef {
    /// Density and dynamic viscosity of the working fluid.
    pub fn properties(&self) -> Result<(Density, DynVisc), ValidationError> {
        match *self {
            FluidDef::Explicit {
                density_kg_m3,
                viscosity_pa_s,
            } => Ok((kg_per_m3(density_kg_m3), pa_s(viscosity_pa_s))),
            FluidDef::StandardAtmosphere {
                altitude_m,
                temperature_offset_k,
            } => {
                let atm = Atmosphere::standard(altitude_m, temperature_offset_k)?;
                Ok((atm.density(), atm.viscosity()))
            }
        }
    }
}

/// Dynamic viscosity of air [Pa·s] by Sutherland's law.
pub fn sutherland_viscosity(temperature_k: f64) -> f64 {
    SUTHERLAND_C1 * temperature_k.powf(1.5) / (temperature_k + SUTHERLAND_S)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rp_core::constants::{MU_SL_PA_S, RHO_SL_KG_M3};

    #[test]
    fn sea_level_matches_constants() {
        let atm = Atmosphere::standard(0.0, 0.0).unwrap();
        assert!((atm.density_kg_m3 - RHO_SL_KG_M3).abs() < 1e-4);
        assert!((atm.viscosity_pa_s - MU_SL_PA_S).abs() / MU_SL_PA_S < 1e-3);
        assert_eq!(atm.pressure_pa, P_SL_PA);
    }

    #[test]
    fn tropopause_values() {
        let atm = Atmosphere::standard(11_000.0, 0.0).unwrap();
        assert!((atm.temperature_k - 216.65).abs() < 1e-9);
        assert!((atm.pressure_pa - 22_632.0).abs() < 5.0);
        assert!((atm.density_kg_m3 - 0.3639).abs() < 1e-3);
    }

    #[test]
    fn stratosphere_is_isothermal_and_continuous() {
        let below = Atmosphere::standard(TROPOPAUSE_M - 1e-6, 0.0).unwrap();
        let above = Atmosphere::standard(TROPOPAUSE_M + 1e-6, 0.0).unwrap();
        assert!((below.pressure_pa - above.pressure_pa).abs() < 1e-3);
        let high = Atmosphere::standard(20_000.0, 0.0).unwrap();
        assert_eq!(high.temperature_k, above.temperature_k);
        assert!((high.pressure_pa - 5_474.9).abs() < 5.0);
    }

    #[test]
    fn hot_day_lowers_density_only() {
        let std = Atmosphere::standard(1_000.0, 0.0).unwrap();
        let hot = Atmosphere::standard(1_000.0, 20.0).unwrap();
        assert_eq!(std.pressure_pa, hot.pressure_pa);
        assert!(hot.density_kg_m3 < std.density_kg_m3);
        assert!(hot.viscosity_pa_s > std.viscosity_pa_s);
    }

    #[test]
    fn fluid_definitions_resolve() {
        let explicit = FluidDef::Explicit {
            density_kg_m3: 1.1,
            viscosity_pa_s: 1.7e-5,
        };
        let (rho, mu) = explicit.properties().unwrap();
        assert_eq!((rho.value, mu.value), (1.1, 1.7e-5));
        let isa = FluidDef::StandardAtmosphere {
            altitude_m: 0.0,
            temperature_offset_k: 0.0,
        };
        let (rho, _) = isa.properties().unwrap();
        assert!((rho.value - 1.225).abs() < 1e-4);
    }

    #[test]
    fn out_of_range_altitude() {
        assert!(Atmosphere::standard(25_000.0, 0.0).is_err());
        assert!(Atmosphere::standard(f64::NAN, 0.0).is_err());
        assert!(Atmosphere::standard(0.0, -400.0).is_err());
    }
}
