//! Case file schema definitions.

use serde::{Deserialize, Serialize};

pub use rp_core::Extrapolation;

/// One analysis case: a rotor, the air it runs in, and where to run it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Case {
    pub version: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub rotor: RotorDef,
    pub fluid: FluidDef,
    #[serde(default)]
    pub solver: SolverDef,
    /// Tabulated polars, referenced by name from `rotor.airfoil`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub airfoil_tables: Vec<AirfoilTableDef>,
    #[serde(default)]
    pub operating_points: Vec<OperatingPointDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sweep: Option<SweepDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RotorDef {
    pub nblades: u32,
    pub diameter_m: f64,
    pub hub_radius_m: f64,
    #[serde(default)]
    pub global_twist_deg: f64,
    #[serde(default)]
    pub discretization: DiscretizationDef,
    pub radius_m: Vec<f64>,
    pub chord_m: Vec<f64>,
    pub pitch_deg: Vec<f64>,
    pub airfoil: AirfoilRefDef,
}

/// How blade samples become sections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum DiscretizationDef {
    /// Equal-width stations at the midpoints between hub and tip.
    Midpoint { n_sections: usize },
    /// One station per radius sample.
    Stations,
}

impl Default for DiscretizationDef {
    fn default() -> Self {
        Self::Midpoint { n_sections: 20 }
    }
}

/// A single airfoil name, or one name per radius sample.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum AirfoilRefDef {
    Single(String),
    PerSample(Vec<String>),
}

impl AirfoilRefDef {
    pub fn names(&self) -> Vec<&str> {
        match self {
            Self::Single(name) => vec![name.as_str()],
            Self::PerSample(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AirfoilTableDef {
    pub name: String,
    pub alpha_deg: Vec<f64>,
    pub cl: Vec<f64>,
    pub cd: Vec<f64>,
    #[serde(default)]
    pub extrapolation: Extrapolation,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum FluidDef {
    Explicit {
        density_kg_m3: f64,
        viscosity_pa_s: f64,
    },
    /// ISA atmosphere at an altitude, optionally hotter or colder than standard.
    StandardAtmosphere {
        altitude_m: f64,
        #[serde(default)]
        temperature_offset_k: f64,
    },
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SolverKindDef {
    #[default]
    Robust,
    Newton,
}

/// Solver choice; unset tolerances keep the solver defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default)]
    pub kind: SolverKindDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_intervals: Option<usize>,
    #[serde(default)]
    pub parallel: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OperatingPointDef {
    pub v_inf_mps: f64,
    pub rpm: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SweepQuantityDef {
    VInf,
    Rpm,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SweepSpacingDef {
    #[default]
    Linear,
    Logarithmic,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SweepDef {
    pub quantity: SweepQuantityDef,
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
    #[serde(default)]
    pub spacing: SweepSpacingDef,
    /// rpm for a v∞ sweep, v∞ [m/s] for an rpm sweep
    pub fixed: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn airfoil_reference_accepts_name_or_list() {
        let single: AirfoilRefDef = serde_yaml::from_str("CLARKY").unwrap();
        assert_eq!(single, AirfoilRefDef::Single("CLARKY".into()));
        let list: AirfoilRefDef = serde_yaml::from_str("[NACA0012, CLARKY]").unwrap();
        assert_eq!(list.names(), vec!["NACA0012", "CLARKY"]);
    }

    #[test]
    fn discretization_defaults_to_midpoints() {
        let d: DiscretizationDef = serde_yaml::from_str("type: Stations").unwrap();
        assert_eq!(d, DiscretizationDef::Stations);
        assert_eq!(
            DiscretizationDef::default(),
            DiscretizationDef::Midpoint { n_sections: 20 }
        );
    }

    #[test]
    fn table_extrapolation_parses_and_defaults_to_hold() {
        let yaml = "name: t\nalpha_deg: [0.0, 5.0]\ncl: [0.0, 0.5]\ncd: [0.01, 0.02]\n";
        let table: AirfoilTableDef = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(table.extrapolation, Extrapolation::Hold);
        let table: AirfoilTableDef =
            serde_yaml::from_str(&format!("{yaml}extrapolation: Polynomial\n")).unwrap();
        assert_eq!(table.extrapolation, Extrapolation::Polynomial);
    }

    #[test]
    fn fluid_variants() {
        let f: FluidDef = serde_yaml::from_str("type: StandardAtmosphere\naltitude_m: 1500").unwrap();
        assert_eq!(
            f,
            FluidDef::StandardAtmosphere {
                altitude_m: 1500.0,
                temperature_offset_k: 0.0
            }
        );
    }
}
