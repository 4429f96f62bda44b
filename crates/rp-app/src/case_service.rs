//! Case loading, saving and summaries.

use rp_project::schema::Case;
use rp_solver::SolverKind;
use std::fmt;
use std::path::Path;

use crate::case_compile::CompiledCase;
use crate::error::{AppError, AppResult};

/// Load a case file (YAML or JSON by extension), migrated and validated.
pub fn load_case(path: &Path) -> AppResult<Case> {
    Ok(rp_project::load(path)?)
}

/// Save a case, choosing the format from the extension.
pub fn save_case(path: &Path, case: &Case) -> AppResult<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("json") => rp_project::save_json(path, case)?,
        Some("yaml" | "yml") => rp_project::save_yaml(path, case)?,
        _ => {
            return Err(AppError::InvalidInput(format!(
                "cannot infer case format from '{}'",
                path.display()
            )));
        }
    }
    Ok(())
}

/// Headline facts about a compiled case.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseSummary {
    pub name: String,
    pub nblades: u32,
    pub diameter_m: f64,
    pub hub_radius_m: f64,
    pub n_sections: usize,
    pub airfoils: Vec<String>,
    pub density_kg_m3: f64,
    pub viscosity_pa_s: f64,
    pub solver: SolverKind,
    pub operating_points: usize,
    pub sweep: Option<String>,
}

pub fn summarize(compiled: &CompiledCase) -> CaseSummary {
    let rotor = &compiled.rotor;
    let mut airfoils: Vec<String> = Vec::new();
    for section in rotor.sections() {
        let name = section.airfoil().name();
        if !airfoils.iter().any(|a| a == name) {
            airfoils.push(name.to_string());
        }
    }
    CaseSummary {
        name: compiled.name.clone(),
        nblades: rotor.nblades(),
        diameter_m: rotor.diameter(),
        hub_radius_m: rotor.hub_radius(),
        n_sections: rotor.len(),
        airfoils,
        density_kg_m3: compiled.fluid.density,
        viscosity_pa_s: compiled.fluid.viscosity,
        solver: compiled.settings.kind,
        operating_points: compiled.operating_points.len(),
        sweep: compiled.sweep.as_ref().map(|s| s.to_string()),
    }
}

impl fmt::Display for CaseSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Case: {}", self.name)?;
        writeln!(
            f,
            "  Rotor: {} blades, D = {:.4} m, hub = {:.4} m, {} sections",
            self.nblades, self.diameter_m, self.hub_radius_m, self.n_sections
        )?;
        writeln!(f, "  Airfoils: {}", self.airfoils.join(", "))?;
        writeln!(
            f,
            "  Fluid: rho = {:.5} kg/m^3, mu = {:.4e} Pa*s",
            self.density_kg_m3, self.viscosity_pa_s
        )?;
        writeln!(f, "  Solver: {}", self.solver)?;
        write!(f, "  Operating points: {}", self.operating_points)?;
        if let Some(sweep) = &self.sweep {
            write!(f, "\n  {sweep}")?;
        }
        Ok(())
    }
}
