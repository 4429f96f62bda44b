//! rp-project: case file format, validation and atmosphere model.

pub mod atmosphere;
pub mod migrate;
pub mod schema;
pub mod validate;

pub use atmosphere::{Atmosphere, sutherland_viscosity};
pub use migrate::{LATEST_VERSION, migrate_to_latest};
pub use schema::*;
pub use validate::{ValidationError, validate_case};

use rp_airfoil::{AirfoilCatalog, AirfoilPolar, AirfoilResult, TabulatedPolar};
use std::path::Path;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Migration error: {what}")]
    Migration { what: String },

    #[error("Unsupported case file '{path}': expected .yaml, .yml or .json")]
    UnknownFormat { path: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ProjectError> for rp_core::CoreError {
    fn from(err: ProjectError) -> Self {
        rp_core::CoreError::InvalidArg {
            what: err.to_string(),
        }
    }
}

fn finish(case: Case) -> ProjectResult<Case> {
    let case = migrate_to_latest(case)?;
    validate_case(&case)?;
    Ok(case)
}

pub fn from_yaml_str(content: &str) -> ProjectResult<Case> {
    finish(serde_yaml::from_str(content)?)
}

pub fn from_json_str(content: &str) -> ProjectResult<Case> {
    finish(serde_json::from_str(content)?)
}

pub fn load_yaml(path: &Path) -> ProjectResult<Case> {
    from_yaml_str(&std::fs::read_to_string(path)?)
}

pub fn save_yaml(path: &Path, case: &Case) -> ProjectResult<()> {
    validate_case(case)?;
    let content = serde_yaml::to_string(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &Path) -> ProjectResult<Case> {
    from_json_str(&std::fs::read_to_string(path)?)
}

pub fn save_json(path: &Path, case: &Case) -> ProjectResult<()> {
    validate_case(case)?;
    let content = serde_json::to_string_pretty(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a case, choosing the format from the file extension.
pub fn load(path: &Path) -> ProjectResult<Case> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("yaml" | "yml") => load_yaml(path),
        Some("json") => load_json(path),
        _ => Err(ProjectError::UnknownFormat {
            path: path.display().to_string(),
        }),
    }
}

/// Spline polar for a tabulated airfoil definition.
pub fn polar_from_table(table: &AirfoilTableDef) -> AirfoilResult<AirfoilPolar> {
    TabulatedPolar::new(
        table.name.clone(),
        &table.alpha_deg,
        &table.cl,
        &table.cd,
        table.extrapolation,
    )
    .map(AirfoilPolar::from)
}

/// Built-in families plus the case's own tables.
pub fn airfoil_catalog(case: &Case) -> AirfoilResult<AirfoilCatalog> {
    let mut catalog = AirfoilCatalog::builtin();
    for table in &case.airfoil_tables {
        catalog.register(polar_from_table(table)?)?;
    }
    Ok(catalog)
}
