//! Error types for the rp-app service layer.

use std::path::PathBuf;

/// Application error type that wraps errors from the backend crates and
/// gives the CLI a single error surface.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Case error: {0}")]
    Case(String),

    #[error("Case validation failed: {0}")]
    Validation(String),

    #[error("Failed to write output file: {path}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Rotor compilation failed: {0}")]
    Compile(String),

    #[error("Solver error: {0}")]
    Solver(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type for rp-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<rp_project::ProjectError> for AppError {
    fn from(err: rp_project::ProjectError) -> Self {
        match err {
            rp_project::ProjectError::Validation(e) => AppError::Validation(e.to_string()),
            other => AppError::Case(other.to_string()),
        }
    }
}

impl From<rp_project::ValidationError> for AppError {
    fn from(err: rp_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<rp_airfoil::AirfoilError> for AppError {
    fn from(err: rp_airfoil::AirfoilError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<rp_rotor::RotorError> for AppError {
    fn from(err: rp_rotor::RotorError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<rp_solver::SolverError> for AppError {
    fn from(err: rp_solver::SolverError) -> Self {
        AppError::Solver(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Serialization(err.to_string())
    }
}
