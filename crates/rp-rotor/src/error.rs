//! Error types for rotor construction.

use rp_airfoil::AirfoilError;
use rp_core::CoreError;
use thiserror::Error;

/// Errors detected while building a rotor. All of them are raised eagerly,
/// before any solve is attempted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RotorError {
    #[error("Configuration error: {what}")]
    Configuration { what: String },
}

pub type RotorResult<T> = Result<T, RotorError>;

impl RotorError {
    pub(crate) fn config(what: impl Into<String>) -> Self {
        Self::Configuration { what: what.into() }
    }
}

impl From<AirfoilError> for RotorError {
    fn from(e: AirfoilError) -> Self {
        RotorError::Configuration {
            what: format!("airfoil: {e}"),
        }
    }
}

impl From<CoreError> for RotorError {
    fn from(e: CoreError) -> Self {
        RotorError::Configuration {
            what: e.to_string(),
        }
    }
}

impl From<RotorError> for CoreError {
    fn from(e: RotorError) -> Self {
        match e {
            RotorError::Configuration { what } => CoreError::InvalidArg { what },
        }
    }
}
