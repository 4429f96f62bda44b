//! Airfoil polar errors.

use rp_core::CoreError;
use thiserror::Error;

/// Result type for airfoil operations.
pub type AirfoilResult<T> = Result<T, AirfoilError>;

/// Errors raised while constructing or resolving polars.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AirfoilError {
    /// Name not present in the catalog.
    #[error("Unknown airfoil: {name}")]
    UnknownAirfoil { name: String },

    /// Tabulated data unusable for interpolation.
    #[error("Invalid polar table '{name}': {what}")]
    InvalidTable { name: String, what: String },

    /// A polar with this name is already registered.
    #[error("Airfoil '{name}' is already registered")]
    Duplicate { name: String },
}

impl From<AirfoilError> for CoreError {
    fn from(err: AirfoilError) -> Self {
        CoreError::InvalidArg {
            what: err.to_string(),
        }
    }
}
