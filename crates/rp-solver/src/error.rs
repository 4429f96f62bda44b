//! Error types for rotor solves.

use rp_core::CoreError;
use rp_rotor::RotorError;
use thiserror::Error;

/// Errors that can occur while solving one operating point.
///
/// A failure in any section aborts the whole point.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    #[error("Invalid operating point: {what}")]
    InvalidOperatingPoint { what: String },

    #[error(
        "Section {index} (r = {radius:.4} m) did not converge: no bracketed root, last residual {residual:.3e}"
    )]
    SectionConvergence {
        index: usize,
        radius: f64,
        residual: f64,
    },

    #[error(
        "Newton diverged after {iterations} iterations; worst section {index} (r = {radius:.4} m), residual {residual:.3e}"
    )]
    NewtonDivergence {
        index: usize,
        radius: f64,
        iterations: usize,
        residual: f64,
    },

    #[error("Rotor error: {0}")]
    Rotor(#[from] RotorError),

    #[error("Numeric error: {what}")]
    Numeric { what: String },
}

pub type SolverResult<T> = Result<T, SolverError>;

impl SolverError {
    /// True for failures of the nonlinear section solve itself.
    pub fn is_convergence_failure(&self) -> bool {
        matches!(
            self,
            Self::SectionConvergence { .. } | Self::NewtonDivergence { .. }
        )
    }
}

impl From<SolverError> for CoreError {
    fn from(e: SolverError) -> Self {
        match e {
            SolverError::SectionConvergence { .. } | SolverError::NewtonDivergence { .. } => {
                CoreError::Convergence {
                    what: e.to_string(),
                }
            }
            SolverError::InvalidOperatingPoint { what } => CoreError::InvalidArg { what },
            SolverError::Rotor(err) => err.into(),
            SolverError::Numeric { what } => CoreError::Convergence { what },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_kinds_are_distinct() {
        let bracket = SolverError::SectionConvergence {
            index: 2,
            radius: 0.8,
            residual: 0.1,
        };
        let newton = SolverError::NewtonDivergence {
            index: 2,
            radius: 0.8,
            iterations: 50,
            residual: 0.1,
        };
        assert_ne!(
            std::mem::discriminant(&bracket),
            std::mem::discriminant(&newton)
        );
        assert!(bracket.is_convergence_failure() && newton.is_convergence_failure());
        assert!(
            !SolverError::InvalidOperatingPoint {
                what: "rpm must be > 0".into()
            }
            .is_convergence_failure()
        );
        assert!(bracket.to_string().contains("r = 0.8000 m"));
        assert!(newton.to_string().contains("50 iterations"));
    }

    #[test]
    fn converts_into_core_error() {
        let core: CoreError = SolverError::InvalidOperatingPoint {
            what: "rpm must be positive".into(),
        }
        .into();
        assert!(matches!(core, CoreError::InvalidArg { .. }));
    }
}
