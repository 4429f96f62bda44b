//! Solver settings.

use serde::{Deserialize, Serialize};

use crate::error::{SolverError, SolverResult};
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// Lower end of the default inflow-angle bracket [rad].
pub const PHI_MIN: f64 = 1e-6;
/// Upper end of the default inflow-angle bracket [rad].
pub const PHI_MAX: f64 = FRAC_PI_2;

/// Bracketing (robust) solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BracketConfig {
    /// Bracket on φ [rad]
    pub phi_lo: f64,
    pub phi_hi: f64,
    /// Sub-intervals scanned for the first sign change
    pub scan_intervals: usize,
    /// Root tolerance on φ [rad]
    pub x_tol: f64,
    /// Brent iteration budget per section
    pub max_iterations: usize,
    /// Solve sections on the rayon pool
    pub parallel: bool,
}

impl Default for BracketConfig {
    fn default() -> Self {
        Self {
            phi_lo: PHI_MIN,
            phi_hi: PHI_MAX,
            scan_intervals: 64,
            x_tol: 1e-12,
            max_iterations: 100,
            parallel: false,
        }
    }
}

impl BracketConfig {
    pub fn validate(&self) -> SolverResult<()> {
        check_bracket(self.phi_lo, self.phi_hi)?;
        if !(self.x_tol > 0.0) || self.scan_intervals == 0 || self.max_iterations == 0 {
            return Err(invalid("x_tol, scan_intervals and max_iterations must be positive"));
        }
        Ok(())
    }
}

/// Newton (differentiable) solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NewtonConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance on the largest section residual
    pub abs_tol: f64,
    /// Line search backtracking factor
    pub line_search_beta: f64,
    /// Maximum line search iterations
    pub max_line_search_iters: usize,
    /// Largest φ change per iteration [rad]
    pub max_step: f64,
    /// Sub-intervals of the initial-guess scan
    pub scan_intervals: usize,
    pub phi_lo: f64,
    pub phi_hi: f64,
}

impl Default for NewtonConfig {
    fn default() -> Self {
        Self {
            max_iterations: 50,
            abs_tol: 1e-12,
            line_search_beta: 0.5,
            max_line_search_iters: 20,
            max_step: 0.1,
            scan_intervals: 64,
            phi_lo: PHI_MIN,
            phi_hi: PHI_MAX,
        }
    }
}

impl NewtonConfig {
    pub fn validate(&self) -> SolverResult<()> {
        check_bracket(self.phi_lo, self.phi_hi)?;
        if !(self.max_step > 0.0) || !(self.abs_tol > 0.0) || self.scan_intervals == 0 {
            return Err(invalid("max_step, abs_tol and scan_intervals must be positive"));
        }
        if !(self.line_search_beta > 0.0 && self.line_search_beta < 1.0) {
            return Err(invalid("line_search_beta must lie in (0, 1)"));
        }
        Ok(())
    }
}

fn check_bracket(lo: f64, hi: f64) -> SolverResult<()> {
    if lo.is_finite() && hi.is_finite() && lo > 0.0 && lo < hi {
        Ok(())
    } else {
        Err(invalid(format!("invalid inflow-angle bracket [{lo}, {hi}]")))
    }
}

fn invalid(what: impl Into<String>) -> SolverError {
    SolverError::Numeric {
        what: format!("solver configuration: {}", what.into()),
    }
}

/// Which section solver to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SolverKind {
    /// Bracketing scan + Brent; tolerant of non-smooth polars.
    #[default]
    Robust,
    /// Newton with the analytic Jacobian; exposes sensitivities.
    Newton,
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Robust => write!(f, "robust"),
            Self::Newton => write!(f, "newton"),
        }
    }
}

impl std::str::FromStr for SolverKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "robust" | "bracketing" | "brent" => Ok(Self::Robust),
            "newton" | "differentiable" => Ok(Self::Newton),
            other => Err(format!("unknown solver '{other}' (expected robust or newton)")),
        }
    }
}

/// Solver choice plus the settings of both strategies.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub kind: SolverKind,
    pub bracket: BracketConfig,
    pub newton: NewtonConfig,
}

impl SolverSettings {
    pub fn with_kind(kind: SolverKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }
}
