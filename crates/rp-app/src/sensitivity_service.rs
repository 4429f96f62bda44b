//! Analytic sensitivities with a finite-difference cross-check.

use nalgebra::DMatrix;
use rp_solver::jacobian::max_relative_mismatch;
use rp_solver::{
    BemtSolver, NewtonSolver, PerformanceRecord, Sensitivities, finite_difference_operating_matrix,
};
use tracing::debug;

use crate::case_compile::CompiledCase;
use crate::error::AppResult;

/// Default relative step for the finite-difference check.
pub const DEFAULT_FD_STEP: f64 = 1e-5;

/// Entries smaller than this compare absolutely in the mismatch.
const MISMATCH_FLOOR: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct SensitivityReport {
    pub record: PerformanceRecord,
    pub analytic: Sensitivities,
    /// Rows (T, Q, P) by columns (v∞, rpm, global twist). `None` when a
    /// central step in v∞ would go negative.
    pub finite_difference: Option<DMatrix<f64>>,
    pub max_mismatch: Option<f64>,
}

/// Solve with the Newton strategy and differentiate at (v∞, rpm).
pub fn compute_sensitivities(
    compiled: &CompiledCase,
    v_inf: f64,
    rpm: f64,
    fd_step: f64,
) -> AppResult<SensitivityReport> {
    let solver = BemtSolver::new(
        &compiled.rotor,
        compiled.fluid,
        NewtonSolver::new(compiled.settings.newton),
    );
    let (record, analytic) = solver.run_with_sensitivities(v_inf, rpm)?;

    let finite_difference = if v_inf - fd_step * v_inf.abs().max(1.0) >= 0.0 {
        Some(finite_difference_operating_matrix(&solver, v_inf, rpm, fd_step)?)
    } else {
        debug!(v_inf, "skipping finite-difference check at the v_inf = 0 boundary");
        None
    };
    let max_mismatch = finite_difference
        .as_ref()
        .map(|fd| max_relative_mismatch(&analytic.operating_matrix(), fd, MISMATCH_FLOOR));

    Ok(SensitivityReport {
        record,
        analytic,
        finite_difference,
        max_mismatch,
    })
}
