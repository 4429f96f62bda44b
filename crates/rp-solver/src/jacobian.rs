//! Finite difference Jacobians, used to check analytic derivatives.

use crate::error::SolverResult;
use nalgebra::{DMatrix, DVector};

/// Compute Jacobian using central finite differences.
///
/// Column j perturbs x[j] by ±epsilon·max(|x[j]|, 1).
pub fn central_difference_jacobian<F>(
    x: &DVector<f64>,
    f: F,
    epsilon: f64,
) -> SolverResult<DMatrix<f64>>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
{
    let mut jac: Option<DMatrix<f64>> = None;

    for j in 0..x.len() {
        let dx = epsilon * x[j].abs().max(1.0);

        let mut x_plus = x.clone();
        x_plus[j] += dx;
        let mut x_minus = x.clone();
        x_minus[j] -= dx;

        let df = (f(&x_plus)? - f(&x_minus)?) / (2.0 * dx);
        let jac = jac.get_or_insert_with(|| DMatrix::zeros(df.len(), x.len()));
        jac.set_column(j, &df);
    }

    match jac {
        Some(jac) => Ok(jac),
        None => Ok(DMatrix::zeros(f(x)?.len(), 0)),
    }
}

/// Largest elementwise relative mismatch |a - b| / max(|a|, |b|, floor).
pub fn max_relative_mismatch(a: &DMatrix<f64>, b: &DMatrix<f64>, floor: f64) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).abs() / x.abs().max(y.abs()).max(floor))
        .fold(0.0, f64::max)
}
