//! Newton solver with an analytic Jacobian and bracket safeguards.
//!
//! All section inflow angles form one unknown vector φ. The Jacobian is
//! assembled from the hand-derived ∂R/∂φ and solved by LU, so the same
//! linearization can be reused for implicit sensitivities.

use nalgebra::{DMatrix, DVector};
use rp_rotor::{Inflow, Rotor};
use tracing::{debug, warn};

use crate::bracketing::{Scan, scan_sign_change};
use crate::config::NewtonConfig;
use crate::error::{SolverError, SolverResult};
use crate::strategy::SectionSolver;

/// How a Newton iteration ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewtonStatus {
    Converged,
    MaxIterations,
    SingularJacobian,
    LineSearchStagnated,
}

/// Newton iteration result.
#[derive(Debug, Clone)]
pub struct NewtonResult {
    /// Solution vector
    pub x: DVector<f64>,
    /// Residual at `x`
    pub residual: DVector<f64>,
    /// Largest absolute residual component
    pub residual_norm: f64,
    /// Number of iterations
    pub iterations: usize,
    pub status: NewtonStatus,
}

impl NewtonResult {
    pub fn converged(&self) -> bool {
        self.status == NewtonStatus::Converged
    }

    /// Index of the component with the largest residual.
    pub fn worst_component(&self) -> usize {
        self.residual.iamax()
    }
}

/// Newton's method with line search for separable systems, where component
/// i of the residual depends on x\[i\] only.
///
/// `lower`/`upper` bracket each component. The bracket shrinks around the
/// root as residual signs are observed, steps are limited to
/// `config.max_step` per component, and any step leaving the bracket is
/// replaced by its midpoint.
pub fn newton_solve<F, J>(
    x0: DVector<f64>,
    lower: DVector<f64>,
    upper: DVector<f64>,
    residual_fn: F,
    jacobian_fn: J,
    config: &NewtonConfig,
) -> SolverResult<NewtonResult>
where
    F: Fn(&DVector<f64>) -> SolverResult<DVector<f64>>,
    J: Fn(&DVector<f64>) -> SolverResult<DMatrix<f64>>,
{
    let n = x0.len();
    let mut lo = lower;
    let mut hi = upper;
    let r_lo = residual_fn(&lo)?;

    let mut x = DVector::from_fn(n, |i, _| x0[i].clamp(lo[i], hi[i]));
    let mut r = residual_fn(&x)?;
    let mut r_norm = r.amax();

    let finish = |x: DVector<f64>,
                  residual: DVector<f64>,
                  iterations: usize,
                  status: NewtonStatus|
     -> SolverResult<NewtonResult> {
        let residual_norm = residual.amax();
        Ok(NewtonResult {
            x,
            residual,
            residual_norm,
            iterations,
            status,
        })
    };

    for iter in 0..config.max_iterations {
        // Check convergence
        if r_norm <= config.abs_tol {
            return finish(x, r, iter, NewtonStatus::Converged);
        }

        // Only a residual with the sign of r(lo) moves lo; zero or NaN moves hi.
        for i in 0..n {
            if r[i] * r_lo[i] > 0.0 {
                lo[i] = x[i];
            } else {
                hi[i] = x[i];
            }
        }

        // Solve J * dx = -r
        let jac = jacobian_fn(&x)?;
        let Some(mut dx) = jac.lu().solve(&(-&r)) else {
            return finish(x, r, iter, NewtonStatus::SingularJacobian);
        };
        if dx.iter().any(|v| !v.is_finite()) {
            return finish(x, r, iter, NewtonStatus::SingularJacobian);
        }

        for i in 0..n {
            let step = dx[i].clamp(-config.max_step, config.max_step);
            let target = x[i] + step;
            dx[i] = if target <= lo[i] || target >= hi[i] {
                0.5 * (lo[i] + hi[i]) - x[i]
            } else {
                step
            };
        }

        // Backtracking line search on the largest residual
        let mut alpha = 1.0;
        let mut x_new = &x + &dx;
        let mut r_new = residual_fn(&x_new)?;
        let mut decreased = r_new.amax() < r_norm;
        for _ in 0..config.max_line_search_iters {
            if decreased {
                break;
            }
            alpha *= config.line_search_beta;
            x_new = &x + alpha * &dx;
            r_new = residual_fn(&x_new)?;
            decreased = r_new.amax() < r_norm;
        }
        if !decreased {
            // The full safeguarded step still shrinks the bracket.
            x_new = &x + &dx;
            r_new = residual_fn(&x_new)?;
        }

        let moved = (&x_new - &x).amax();
        x = x_new;
        r = r_new;
        r_norm = r.amax();

        if moved == 0.0 && r_norm > config.abs_tol {
            return finish(x, r, iter + 1, NewtonStatus::LineSearchStagnated);
        }
    }

    if r_norm <= config.abs_tol {
        return finish(x, r, config.max_iterations, NewtonStatus::Converged);
    }
    finish(x, r, config.max_iterations, NewtonStatus::MaxIterations)
}

/// Differentiable strategy for [`SectionSolver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonSolver {
    config: NewtonConfig,
}

impl NewtonSolver {
    pub fn new(config: NewtonConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NewtonConfig {
        &self.config
    }

    /// Initial guess and safeguard bracket per section.
    ///
    /// The guess is the midpoint of the first sign-change cell of a coarse
    /// residual scan; without a sign change it falls back to the geometric
    /// inflow angle atan(v∞/(ωr)) over the whole bracket.
    fn initial_guess(
        &self,
        rotor: &Rotor,
        inflow: &Inflow,
    ) -> (DVector<f64>, DVector<f64>, DVector<f64>) {
        let cfg = &self.config;
        let n = rotor.len();
        let mut x0 = DVector::zeros(n);
        let mut lo = DVector::from_element(n, cfg.phi_lo);
        let mut hi = DVector::from_element(n, cfg.phi_hi);

        for (i, section) in rotor.sections().iter().enumerate() {
            let residual = |phi: f64| section.residual(phi, inflow);
            match scan_sign_change(residual, cfg.phi_lo, cfg.phi_hi, cfg.scan_intervals) {
                Scan::Bracket { a, b, .. } => {
                    lo[i] = a;
                    hi[i] = b;
                    x0[i] = 0.5 * (a + b);
                }
                Scan::NoSignChange { .. } => {
                    let geometric = inflow.v_inf.atan2(inflow.omega * section.radius());
                    x0[i] = geometric.clamp(cfg.phi_lo, cfg.phi_hi);
                }
            }
        }
        (x0, lo, hi)
    }

    /// Full Newton result, including non-converged outcomes.
    pub fn iterate(&self, rotor: &Rotor, inflow: &Inflow) -> SolverResult<NewtonResult> {
        let sections = rotor.sections();
        let residual_fn = |x: &DVector<f64>| -> SolverResult<DVector<f64>> {
            Ok(DVector::from_iterator(
                sections.len(),
                sections.iter().zip(x.iter()).map(|(s, phi)| s.residual(*phi, inflow)),
            ))
        };
        let jacobian_fn = |x: &DVector<f64>| -> SolverResult<DMatrix<f64>> {
            let diag = DVector::from_iterator(
                sections.len(),
                sections
                    .iter()
                    .zip(x.iter())
                    .map(|(s, phi)| s.residual_slope(*phi, inflow)),
            );
            Ok(DMatrix::from_diagonal(&diag))
        };

        let (x0, lo, hi) = self.initial_guess(rotor, inflow);
        newton_solve(x0, lo, hi, residual_fn, jacobian_fn, &self.config)
    }
}

impl SectionSolver for NewtonSolver {
    fn name(&self) -> &'static str {
        "newton"
    }

    fn solve_sections(&self, rotor: &Rotor, inflow: &Inflow) -> SolverResult<Vec<f64>> {
        self.config.validate()?;
        if rotor.is_empty() {
            return Ok(Vec::new());
        }
        let result = self.iterate(rotor, inflow)?;
        if !result.converged() {
            let index = result.worst_component();
            warn!(
                status = ?result.status,
                iterations = result.iterations,
                index,
                residual = result.residual[index],
                "newton solve failed"
            );
            return Err(SolverError::NewtonDivergence {
                index,
                radius: rotor.sections()[index].radius(),
                iterations: result.iterations,
                residual: result.residual[index],
            });
        }
        debug!(
            iterations = result.iterations,
            residual = result.residual_norm,
            "newton solve converged"
        );
        Ok(result.x.iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quadratic_residual(x: &DVector<f64>) -> SolverResult<DVector<f64>> {
        Ok(x.map(|v| v * v - 4.0))
    }

    fn quadratic_jacobian(x: &DVector<f64>) -> SolverResult<DMatrix<f64>> {
        Ok(DMatrix::from_diagonal(&x.map(|v| 2.0 * v)))
    }

    #[test]
    fn simple_quadratic() {
        // Solve x^2 - 4 = 0, x > 0
        let config = NewtonConfig {
            max_step: 10.0,
            ..NewtonConfig::default()
        };
        let result = newton_solve(
            DVector::from_element(1, 3.0),
            DVector::from_element(1, 0.0),
            DVector::from_element(1, 10.0),
            quadratic_residual,
            quadratic_jacobian,
            &config,
        )
        .unwrap();

        assert!(result.converged());
        assert!((result.x[0] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn bracket_keeps_iterates_on_the_requested_root() {
        // Unprotected Newton from 0.1 jumps far right; the bracket holds it.
        let config = NewtonConfig {
            max_step: 100.0,
            max_iterations: 100,
            ..NewtonConfig::default()
        };
        let result = newton_solve(
            DVector::from_vec(vec![0.1, 5.0]),
            DVector::from_vec(vec![0.0, 1.0]),
            DVector::from_vec(vec![3.0, 6.0]),
            quadratic_residual,
            quadratic_jacobian,
            &config,
        )
        .unwrap();
        assert!(result.converged());
        assert!((result.x[0] - 2.0).abs() < 1e-10);
        assert!((result.x[1] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn root_on_the_lower_bound_stays_bracketed() {
        // x³ = 0 on [0, 1]: the residual at the lower bound is exactly zero.
        let config = NewtonConfig {
            max_iterations: 100,
            ..NewtonConfig::default()
        };
        let result = newton_solve(
            DVector::from_element(1, 0.9),
            DVector::from_element(1, 0.0),
            DVector::from_element(1, 1.0),
            |x: &DVector<f64>| Ok(x.map(|v| v * v * v)),
            |x: &DVector<f64>| Ok(DMatrix::from_diagonal(&x.map(|v| 3.0 * v * v))),
            &config,
        )
        .unwrap();
        assert!(result.converged());
        assert!(result.x[0] >= 0.0 && result.x[0] < 1e-3);
    }

    #[test]
    fn singular_jacobian_is_reported() {
        let result = newton_solve(
            DVector::from_element(1, 1.0),
            DVector::from_element(1, 0.0),
            DVector::from_element(1, 3.0),
            quadratic_residual,
            |x: &DVector<f64>| Ok(DMatrix::zeros(x.len(), x.len())),
            &NewtonConfig::default(),
        )
        .unwrap();
        assert_eq!(result.status, NewtonStatus::SingularJacobian);
    }

    #[test]
    fn iteration_budget_is_reported() {
        let config = NewtonConfig {
            max_iterations: 1,
            ..NewtonConfig::default()
        };
        let result = newton_solve(
            DVector::from_element(1, 2.9),
            DVector::from_element(1, 0.0),
            DVector::from_element(1, 3.0),
            quadratic_residual,
            quadratic_jacobian,
            &config,
        )
        .unwrap();
        assert_eq!(result.status, NewtonStatus::MaxIterations);
        assert_eq!(result.worst_component(), 0);
    }
}
