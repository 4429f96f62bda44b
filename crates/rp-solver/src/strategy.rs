//! The seam between the rotor model and its root-finding strategies.

use rp_rotor::{Inflow, Rotor};

use crate::error::SolverResult;

/// Finds the inflow angle φ* of every section of a rotor.
///
/// Implementations solve the same residual R(φ) and must agree at
/// convergence; they differ in numerical contract only.
pub trait SectionSolver: Send + Sync {
    /// Short name for logs and reports.
    fn name(&self) -> &'static str;

    /// φ* per section, in section order.
    fn solve_sections(&self, rotor: &Rotor, inflow: &Inflow) -> SolverResult<Vec<f64>>;
}

impl<S: SectionSolver + ?Sized> SectionSolver for &S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve_sections(&self, rotor: &Rotor, inflow: &Inflow) -> SolverResult<Vec<f64>> {
        (**self).solve_sections(rotor, inflow)
    }
}

impl<S: SectionSolver + ?Sized> SectionSolver for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve_sections(&self, rotor: &Rotor, inflow: &Inflow) -> SolverResult<Vec<f64>> {
        (**self).solve_sections(rotor, inflow)
    }
}
