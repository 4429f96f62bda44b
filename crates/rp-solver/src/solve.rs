//! Strategy selection at run time.

use rp_rotor::Rotor;

use crate::bemt::{BemtSolver, FluidProperties, PerformanceRecord};
use crate::bracketing::BracketingSolver;
use crate::config::{SolverKind, SolverSettings};
use crate::error::SolverResult;
use crate::newton::NewtonSolver;
use crate::strategy::SectionSolver;

/// The section solver named by `settings.kind`.
pub fn strategy_for(settings: &SolverSettings) -> Box<dyn SectionSolver> {
    match settings.kind {
        SolverKind::Robust => Box::new(BracketingSolver::new(settings.bracket)),
        SolverKind::Newton => Box::new(NewtonSolver::new(settings.newton)),
    }
}

/// Solve one operating point with the strategy chosen in `settings`.
pub fn solve_point(
    rotor: &Rotor,
    fluid: FluidProperties,
    settings: &SolverSettings,
    v_inf: f64,
    rpm: f64,
) -> SolverResult<PerformanceRecord> {
    BemtSolver::new(rotor, fluid, strategy_for(settings)).run(v_inf, rpm)
}
