//! Blade-element momentum solvers for rotorperf.
//!
//! Two strategies solve the same per-section residual behind
//! [`SectionSolver`]:
//! - [`BracketingSolver`]: sign-change scan + Brent, derivative-free
//! - [`NewtonSolver`]: Newton on the stacked inflow angles with the analytic
//!   Jacobian, plus implicit-function sensitivities
//!
//! [`BemtSolver`] turns converged inflow angles into loads and hands the
//! totals to [`aggregate`]. [`sweep::run_sweep`] evaluates many operating
//! points in parallel.

pub mod bemt;
pub mod bracketing;
pub mod config;
pub mod error;
pub mod jacobian;
pub mod newton;
pub mod performance;
pub mod sensitivities;
pub mod solve;
pub mod strategy;
pub mod sweep;

pub use bemt::{
    BemtSolver, FluidProperties, OperatingPoint, PerformanceRecord, SectionRecord,
    validate_operating_point,
};
pub use bracketing::{BracketingSolver, brent};
pub use config::{BracketConfig, NewtonConfig, SolverKind, SolverSettings};
pub use error::{SolverError, SolverResult};
pub use newton::{NewtonResult, NewtonSolver, NewtonStatus, newton_solve};
pub use performance::{RotorCoefficients, aggregate, ideal_power};
pub use sensitivities::{Gradient, Sensitivities, finite_difference_operating_matrix};
pub use solve::{solve_point, strategy_for};
pub use strategy::SectionSolver;
pub use sweep::{
    SweepDefinition, SweepPoint, SweepProgress, SweepQuantity, SweepSpacing, run_sweep,
};
