//! Rotor geometry and blade-element equations.
//!
//! A [`Rotor`] is an immutable, ordered set of [`BladeSection`]s produced by
//! [`RotorGeometryBuilder`]. Each section owns the blade-element momentum
//! equations for its annulus: given a candidate inflow angle φ it yields the
//! tip/hub loss factor, airfoil coefficients, induction factors, the BEMT
//! residual R(φ) and, at convergence, its elemental thrust and torque.
//! Sections hold no state between calls; solvers drive them.

pub mod builder;
pub mod error;
pub mod loss;
pub mod rotor;
pub mod section;

pub use builder::{AirfoilAssignment, RotorGeometryBuilder};
pub use error::{RotorError, RotorResult};
pub use loss::{loss_factor, loss_factor_with_slope, prandtl_component};
pub use rotor::Rotor;
pub use section::{BladeSection, Inflow, LoadPartials, Partials, SectionEval, SectionState, var};
