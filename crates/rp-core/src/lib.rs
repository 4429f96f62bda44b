//! rp-core: stable foundation for rotorperf.
//!
//! Contains:
//! - units (uom SI types + constructors)
//! - numeric (Real + tolerances + float helpers)
//! - interp (cubic and Akima splines with explicit extrapolation)
//! - error (shared error types)

pub mod error;
pub mod interp;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use interp::{AkimaSpline, CubicSpline, Extrapolation};
pub use numeric::*;
pub use units::*;
