//! rp-airfoil: section lift/drag polars for rotorperf.
//!
//! Provides:
//! - `AirfoilPolar`, a closed set of polar representations (tabulated spline,
//!   closed-form piecewise polynomial families)
//! - `AirfoilCatalog`, which resolves airfoil names to shared polars once, at
//!   rotor build time
//!
//! Angles of attack are in degrees throughout this crate. Every polar is
//! defined over the whole real line; out-of-range behaviour is part of the
//! polar's definition, never an error.

pub mod catalog;
pub mod closed_form;
pub mod error;
pub mod polar;
pub mod tabulated;

pub use catalog::AirfoilCatalog;
pub use closed_form::{AirfoilFamily, ClosedFormPolar};
pub use error::{AirfoilError, AirfoilResult};
pub use polar::{AirfoilPolar, PolarPoint};
pub use tabulated::TabulatedPolar;

pub use rp_core::Extrapolation;
