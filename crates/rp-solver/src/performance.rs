//! Non-dimensional rotor performance.
//!
//! Coefficients use revolutions per second n = rpm/60 and diameter D:
//!
//! ```text
//! J  = v∞/(n·D)
//! CT = T/(ρ·n²·D⁴)     CQ = Q/(ρ·n²·D⁵)     CP = 2π·CQ
//! FM = T·(v∞/2 + √((v∞/2)² + T/(2ρA))) / P
//! η  = CT·J/CP
//! ```
//!
//! FM and η are NaN where they are undefined (T ≤ 0 or P ≤ 0 for FM,
//! CP ≈ 0 for η).

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// |CP| below which η is reported as NaN.
pub const CP_EPSILON: f64 = 1e-12;

/// Coefficients of one operating point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotorCoefficients {
    pub ct: f64,
    pub cq: f64,
    pub cp: f64,
    /// Figure of merit
    pub fm: f64,
    /// Propulsive efficiency
    pub eta: f64,
    /// Advance ratio
    pub j: f64,
}

/// Ideal momentum-theory power of a uniformly loaded disk [W].
pub fn ideal_power(thrust: f64, v_inf: f64, rho: f64, disk_area: f64) -> f64 {
    let half_v = 0.5 * v_inf;
    thrust * (half_v + (half_v * half_v + thrust / (2.0 * rho * disk_area)).sqrt())
}

/// Coefficients from rotor totals (SI units, rpm in rev/min).
pub fn aggregate(
    thrust: f64,
    torque: f64,
    power: f64,
    v_inf: f64,
    rpm: f64,
    rho: f64,
    blade_radius: f64,
) -> RotorCoefficients {
    let n = rpm / 60.0;
    let d = 2.0 * blade_radius;
    let area = PI * blade_radius * blade_radius;
    let j = v_inf / (n * d);

    let ct = thrust / (rho * n * n * d.powi(4));
    let cq = torque / (rho * n * n * d.powi(5));
    let cp = 2.0 * PI * cq;

    let fm = if thrust > 0.0 && power > 0.0 {
        ideal_power(thrust, v_inf, rho, area) / power
    } else {
        f64::NAN
    };
    let eta = if cp.abs() > CP_EPSILON {
        ct * j / cp
    } else {
        f64::NAN
    };

    RotorCoefficients {
        ct,
        cq,
        cp,
        fm,
        eta,
        j,
    }
}
