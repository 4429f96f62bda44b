//! Closed-form piecewise polynomial polars.
//!
//! Each family splits the angle of attack into three regimes:
//!
//! ```text
//!   low:  α <  α_lo    c0 + c1·(α - α_lo) + c2·(α - α_lo)² + c3·(α - α_lo)³
//!   main: α_lo ≤ α ≤ α_hi    c0 + c1·α + c2·α² + c3·α³
//!   high: α >  α_hi    c0 + c1·(α - α_hi) + c2·(α - α_hi)² + c3·(α - α_hi)³
//! ```
//!
//! The outer regimes are stored relative to their boundary and their
//! constant term is the main polynomial evaluated at that boundary, so every
//! polar is continuous across regimes (its slope generally is not).

use crate::polar::PolarPoint;
use std::fmt;

/// Cubic in ascending powers.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cubic([f64; 4]);

impl Cubic {
    fn eval(&self, x: f64) -> f64 {
        let c = &self.0;
        c[0] + x * (c[1] + x * (c[2] + x * c[3]))
    }

    fn slope(&self, x: f64) -> f64 {
        let c = &self.0;
        c[1] + x * (2.0 * c[2] + 3.0 * x * c[3])
    }
}

/// Coefficients for one coefficient curve (Cl or Cd).
#[derive(Debug, Clone, Copy)]
struct RegimeFit {
    /// c1..c3 of the low regime, in powers of (α - α_lo)
    low: [f64; 3],
    /// c0..c3 of the main regime, in powers of α
    main: [f64; 4],
    /// c1..c3 of the high regime, in powers of (α - α_hi)
    high: [f64; 3],
}

/// Assembled three-regime curve.
#[derive(Debug, Clone, Copy, PartialEq)]
struct PiecewiseCurve {
    alpha_lo: f64,
    alpha_hi: f64,
    low: Cubic,
    main: Cubic,
    high: Cubic,
}

impl PiecewiseCurve {
    fn assemble(fit: RegimeFit, alpha_lo: f64, alpha_hi: f64) -> Self {
        let main = Cubic(fit.main);
        let low = Cubic([main.eval(alpha_lo), fit.low[0], fit.low[1], fit.low[2]]);
        let high = Cubic([main.eval(alpha_hi), fit.high[0], fit.high[1], fit.high[2]]);
        Self {
            alpha_lo,
            alpha_hi,
            low,
            main,
            high,
        }
    }

    fn eval_with_slope(&self, alpha: f64) -> (f64, f64) {
        if alpha < self.alpha_lo {
            let x = alpha - self.alpha_lo;
            (self.low.eval(x), self.low.slope(x))
        } else if alpha > self.alpha_hi {
            let x = alpha - self.alpha_hi;
            (self.high.eval(x), self.high.slope(x))
        } else {
            (self.main.eval(alpha), self.main.slope(alpha))
        }
    }
}

/// Airfoil families with built-in closed-form polars.
///
/// The fits are representative low-speed data (Re of a few hundred
/// thousand) extended to ±90° with smooth post-stall tails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AirfoilFamily {
    ClarkY,
    Naca0012,
    Naca4412,
}

impl AirfoilFamily {
    pub const ALL: [AirfoilFamily; 3] = [Self::ClarkY, Self::Naca0012, Self::Naca4412];

    /// Canonical catalog name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ClarkY => "CLARKY",
            Self::Naca0012 => "NACA0012",
            Self::Naca4412 => "NACA4412",
        }
    }

    /// Regime boundaries (α_lo, α_hi) in degrees.
    pub fn regime_bounds(&self) -> (f64, f64) {
        match self {
            Self::ClarkY => (-10.0, 18.0),
            Self::Naca0012 => (-14.0, 14.0),
            Self::Naca4412 => (-10.0, 16.0),
        }
    }

    fn lift_fit(&self) -> RegimeFit {
        match self {
            Self::ClarkY => RegimeFit {
                low: [0.01, 2.0e-4, 0.0],
                main: [0.36, 0.1, -1.333e-4, -1.422e-4],
                high: [-0.015, -1.0e-4, 0.0],
            },
            Self::Naca0012 => RegimeFit {
                low: [-0.02, 1.0e-4, 0.0],
                main: [0.0, 0.11, 0.0, -1.5e-4],
                high: [-0.02, -1.0e-4, 0.0],
            },
            Self::Naca4412 => RegimeFit {
                low: [0.01, 2.0e-4, 0.0],
                main: [0.45, 0.105, -2.0e-4, -1.2e-4],
                high: [-0.025, -1.0e-4, 0.0],
            },
        }
    }

    fn drag_fit(&self) -> RegimeFit {
        match self {
            Self::ClarkY => RegimeFit {
                low: [-0.004, 2.0e-4, 0.0],
                main: [0.0075, 1.5e-4, 1.2e-4, 0.0],
                high: [0.012, 2.0e-4, 0.0],
            },
            Self::Naca0012 => RegimeFit {
                low: [-0.015, 2.0e-4, 0.0],
                main: [0.0065, 0.0, 1.0e-4, 0.0],
                high: [0.015, 2.0e-4, 0.0],
            },
            Self::Naca4412 => RegimeFit {
                low: [-0.004, 2.0e-4, 0.0],
                main: [0.0070, 1.0e-4, 1.1e-4, 0.0],
                high: [0.012, 2.0e-4, 0.0],
            },
        }
    }
}

impl fmt::Display for AirfoilFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Closed-form polar of one [`AirfoilFamily`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedFormPolar {
    family: AirfoilFamily,
    cl: PiecewiseCurve,
    cd: PiecewiseCurve,
}

impl ClosedFormPolar {
    pub fn for_family(family: AirfoilFamily) -> Self {
        let (alpha_lo, alpha_hi) = family.regime_bounds();
        Self {
            family,
            cl: PiecewiseCurve::assemble(family.lift_fit(), alpha_lo, alpha_hi),
            cd: PiecewiseCurve::assemble(family.drag_fit(), alpha_lo, alpha_hi),
        }
    }

    pub fn family(&self) -> AirfoilFamily {
        self.family
    }

    pub fn lookup(&self, alpha_deg: f64) -> PolarPoint {
        let (cl, dcl_dalpha) = self.cl.eval_with_slope(alpha_deg);
        let (cd, dcd_dalpha) = self.cd.eval_with_slope(alpha_deg);
        PolarPoint {
            cl,
            cd,
            dcl_dalpha,
            dcd_dalpha,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clarky_linear_range_is_plausible() {
        let polar = ClosedFormPolar::for_family(AirfoilFamily::ClarkY);
        let p0 = polar.lookup(0.0);
        assert!((p0.cl - 0.36).abs() < 1e-12);
        assert!((p0.dcl_dalpha - 0.1).abs() < 1e-12);
        assert!(p0.cd > 0.0 && p0.cd < 0.01);
        // Zero lift a few degrees negative.
        assert!(polar.lookup(-4.0).cl < 0.0);
        assert!(polar.lookup(-3.0).cl > 0.0);
    }

    #[test]
    fn naca0012_is_symmetric() {
        let polar = ClosedFormPolar::for_family(AirfoilFamily::Naca0012);
        for alpha in [0.0, 3.0, 10.0, 14.0, 20.0, 45.0, 80.0] {
            let pos = polar.lookup(alpha);
            let neg = polar.lookup(-alpha);
            assert!((pos.cl + neg.cl).abs() < 1e-12, "alpha {alpha}");
            assert!((pos.cd - neg.cd).abs() < 1e-12, "alpha {alpha}");
        }
    }

    #[test]
    fn regimes_meet_at_boundaries() {
        for family in AirfoilFamily::ALL {
            let polar = ClosedFormPolar::for_family(family);
            let (lo, hi) = family.regime_bounds();
            for boundary in [lo, hi] {
                let below = polar.lookup(boundary - 1e-9);
                let above = polar.lookup(boundary + 1e-9);
                assert!((below.cl - above.cl).abs() < 1e-8, "{family} cl at {boundary}");
                assert!((below.cd - above.cd).abs() < 1e-8, "{family} cd at {boundary}");
            }
        }
    }

    #[test]
    fn drag_stays_positive_over_blade_range() {
        for family in AirfoilFamily::ALL {
            let polar = ClosedFormPolar::for_family(family);
            let mut alpha = -90.0;
            while alpha <= 90.0 {
                assert!(polar.lookup(alpha).cd > 0.0, "{family} at {alpha}");
                alpha += 0.5;
            }
        }
    }
}
