//! The closed set of polar representations.

use crate::closed_form::ClosedFormPolar;
use crate::tabulated::TabulatedPolar;

/// Section coefficients at one angle of attack, with their slopes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPoint {
    pub cl: f64,
    pub cd: f64,
    /// dCl/dα per degree
    pub dcl_dalpha: f64,
    /// dCd/dα per degree
    pub dcd_dalpha: f64,
}

/// Lift/drag polar of one airfoil.
///
/// The representation is chosen once when the polar is resolved; lookups
/// never re-dispatch on names.
#[derive(Debug, Clone)]
pub enum AirfoilPolar {
    /// Spline through user-supplied samples.
    Tabulated(TabulatedPolar),
    /// Piecewise polynomial fit of a known family.
    ClosedForm(ClosedFormPolar),
}

impl AirfoilPolar {
    pub fn name(&self) -> &str {
        match self {
            Self::Tabulated(p) => p.name(),
            Self::ClosedForm(p) => p.family().name(),
        }
    }

    /// Coefficients and slopes at `alpha_deg`.
    pub fn lookup(&self, alpha_deg: f64) -> PolarPoint {
        match self {
            Self::Tabulated(p) => p.lookup(alpha_deg),
            Self::ClosedForm(p) => p.lookup(alpha_deg),
        }
    }

    pub fn coefficients(&self, alpha_deg: f64) -> (f64, f64) {
        let point = self.lookup(alpha_deg);
        (point.cl, point.cd)
    }

    pub fn lift_coefficient(&self, alpha_deg: f64) -> f64 {
        self.lookup(alpha_deg).cl
    }

    pub fn drag_coefficient(&self, alpha_deg: f64) -> f64 {
        self.lookup(alpha_deg).cd
    }
}

impl From<TabulatedPolar> for AirfoilPolar {
    fn from(p: TabulatedPolar) -> Self {
        Self::Tabulated(p)
    }
}

impl From<ClosedFormPolar> for AirfoilPolar {
    fn from(p: ClosedFormPolar) -> Self {
        Self::ClosedForm(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::closed_form::AirfoilFamily;
    use rp_core::Extrapolation;

    #[test]
    fn dispatch_matches_inner_polar() {
        let inner = ClosedFormPolar::for_family(AirfoilFamily::ClarkY);
        let polar = AirfoilPolar::from(inner.clone());
        assert_eq!(polar.lookup(4.0), inner.lookup(4.0));
        assert_eq!(polar.name(), "CLARKY");
    }

    #[test]
    fn scalar_accessors_agree_with_lookup() {
        let table = TabulatedPolar::new(
            "flat",
            &[-10.0, 0.0, 10.0],
            &[-1.0, 0.0, 1.0],
            &[0.02, 0.01, 0.02],
            Extrapolation::Hold,
        )
        .unwrap();
        let polar = AirfoilPolar::from(table);
        let point = polar.lookup(5.0);
        assert_eq!(polar.lift_coefficient(5.0), point.cl);
        assert_eq!(polar.drag_coefficient(5.0), point.cd);
        assert_eq!(polar.coefficients(5.0), (point.cl, point.cd));
    }
}
