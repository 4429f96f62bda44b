//! Polars interpolated from sampled (α, Cl, Cd) data.

use crate::error::{AirfoilError, AirfoilResult};
use crate::polar::PolarPoint;
use rp_core::{CubicSpline, Extrapolation};

/// Natural cubic splines through sampled lift and drag coefficients.
///
/// Outside the sampled α range the configured [`Extrapolation`] applies to
/// both coefficients. `Hold` (the default) keeps the end values, which keeps
/// drag positive however far a blade section is driven into stall. Drag is
/// floored at zero where the spline undershoots between samples.
#[derive(Debug, Clone)]
pub struct TabulatedPolar {
    name: String,
    cl: CubicSpline,
    cd: CubicSpline,
}

impl TabulatedPolar {
    pub fn new(
        name: impl Into<String>,
        alpha_deg: &[f64],
        cl: &[f64],
        cd: &[f64],
        extrapolation: Extrapolation,
    ) -> AirfoilResult<Self> {
        let name = name.into();
        let invalid = |what: String| AirfoilError::InvalidTable {
            name: name.clone(),
            what,
        };

        if cd.iter().any(|&v| v < 0.0) {
            return Err(invalid("drag coefficients must be non-negative".into()));
        }
        let cl_spline = CubicSpline::new(alpha_deg, cl, extrapolation)
            .map_err(|e| invalid(format!("lift: {e}")))?;
        let cd_spline = CubicSpline::new(alpha_deg, cd, extrapolation)
            .map_err(|e| invalid(format!("drag: {e}")))?;

        Ok(Self {
            name,
            cl: cl_spline,
            cd: cd_spline,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.cl.extrapolation()
    }

    /// Sampled α range in degrees.
    pub fn alpha_range(&self) -> (f64, f64) {
        self.cl.domain()
    }

    pub fn lookup(&self, alpha_deg: f64) -> PolarPoint {
        let (cl, dcl_dalpha) = self.cl.eval_with_slope(alpha_deg);
        let (cd, dcd_dalpha) = match self.cd.eval_with_slope(alpha_deg) {
            (cd, _) if cd < 0.0 => (0.0, 0.0),
            sample => sample,
        };
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

    fn sample_table(extrapolation: Extrapolation) -> TabulatedPolar {
        TabulatedPolar::new(
            "sample",
            &[-8.0, -4.0, 0.0, 4.0, 8.0, 12.0],
            &[-0.45, -0.02, 0.40, 0.82, 1.18, 1.30],
            &[0.016, 0.010, 0.008, 0.011, 0.019, 0.040],
            extrapolation,
        )
        .unwrap()
    }

    #[test]
    fn interpolates_inside_range() {
        let polar = sample_table(Extrapolation::Hold);
        let p = polar.lookup(4.0);
        assert!((p.cl - 0.82).abs() < 1e-12);
        assert!((p.cd - 0.011).abs() < 1e-12);
        let mid = polar.lookup(2.0);
        assert!(mid.cl > 0.40 && mid.cl < 0.82);
        assert!(mid.dcl_dalpha > 0.0);
    }

    #[test]
    fn hold_policy_keeps_end_values() {
        let polar = sample_table(Extrapolation::Hold);
        let far = polar.lookup(60.0);
        assert!((far.cl - 1.30).abs() < 1e-12);
        assert!((far.cd - 0.040).abs() < 1e-12);
        assert_eq!(far.dcl_dalpha, 0.0);
        let below = polar.lookup(-70.0);
        assert!((below.cl + 0.45).abs() < 1e-12);
    }

    #[test]
    fn linear_policy_continues_end_tangent() {
        let polar = sample_table(Extrapolation::Linear);
        let edge = polar.lookup(12.0);
        let beyond = polar.lookup(14.0);
        assert!((beyond.cl - (edge.cl + 2.0 * edge.dcl_dalpha)).abs() < 1e-12);
        assert_eq!(polar.extrapolation(), Extrapolation::Linear);
        assert_eq!(polar.alpha_range(), (-8.0, 12.0));
    }

    #[test]
    fn drag_never_undershoots_below_zero() {
        // A flat zero-drag bucket between steep walls makes the natural spline dip.
        let polar = TabulatedPolar::new(
            "bucket",
            &[-20.0, -10.0, 0.0, 10.0, 20.0],
            &[-1.2, -0.6, 0.0, 0.6, 1.2],
            &[0.3, 0.0, 0.0, 0.0, 0.3],
            Extrapolation::Hold,
        )
        .unwrap();
        for alpha in [-7.0, -5.0, -2.5, 2.5, 5.0, 7.0] {
            let p = polar.lookup(alpha);
            assert_eq!(p.cd, 0.0, "alpha {alpha}");
            assert_eq!(p.dcd_dalpha, 0.0);
        }
        assert!(polar.lookup(15.0).cd > 0.0);
        assert!((polar.lookup(20.0).cd - 0.3).abs() < 1e-12);
    }

    #[test]
    fn rejects_negative_drag() {
        let err = TabulatedPolar::new(
            "bad",
            &[0.0, 1.0],
            &[0.0, 0.1],
            &[0.01, -0.01],
            Extrapolation::Hold,
        )
        .unwrap_err();
        assert!(matches!(err, AirfoilError::InvalidTable { .. }));
    }

    #[test]
    fn rejects_unsorted_alpha() {
        let err = TabulatedPolar::new(
            "bad",
            &[0.0, 2.0, 1.0],
            &[0.0, 0.1, 0.2],
            &[0.01, 0.01, 0.01],
            Extrapolation::Hold,
        )
        .unwrap_err();
        assert!(err.to_string().contains("bad"));
    }
}
