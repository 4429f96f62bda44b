//! One-dimensional interpolants with explicit extrapolation.
//!
//! Two families are provided:
//! - [`CubicSpline`]: natural cubic spline, used for tabulated airfoil polars.
//! - [`AkimaSpline`]: Akima (1970) local spline, used for blade geometry
//!   distributions where overshoot between samples must stay small.
//!
//! Both return values and first derivatives so callers can build analytic
//! Jacobians on top of them.

use crate::error::{CoreError, CoreResult};

/// Behaviour outside the sampled range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Extrapolation {
    /// Constant end value, zero slope.
    #[default]
    Hold,
    /// Continue along the end tangent.
    Linear,
    /// Evaluate the end segment's polynomial beyond the range.
    Polynomial,
}

fn validate_samples(x: &[f64], y: &[f64], what: &str) -> CoreResult<()> {
    if x.len() != y.len() {
        return Err(CoreError::InvalidArg {
            what: format!(
                "{what}: sample length mismatch ({} abscissae, {} ordinates)",
                x.len(),
                y.len()
            ),
        });
    }
    if x.len() < 2 {
        return Err(CoreError::InvalidArg {
            what: format!("{what}: at least 2 samples required, got {}", x.len()),
        });
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err(CoreError::InvalidArg {
            what: format!("{what}: samples must be finite"),
        });
    }
    if x.windows(2).any(|w| w[1] <= w[0]) {
        return Err(CoreError::InvalidArg {
            what: format!("{what}: abscissae must be strictly increasing"),
        });
    }
    Ok(())
}

/// Index of the segment `[x[i], x[i+1]]` used for `xq` (clamped to the ends).
fn segment_index(x: &[f64], xq: f64) -> usize {
    let upper = x.partition_point(|&xi| xi <= xq);
    upper.saturating_sub(1).min(x.len() - 2)
}

/// Natural cubic spline (zero curvature at both ends).
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivatives at the knots.
    m: Vec<f64>,
    extrapolation: Extrapolation,
}

impl CubicSpline {
    pub fn new(x: &[f64], y: &[f64], extrapolation: Extrapolation) -> CoreResult<Self> {
        validate_samples(x, y, "cubic spline")?;
        let n = x.len();
        let mut m = vec![0.0; n];

        if n > 2 {
            // Thomas algorithm on the interior knots.
            let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
            let interior = n - 2;
            let mut c_prime = vec![0.0; interior];
            let mut d_prime = vec![0.0; interior];

            for k in 0..interior {
                let sub = h[k];
                let diag = 2.0 * (h[k] + h[k + 1]);
                let sup = h[k + 1];
                let rhs = 6.0 * ((y[k + 2] - y[k + 1]) / h[k + 1] - (y[k + 1] - y[k]) / h[k]);

                if k == 0 {
                    c_prime[k] = sup / diag;
                    d_prime[k] = rhs / diag;
                } else {
                    let denom = diag - sub * c_prime[k - 1];
                    c_prime[k] = sup / denom;
                    d_prime[k] = (rhs - sub * d_prime[k - 1]) / denom;
                }
            }

            m[interior] = d_prime[interior - 1];
            for k in (0..interior - 1).rev() {
                m[k + 1] = d_prime[k] - c_prime[k] * m[k + 2];
            }
        }

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
            extrapolation,
        })
    }

    pub fn extrapolation(&self) -> Extrapolation {
        self.extrapolation
    }

    /// Sampled range `(x_min, x_max)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    fn segment_eval(&self, i: usize, xq: f64) -> (f64, f64) {
        let (x0, x1) = (self.x[i], self.x[i + 1]);
        let (y0, y1) = (self.y[i], self.y[i + 1]);
        let (m0, m1) = (self.m[i], self.m[i + 1]);
        let h = x1 - x0;
        let a = x1 - xq;
        let b = xq - x0;
        let lin0 = y0 / h - m0 * h / 6.0;
        let lin1 = y1 / h - m1 * h / 6.0;

        let value = m0 * a.powi(3) / (6.0 * h) + m1 * b.powi(3) / (6.0 * h) + lin0 * a + lin1 * b;
        let slope = -m0 * a * a / (2.0 * h) + m1 * b * b / (2.0 * h) - lin0 + lin1;
        (value, slope)
    }

    /// Value and first derivative at `xq`.
    pub fn eval_with_slope(&self, xq: f64) -> (f64, f64) {
        let n = self.x.len();
        let (lo, hi) = self.domain();
        let outside_end = if xq < lo {
            Some((0, lo))
        } else if xq > hi {
            Some((n - 2, hi))
        } else {
            None
        };

        match (outside_end, self.extrapolation) {
            (None, _) | (Some(_), Extrapolation::Polynomial) => {
                self.segment_eval(segment_index(&self.x, xq), xq)
            }
            (Some((seg, end)), Extrapolation::Hold) => (self.segment_eval(seg, end).0, 0.0),
            (Some((seg, end)), Extrapolation::Linear) => {
                let (value, slope) = self.segment_eval(seg, end);
                (value + slope * (xq - end), slope)
            }
        }
    }

    pub fn eval(&self, xq: f64) -> f64 {
        self.eval_with_slope(xq).0
    }
}

/// Akima spline: C1 piecewise cubic whose knot slopes are weighted by the
/// local change in secant slopes.
#[derive(Debug, Clone)]
pub struct AkimaSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    slopes: Vec<f64>,
    extrapolation: Extrapolation,
}

impl AkimaSpline {
    pub fn new(x: &[f64], y: &[f64], extrapolation: Extrapolation) -> CoreResult<Self> {
        validate_samples(x, y, "akima spline")?;
        let n = x.len();
        let secants: Vec<f64> = x
            .windows(2)
            .zip(y.windows(2))
            .map(|(xw, yw)| (yw[1] - yw[0]) / (xw[1] - xw[0]))
            .collect();

        let slopes = if n == 2 {
            vec![secants[0]; 2]
        } else {
            // Two ghost secants on each side, extended linearly.
            let mut ext = vec![0.0; n + 3];
            ext[2..=n].copy_from_slice(&secants);
            ext[1] = 2.0 * ext[2] - ext[3];
            ext[0] = 2.0 * ext[1] - ext[2];
            ext[n + 1] = 2.0 * ext[n] - ext[n - 1];
            ext[n + 2] = 2.0 * ext[n + 1] - ext[n];

            (0..n)
                .map(|i| {
                    let w_right = (ext[i + 3] - ext[i + 2]).abs();
                    let w_left = (ext[i + 1] - ext[i]).abs();
                    let total = w_right + w_left;
                    if total <= 1e-14 * (ext[i + 1].abs() + ext[i + 2].abs()).max(1e-300) {
                        0.5 * (ext[i + 1] + ext[i + 2])
                    } else {
                        (w_right * ext[i + 1] + w_left * ext[i + 2]) / total
                    }
                })
                .collect()
        };

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            slopes,
            extrapolation,
        })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    fn segment_eval(&self, i: usize, xq: f64) -> (f64, f64) {
        let h = self.x[i + 1] - self.x[i];
        let secant = (self.y[i + 1] - self.y[i]) / h;
        let (s0, s1) = (self.slopes[i], self.slopes[i + 1]);
        let c = (3.0 * secant - 2.0 * s0 - s1) / h;
        let d = (s0 + s1 - 2.0 * secant) / (h * h);
        let dx = xq - self.x[i];
        (
            self.y[i] + dx * (s0 + dx * (c + dx * d)),
            s0 + dx * (2.0 * c + 3.0 * d * dx),
        )
    }

    pub fn eval_with_slope(&self, xq: f64) -> (f64, f64) {
        let n = self.x.len();
        let (lo, hi) = self.domain();
        let outside_end = if xq < lo {
            Some((0, lo))
        } else if xq > hi {
            Some((n - 2, hi))
        } else {
            None
        };

        match (outside_end, self.extrapolation) {
            (None, _) | (Some(_), Extrapolation::Polynomial) => {
                self.segment_eval(segment_index(&self.x, xq), xq)
            }
            (Some((seg, end)), Extrapolation::Hold) => (self.segment_eval(seg, end).0, 0.0),
            (Some((seg, end)), Extrapolation::Linear) => {
                let (value, slope) = self.segment_eval(seg, end);
                (value + slope * (xq - end), slope)
            }
        }
    }

    pub fn eval(&self, xq: f64) -> f64 {
        self.eval_with_slope(xq).0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cubic_passes_through_knots() {
        let x = [-4.0, -1.0, 0.0, 3.0, 8.0];
        let y = [0.2, -0.1, 0.4, 1.1, 0.9];
        let s = CubicSpline::new(&x, &y, Extrapolation::Hold).unwrap();
        for (xi, yi) in x.iter().zip(y.iter()) {
            assert!((s.eval(*xi) - yi).abs() < 1e-12);
        }
    }

    #[test]
    fn cubic_slope_matches_finite_difference() {
        let x = [0.0, 1.0, 2.5, 4.0];
        let y = [0.0, 0.8, 0.3, 1.5];
        let s = CubicSpline::new(&x, &y, Extrapolation::Hold).unwrap();
        let h = 1e-6;
        for xq in [0.3, 1.7, 3.2] {
            let fd = (s.eval(xq + h) - s.eval(xq - h)) / (2.0 * h);
            assert!((s.eval_with_slope(xq).1 - fd).abs() < 1e-6);
        }
    }

    #[test]
    fn cubic_reproduces_linear_data() {
        let x = [0.0, 1.0, 3.0, 4.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v - 1.0).collect();
        let s = CubicSpline::new(&x, &y, Extrapolation::Linear).unwrap();
        assert!((s.eval(2.0) - 3.0).abs() < 1e-12);
        assert!((s.eval(6.0) - 11.0).abs() < 1e-12);
    }

    #[test]
    fn hold_extrapolation_is_flat() {
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 2.0, 5.0];
        let s = CubicSpline::new(&x, &y, Extrapolation::Hold).unwrap();
        assert_eq!(s.eval_with_slope(10.0), (5.0, 0.0));
        assert_eq!(s.eval_with_slope(-3.0), (1.0, 0.0));
    }

    #[test]
    fn linear_extrapolation_follows_end_tangent() {
        let x = [0.0, 1.0, 2.0];
        let y = [1.0, 2.0, 5.0];
        let s = CubicSpline::new(&x, &y, Extrapolation::Linear).unwrap();
        let (v_end, slope_end) = s.eval_with_slope(2.0);
        let (v, slope) = s.eval_with_slope(3.0);
        assert!((v - (v_end + slope_end)).abs() < 1e-12);
        assert!((slope - slope_end).abs() < 1e-12);
    }

    #[test]
    fn two_samples_degrade_to_linear() {
        let s = CubicSpline::new(&[0.0, 2.0], &[1.0, 3.0], Extrapolation::Hold).unwrap();
        assert!((s.eval(1.0) - 2.0).abs() < 1e-12);
        let a = AkimaSpline::new(&[0.0, 2.0], &[1.0, 3.0], Extrapolation::Polynomial).unwrap();
        assert!((a.eval(3.0) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn rejects_bad_samples() {
        assert!(CubicSpline::new(&[0.0], &[1.0], Extrapolation::Hold).is_err());
        assert!(CubicSpline::new(&[0.0, 0.0], &[1.0, 2.0], Extrapolation::Hold).is_err());
        assert!(AkimaSpline::new(&[0.0, 1.0], &[1.0], Extrapolation::Hold).is_err());
        assert!(AkimaSpline::new(&[0.0, f64::NAN], &[1.0, 2.0], Extrapolation::Hold).is_err());
    }

    #[test]
    fn akima_passes_through_knots_and_is_flat_on_plateaus() {
        let x = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0];
        let y = [0.0, 0.0, 0.0, 1.0, 1.0, 1.0];
        let a = AkimaSpline::new(&x, &y, Extrapolation::Polynomial).unwrap();
        for (xi, yi) in x.iter().zip(y.iter()) {
            assert!((a.eval(*xi) - yi).abs() < 1e-12);
        }
        // No overshoot on the plateaus.
        assert!(a.eval(0.5).abs() < 1e-12);
        assert!((a.eval(4.5) - 1.0).abs() < 1e-12);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn akima_reproduces_lines(
            slope in -5.0_f64..5.0,
            offset in -2.0_f64..2.0,
            gaps in prop::collection::vec(0.1_f64..2.0, 2..8),
            t in 0.0_f64..1.0,
        ) {
            let mut x = vec![0.0];
            for g in &gaps {
                let last = *x.last().unwrap();
                x.push(last + g);
            }
            let y: Vec<f64> = x.iter().map(|v| slope * v + offset).collect();
            let a = AkimaSpline::new(&x, &y, Extrapolation::Polynomial).unwrap();
            let xq = x[0] + t * (x[x.len() - 1] - x[0]);
            prop_assert!((a.eval(xq) - (slope * xq + offset)).abs() < 1e-9);
        }

        #[test]
        fn cubic_stays_finite_everywhere(
            ys in prop::collection::vec(-2.0_f64..2.0, 3..10),
            xq in -100.0_f64..100.0,
        ) {
            let x: Vec<f64> = (0..ys.len()).map(|i| i as f64 * 2.0 - 5.0).collect();
            for policy in [Extrapolation::Hold, Extrapolation::Linear, Extrapolation::Polynomial] {
                let s = CubicSpline::new(&x, &ys, policy).unwrap();
                let (v, d) = s.eval_with_slope(xq);
                prop_assert!(v.is_finite() && d.is_finite());
            }
        }
    }
}
