//! Robust section solver: sign-change scan followed by Brent's method.
//!
//! Needs only residual values, so it tolerates the slope kinks of
//! piecewise polars and the poles of the induction factors.

use rayon::prelude::*;
use rp_rotor::{BladeSection, Inflow, Rotor};
use tracing::{debug, trace};

use crate::config::BracketConfig;
use crate::error::{SolverError, SolverResult};
use crate::strategy::SectionSolver;

/// Outcome of scanning an interval for a sign change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Scan {
    Bracket { a: f64, b: f64, fa: f64, fb: f64 },
    NoSignChange { last_residual: f64 },
}

/// Sample `f` at `intervals + 1` evenly spaced points of [lo, hi] and return
/// the first cell whose ends differ in sign. Non-finite samples are skipped.
pub(crate) fn scan_sign_change<F>(f: F, lo: f64, hi: f64, intervals: usize) -> Scan
where
    F: Fn(f64) -> f64,
{
    let n = intervals.max(1);
    let step = (hi - lo) / n as f64;
    let mut prev: Option<(f64, f64)> = None;
    let mut last_residual = f64::NAN;

    for i in 0..=n {
        let x = if i == n { hi } else { lo + i as f64 * step };
        let fx = f(x);
        if !fx.is_finite() {
            continue;
        }
        last_residual = fx;
        if fx == 0.0 {
            return Scan::Bracket {
                a: x,
                b: x,
                fa: fx,
                fb: fx,
            };
        }
        if let Some((px, pf)) = prev {
            if pf.signum() != fx.signum() {
                return Scan::Bracket {
                    a: px,
                    b: x,
                    fa: pf,
                    fb: fx,
                };
            }
        }
        prev = Some((x, fx));
    }
    Scan::NoSignChange { last_residual }
}

/// Brent's method on a bracket with f(a)·f(b) ≤ 0.
///
/// Returns the root, or the last residual if the iteration budget runs out.
pub fn brent<F>(
    f: F,
    a: f64,
    b: f64,
    fa: f64,
    fb: f64,
    x_tol: f64,
    max_iterations: usize,
) -> Result<f64, f64>
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b, mut fa, mut fb) = (a, b, fa, fb);
    let (mut c, mut fc) = (b, fb);
    let mut d = b - a;
    let mut e = d;

    for _ in 0..max_iterations {
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * x_tol;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation, or secant when only two points.
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let bound = (3.0 * xm * q - (tol * q).abs()).min((e * q).abs());
            if 2.0 * p < bound {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(xm) };
        fb = f(b);
    }
    Err(fb)
}

/// Bracketing strategy for [`SectionSolver`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BracketingSolver {
    config: BracketConfig,
}

impl BracketingSolver {
    pub fn new(config: BracketConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BracketConfig {
        &self.config
    }

    fn solve_one(&self, index: usize, section: &BladeSection, inflow: &Inflow) -> SolverResult<f64> {
        let cfg = &self.config;
        let residual = |phi: f64| section.residual(phi, inflow);

        match scan_sign_change(residual, cfg.phi_lo, cfg.phi_hi, cfg.scan_intervals) {
            Scan::NoSignChange { last_residual } => Err(SolverError::SectionConvergence {
                index,
                radius: section.radius(),
                residual: last_residual,
            }),
            Scan::Bracket { a, b, fa, fb } => {
                trace!(index, a, b, "bracketed section root");
                brent(residual, a, b, fa, fb, cfg.x_tol, cfg.max_iterations).map_err(|last| {
                    SolverError::SectionConvergence {
                        index,
                        radius: section.radius(),
                        residual: last,
                    }
                })
            }
        }
    }
}

impl SectionSolver for BracketingSolver {
    fn name(&self) -> &'static str {
        "robust"
    }

    fn solve_sections(&self, rotor: &Rotor, inflow: &Inflow) -> SolverResult<Vec<f64>> {
        self.config.validate()?;
        let sections = rotor.sections();
        let phis = if self.config.parallel {
            sections
                .par_iter()
                .enumerate()
                .map(|(i, s)| self.solve_one(i, s, inflow))
                .collect::<SolverResult<Vec<_>>>()?
        } else {
            sections
                .iter()
                .enumerate()
                .map(|(i, s)| self.solve_one(i, s, inflow))
                .collect::<SolverResult<Vec<_>>>()?
        };
        debug!(sections = phis.len(), "bracketing solve converged");
        Ok(phis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brent_finds_cubic_root() {
        let f = |x: f64| x * x * x - 2.0 * x - 5.0;
        let root = brent(f, 2.0, 3.0, f(2.0), f(3.0), 1e-14, 100).unwrap();
        assert!((root - 2.094_551_481_542_326_5).abs() < 1e-12);
    }

    #[test]
    fn brent_handles_kinked_functions() {
        let f = |x: f64| if x < 0.3 { x - 0.4 } else { 5.0 * (x - 0.4) };
        let root = brent(f, 0.0, 1.0, f(0.0), f(1.0), 1e-13, 100).unwrap();
        assert!((root - 0.4).abs() < 1e-12);
    }

    #[test]
    fn brent_reports_exhausted_budget() {
        let f = |x: f64| x - 0.123_456;
        assert!(brent(f, 0.0, 1.0, f(0.0), f(1.0), 1e-15, 1).is_err());
    }

    #[test]
    fn scan_takes_first_sign_change() {
        // Roots at 0.25 and 0.75.
        let f = |x: f64| (x - 0.25) * (x - 0.75);
        match scan_sign_change(f, 0.0, 1.0, 10) {
            Scan::Bracket { a, b, .. } => assert!(a < 0.25 && b > 0.25),
            other => panic!("expected bracket, got {other:?}"),
        }
    }

    #[test]
    fn scan_skips_non_finite_samples() {
        let f = |x: f64| if x < 0.35 { f64::NAN } else { x - 0.5 };
        match scan_sign_change(f, 0.0, 1.0, 10) {
            Scan::Bracket { a, b, .. } => assert!(a <= 0.5 && b >= 0.5),
            other => panic!("expected bracket, got {other:?}"),
        }
    }

    #[test]
    fn scan_without_sign_change_reports_last_residual() {
        let f = |x: f64| 1.0 + x;
        assert_eq!(
            scan_sign_change(f, 0.0, 1.0, 4),
            Scan::NoSignChange { last_residual: 2.0 }
        );
    }
}
