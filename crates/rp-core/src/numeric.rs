use crate::CoreError;

/// Floating point type used throughout system
pub type Real = f64;

/// |a - b| scaled by the larger magnitude; 0 when both are 0.
pub fn relative_difference(a: Real, b: Real) -> Real {
    let scale = a.abs().max(b.abs());
    if scale == 0.0 {
        0.0
    } else {
        (a - b).abs() / scale
    }
}

/// `v` unchanged, or [`CoreError::NonFinite`] naming `what`.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CoreError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CoreError::NonFinite { what, value: v })
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
///
/// The last entry is pinned to `end` so sums of widths close exactly.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as Real;
            let mut points: Vec<Real> = (0..n).map(|i| start + i as Real * step).collect();
            points[n - 1] = end;
            points
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
        assert!(ensure_finite(Real::INFINITY, "test").is_err());
        assert_eq!(ensure_finite(2.5, "test"), Ok(2.5));
    }

    #[test]
    fn linspace_endpoints() {
        let pts = linspace(0.375, 1.527, 8);
        assert_eq!(pts.len(), 8);
        assert_eq!(pts[0], 0.375);
        assert_eq!(pts[7], 1.527);
        assert!(linspace(1.0, 2.0, 0).is_empty());
        assert_eq!(linspace(1.0, 2.0, 1), vec![1.0]);
    }

    #[test]
    fn relative_difference_handles_zero() {
        assert_eq!(relative_difference(0.0, 0.0), 0.0);
        assert!((relative_difference(1.0, 1.1) - 0.1 / 1.1).abs() < 1e-15);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn linspace_is_monotone(start in -10.0_f64..10.0, span in 0.1_f64..10.0, n in 2usize..50) {
            let pts = linspace(start, start + span, n);
            prop_assert_eq!(pts.len(), n);
            for w in pts.windows(2) {
                prop_assert!(w[1] > w[0]);
            }
        }
    }
}
