//! Operating-point sweeps.
//!
//! A [`SweepDefinition`] varies v∞ or rpm with the other held fixed. Points
//! are independent and solved in parallel; each one either succeeds or is
//! recorded as failed, so one bad point never aborts the sweep.

use rayon::prelude::*;
use rp_rotor::Rotor;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{info, warn};

use crate::bemt::{FluidProperties, OperatingPoint, PerformanceRecord};
use crate::config::SolverSettings;
use crate::error::{SolverError, SolverResult};
use crate::solve::solve_point;

/// Quantity varied by a sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SweepQuantity {
    /// Freestream speed [m/s]; rpm fixed
    VInf,
    /// Rotational speed [rev/min]; v∞ fixed
    Rpm,
}

/// Type of sweep progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SweepSpacing {
    /// Uniformly spaced points
    #[default]
    Linear,
    /// Logarithmically spaced points
    Logarithmic,
}

/// Definition of a single parameter sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepDefinition {
    pub quantity: SweepQuantity,
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
    #[serde(default)]
    pub spacing: SweepSpacing,
    /// Value of the quantity that is not swept
    pub fixed: f64,
}

impl SweepDefinition {
    pub fn new(
        quantity: SweepQuantity,
        start: f64,
        end: f64,
        num_points: usize,
        fixed: f64,
    ) -> SolverResult<Self> {
        let def = Self {
            quantity,
            start,
            end,
            num_points,
            spacing: SweepSpacing::Linear,
            fixed,
        };
        def.validate()?;
        Ok(def)
    }

    pub fn with_spacing(mut self, spacing: SweepSpacing) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn validate(&self) -> SolverResult<()> {
        let invalid = |what: String| Err(SolverError::InvalidOperatingPoint { what });
        if self.num_points < 2 {
            return invalid("sweep must have at least 2 points".into());
        }
        if !(self.start.is_finite() && self.end.is_finite() && self.fixed.is_finite()) {
            return invalid("sweep bounds must be finite".into());
        }
        if (self.start - self.end).abs() < 1e-12 {
            return invalid("start and end values must be different".into());
        }
        Ok(())
    }

    /// Generate all values of the swept quantity.
    pub fn generate_points(&self) -> Vec<f64> {
        match self.spacing {
            SweepSpacing::Linear => self.generate_linear(),
            SweepSpacing::Logarithmic => self.generate_logarithmic(),
        }
    }

    fn generate_linear(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start];
        }
        rp_core::linspace(self.start, self.end, self.num_points)
    }

    fn generate_logarithmic(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start];
        }
        // Both ends must be positive; v∞ = 0 sweeps fall back to linear.
        if self.start <= 0.0 || self.end <= 0.0 {
            return self.generate_linear();
        }
        let mut points: Vec<f64> = rp_core::linspace(self.start.ln(), self.end.ln(), self.num_points)
            .into_iter()
            .map(f64::exp)
            .collect();
        // Ensure exact endpoints
        points[0] = self.start;
        points[self.num_points - 1] = self.end;
        points
    }

    /// Operating points in sweep order.
    pub fn operating_points(&self) -> Vec<OperatingPoint> {
        self.generate_points()
            .into_iter()
            .map(|value| match self.quantity {
                SweepQuantity::VInf => OperatingPoint::new(value, self.fixed),
                SweepQuantity::Rpm => OperatingPoint::new(self.fixed, value),
            })
            .collect()
    }
}

impl fmt::Display for SweepQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VInf => write!(f, "v_inf [m/s]"),
            Self::Rpm => write!(f, "rpm"),
        }
    }
}

impl fmt::Display for SweepDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sweep {} from {} to {} ({} points, {:?})",
            self.quantity, self.start, self.end, self.num_points, self.spacing
        )
    }
}

/// Outcome of one sweep point.
#[derive(Debug, Clone, PartialEq)]
pub enum SweepPoint {
    Solved(PerformanceRecord),
    Failed {
        point: OperatingPoint,
        error: SolverError,
    },
}

impl SweepPoint {
    pub fn operating_point(&self) -> OperatingPoint {
        match self {
            Self::Solved(r) => OperatingPoint::new(r.v_inf, r.rpm),
            Self::Failed { point, .. } => *point,
        }
    }

    pub fn record(&self) -> Option<&PerformanceRecord> {
        match self {
            Self::Solved(r) => Some(r),
            Self::Failed { .. } => None,
        }
    }
}

/// Progress notification, sent once per finished point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepProgress {
    pub completed: usize,
    pub total: usize,
    pub point: OperatingPoint,
    pub succeeded: bool,
}

/// Solve every operating point; results come back in input order.
pub fn run_sweep(
    rotor: &Rotor,
    fluid: FluidProperties,
    settings: &SolverSettings,
    points: &[OperatingPoint],
    progress: Option<&(dyn Fn(SweepProgress) + Sync)>,
) -> Vec<SweepPoint> {
    let total = points.len();
    let completed = AtomicUsize::new(0);

    let results: Vec<SweepPoint> = points
        .par_iter()
        .map(|point| {
            let outcome = match solve_point(rotor, fluid, settings, point.v_inf, point.rpm) {
                Ok(record) => SweepPoint::Solved(record),
                Err(error) => {
                    warn!(v_inf = point.v_inf, rpm = point.rpm, %error, "sweep point failed");
                    SweepPoint::Failed {
                        point: *point,
                        error,
                    }
                }
            };
            let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
            if let Some(cb) = progress {
                cb(SweepProgress {
                    completed: done,
                    total,
                    point: *point,
                    succeeded: matches!(outcome, SweepPoint::Solved(_)),
                });
            }
            outcome
        })
        .collect();

    let failed = results
        .iter()
        .filter(|r| matches!(r, SweepPoint::Failed { .. }))
        .count();
    info!(total, failed, solver = %settings.kind, "sweep finished");
    results
}
