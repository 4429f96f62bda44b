//! Tabular and JSON output of solved points.

use rp_solver::{PerformanceRecord, SweepPoint};
use std::path::Path;

use crate::error::{AppError, AppResult};

pub const CSV_HEADER: &str = "v_inf,rpm,J,CT,CQ,CP,FM,eta,T,Q,P,status";

fn csv_row(point: &SweepPoint) -> String {
    match point {
        SweepPoint::Solved(r) => {
            format!(
                "{},{},{},{},{},{},{},{},{},{},{},ok\n",
                r.v_inf,
                r.rpm,
                r.j(),
                r.ct(),
                r.cq(),
                r.cp(),
                r.fm(),
                r.eta(),
                r.thrust,
                r.torque,
                r.power
            )
        }
        SweepPoint::Failed { point: op, .. } => format!(
            "{},{},NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,NaN,failed\n",
            op.v_inf, op.rpm
        ),
    }
}

/// One header line plus one row per point, in order.
pub fn points_csv(points: &[SweepPoint]) -> String {
    let mut out = String::with_capacity(64 * (points.len() + 1));
    out.push_str(CSV_HEADER);
    out.push('\n');
    for point in points {
        out.push_str(&csv_row(point));
    }
    out
}

pub fn write_points_csv(path: &Path, points: &[SweepPoint]) -> AppResult<()> {
    std::fs::write(path, points_csv(points)).map_err(|e| AppError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn record_json(record: &PerformanceRecord) -> AppResult<String> {
    Ok(serde_json::to_string_pretty(record)?)
}
