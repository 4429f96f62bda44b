//! Case execution service.

use rp_solver::{OperatingPoint, SolverKind, SweepPoint, SweepProgress, run_sweep, solve_point};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;
use tracing::{info, warn};

use crate::case_compile::{CompiledCase, compile_case};
use crate::case_service;
use crate::error::{AppError, AppResult};
use crate::progress::{PointProgress, RunProgressEvent, RunStage};

/// What to solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// The case's operating points, or the one given in [`RunOptions`].
    Points,
    /// The case's sweep, solved in parallel.
    Sweep,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides the solver named in the case.
    pub solver: Option<SolverKind>,
    /// Solve this point instead of the case's list (points mode only).
    pub point: Option<OperatingPoint>,
}

/// Request to execute a case.
pub struct RunRequest<'a> {
    pub case_path: &'a Path,
    pub mode: RunMode,
    pub options: RunOptions,
}

#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub compile_time_s: f64,
    pub solve_time_s: f64,
    pub total_time_s: f64,
}

#[derive(Debug, Clone)]
pub struct RunResponse {
    pub case_name: String,
    pub mode: RunMode,
    pub solver: SolverKind,
    /// One entry per requested point, in request order.
    pub points: Vec<SweepPoint>,
    pub timing: RunTimingSummary,
}

impl RunResponse {
    pub fn failed_count(&self) -> usize {
        self.points.iter().filter(|p| p.record().is_none()).count()
    }

    /// Failed points whose section solve did not converge.
    pub fn convergence_failure_count(&self) -> usize {
        self.points
            .iter()
            .filter(|p| {
                matches!(p, SweepPoint::Failed { error, .. } if error.is_convergence_failure())
            })
            .count()
    }
}

pub type ProgressCallback<'a> = &'a mut (dyn FnMut(RunProgressEvent) + Send);

fn emit_progress(
    progress_cb: &mut Option<ProgressCallback<'_>>,
    mode: RunMode,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(RunProgressEvent::stage(
            mode,
            stage,
            started.elapsed().as_secs_f64(),
            message,
        ));
    }
}

/// Load, compile and solve a case.
pub fn run_case(request: &RunRequest) -> AppResult<RunResponse> {
    run_case_with_progress(request, None)
}

/// Load, compile and solve a case, streaming progress events.
pub fn run_case_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<ProgressCallback<'_>>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mode = request.mode;

    emit_progress(&mut progress_cb, mode, RunStage::LoadingCase, started, None);
    let case = case_service::load_case(request.case_path)?;

    emit_progress(
        &mut progress_cb,
        mode,
        RunStage::CompilingRotor,
        started,
        Some(case.name.clone()),
    );
    let compile_start = Instant::now();
    let mut compiled = compile_case(&case)?;
    let compile_time_s = compile_start.elapsed().as_secs_f64();

    if let Some(kind) = request.options.solver {
        compiled.settings.kind = kind;
    }

    let solve_start = Instant::now();
    let points = run_compiled(&compiled, mode, &request.options, &mut progress_cb, started)?;
    let solve_time_s = solve_start.elapsed().as_secs_f64();

    let response = RunResponse {
        case_name: compiled.name.clone(),
        mode,
        solver: compiled.settings.kind,
        points,
        timing: RunTimingSummary {
            compile_time_s,
            solve_time_s,
            total_time_s: started.elapsed().as_secs_f64(),
        },
    };
    info!(
        case = %response.case_name,
        points = response.points.len(),
        failed = response.failed_count(),
        unconverged = response.convergence_failure_count(),
        total_time_s = response.timing.total_time_s,
        "run finished"
    );
    emit_progress(&mut progress_cb, mode, RunStage::Completed, started, None);
    Ok(response)
}

/// Operating points a mode will solve.
pub fn requested_points(
    compiled: &CompiledCase,
    mode: RunMode,
    options: &RunOptions,
) -> AppResult<Vec<OperatingPoint>> {
    match mode {
        RunMode::Points => {
            if let Some(point) = options.point {
                return Ok(vec![point]);
            }
            if compiled.operating_points.is_empty() {
                return Err(AppError::InvalidInput(format!(
                    "case '{}' defines no operating points",
                    compiled.name
                )));
            }
            Ok(compiled.operating_points.clone())
        }
        RunMode::Sweep => compiled
            .sweep
            .as_ref()
            .map(|s| s.operating_points())
            .ok_or_else(|| {
                AppError::InvalidInput(format!("case '{}' defines no sweep", compiled.name))
            }),
    }
}

fn run_compiled(
    compiled: &CompiledCase,
    mode: RunMode,
    options: &RunOptions,
    progress_cb: &mut Option<ProgressCallback<'_>>,
    started: Instant,
) -> AppResult<Vec<SweepPoint>> {
    let points = requested_points(compiled, mode, options)?;
    let total = points.len();

    match mode {
        RunMode::Points => {
            emit_progress(progress_cb, mode, RunStage::SolvingPoints, started, None);
            let mut results = Vec::with_capacity(total);
            for (i, point) in points.iter().enumerate() {
                let outcome = match solve_point(
                    &compiled.rotor,
                    compiled.fluid,
                    &compiled.settings,
                    point.v_inf,
                    point.rpm,
                ) {
                    Ok(record) => SweepPoint::Solved(record),
                    Err(error) => {
                        warn!(v_inf = point.v_inf, rpm = point.rpm, %error, "operating point failed");
                        SweepPoint::Failed {
                            point: *point,
                            error,
                        }
                    }
                };
                if let Some(cb) = progress_cb.as_deref_mut() {
                    cb(point_event(
                        mode,
                        RunStage::SolvingPoints,
                        started,
                        i + 1,
                        total,
                        &outcome,
                    ));
                }
                results.push(outcome);
            }
            Ok(results)
        }
        RunMode::Sweep => {
            emit_progress(
                progress_cb,
                mode,
                RunStage::Sweeping,
                started,
                compiled.sweep.as_ref().map(|s| s.to_string()),
            );
            let shared = Mutex::new(progress_cb.as_deref_mut());
            let forward: &(dyn Fn(SweepProgress) + Sync) = &|p: SweepProgress| {
                if let Ok(mut guard) = shared.lock() {
                    if let Some(cb) = guard.as_deref_mut() {
                        cb(RunProgressEvent {
                            mode,
                            stage: RunStage::Sweeping,
                            elapsed_wall_s: started.elapsed().as_secs_f64(),
                            message: None,
                            point: Some(PointProgress {
                                completed: p.completed,
                                total: p.total,
                                v_inf: p.point.v_inf,
                                rpm: p.point.rpm,
                                succeeded: p.succeeded,
                            }),
                        });
                    }
                }
            };
            Ok(run_sweep(
                &compiled.rotor,
                compiled.fluid,
                &compiled.settings,
                &points,
                Some(forward),
            ))
        }
    }
}

fn point_event(
    mode: RunMode,
    stage: RunStage,
    started: Instant,
    completed: usize,
    total: usize,
    outcome: &SweepPoint,
) -> RunProgressEvent {
    let point = outcome.operating_point();
    RunProgressEvent {
        mode,
        stage,
        elapsed_wall_s: started.elapsed().as_secs_f64(),
        message: None,
        point: Some(PointProgress {
            completed,
            total,
            v_inf: point.v_inf,
            rpm: point.rpm,
            succeeded: outcome.record().is_some(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rp_solver::SolverError;

    fn response(points: Vec<SweepPoint>) -> RunResponse {
        RunResponse {
            case_name: "counts".into(),
            mode: RunMode::Sweep,
            solver: SolverKind::Newton,
            points,
            timing: RunTimingSummary::default(),
        }
    }

    #[test]
    fn convergence_failures_are_counted_apart_from_rejected_inputs() {
        let point = OperatingPoint::new(10.0, 1000.0);
        let resp = response(vec![
            SweepPoint::Failed {
                point,
                error: SolverError::NewtonDivergence {
                    index: 3,
                    radius: 0.4,
                    iterations: 50,
                    residual: 1e-3,
                },
            },
            SweepPoint::Failed {
                point,
                error: SolverError::SectionConvergence {
                    index: 0,
                    radius: 0.1,
                    residual: 0.2,
                },
            },
            SweepPoint::Failed {
                point,
                error: SolverError::InvalidOperatingPoint {
                    what: "rpm must be > 0".into(),
                },
            },
        ]);
        assert_eq!(resp.failed_count(), 3);
        assert_eq!(resp.convergence_failure_count(), 2);
        assert_eq!(response(Vec::new()).convergence_failure_count(), 0);
    }
}
