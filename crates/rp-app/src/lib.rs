//! Shared application service layer for rotorperf.
//!
//! Loads and compiles case files, runs operating points and sweeps, computes
//! sensitivities and formats results. The CLI is a thin shell over this
//! crate.

pub mod case_compile;
pub mod case_service;
pub mod error;
pub mod export;
pub mod progress;
pub mod run_service;
pub mod sensitivity_service;

pub use case_compile::{
    CompiledCase, build_fluid, build_rotor, build_settings, build_sweep, compile_case,
};
pub use case_service::{CaseSummary, load_case, save_case, summarize};
pub use error::{AppError, AppResult};
pub use export::{CSV_HEADER, points_csv, record_json, write_points_csv};
pub use progress::{PointProgress, RunProgressEvent, RunStage};
pub use run_service::{
    ProgressCallback, RunMode, RunOptions, RunRequest, RunResponse, RunTimingSummary,
    requested_points, run_case, run_case_with_progress,
};
pub use sensitivity_service::{DEFAULT_FD_STEP, SensitivityReport, compute_sensitivities};
