use crate::run_service::RunMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStage {
    LoadingCase,
    CompilingRotor,
    SolvingPoints,
    Sweeping,
    Completed,
}

impl RunStage {
    pub fn label(&self) -> &'static str {
        match self {
            Self::LoadingCase => "loading case",
            Self::CompilingRotor => "compiling rotor",
            Self::SolvingPoints => "solving points",
            Self::Sweeping => "sweeping",
            Self::Completed => "completed",
        }
    }
}

/// Points finished so far in the current solve stage.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointProgress {
    pub completed: usize,
    pub total: usize,
    pub v_inf: f64,
    pub rpm: f64,
    pub succeeded: bool,
}

impl PointProgress {
    pub fn fraction_complete(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunProgressEvent {
    pub mode: RunMode,
    pub stage: RunStage,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
    pub point: Option<PointProgress>,
}

impl RunProgressEvent {
    pub fn stage(
        mode: RunMode,
        stage: RunStage,
        elapsed_wall_s: f64,
        message: Option<String>,
    ) -> Self {
        Self {
            mode,
            stage,
            elapsed_wall_s,
            message,
            point: None,
        }
    }
}
