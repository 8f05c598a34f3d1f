//! Progress events emitted while building a grid.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridStage {
    PreparingOutput,
    RunStarted,
    RunFinished,
    WritingTable,
    Completed,
}

impl GridStage {
    pub fn label(&self) -> &'static str {
        match self {
            GridStage::PreparingOutput => "preparing output",
            GridStage::RunStarted => "run started",
            GridStage::RunFinished => "run finished",
            GridStage::WritingTable => "writing table",
            GridStage::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone)]
pub struct GridProgressEvent {
    pub stage: GridStage,
    /// Run directory, for run-level stages.
    pub run: Option<std::path::PathBuf>,
    /// 1-based position of the run in sorted order.
    pub position: usize,
    pub total: usize,
    pub elapsed_wall_s: f64,
    pub message: Option<String>,
}
