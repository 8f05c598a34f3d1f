//! Machine-readable summary of a grid build.

use std::path::Path;

use rg_core::InitialParameters;
use serde::{Deserialize, Serialize};

use crate::config::GridConfig;
use crate::{GridError, GridResult};

/// Final state of a run after a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Extracted,
    Deleted,
    DeleteFailed { message: String },
    Kept,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub run_name: String,
    pub initial: InitialParameters,
    pub outcome: RunOutcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tip_model: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub artifacts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridReport {
    pub generated_at: String,
    pub config: GridConfig,
    pub runs: Vec<RunRecord>,
    pub row_count: usize,
}

impl GridReport {
    pub fn new(config: GridConfig) -> Self {
        Self {
            generated_at: chrono::Utc::now().to_rfc3339(),
            config,
            runs: Vec::new(),
            row_count: 0,
        }
    }

    pub fn count(&self, outcome: &RunOutcome) -> usize {
        self.runs
            .iter()
            .filter(|r| std::mem::discriminant(&r.outcome) == std::mem::discriminant(outcome))
            .count()
    }

    pub fn save_json(&self, path: &Path) -> GridResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| GridError::ReportWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }
}
