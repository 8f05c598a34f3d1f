//! rg-grid: RGB-tip sampling over a grid of MESA runs.
//!
//! Provides:
//! - Tip location on a single evolutionary track
//! - Checkpoint-aligned sample windows and fixed-schema row extraction
//! - The grid assembler that walks a run tree, archives checkpoint models
//!   and writes the aggregate table
//!
//! # Example
//!
//! ```no_run
//! use rg_grid::{GridConfig, RgbGrid};
//!
//! let config = GridConfig::new("grid", "rgb_grid.txt", "rgb_models");
//! let grid = RgbGrid::new(config).unwrap();
//! let build = grid.build().unwrap();
//! println!("{} rows", build.rows.len());
//! ```

pub mod assembler;
pub mod config;
pub mod progress;
pub mod report;
pub mod schema;
pub mod table;
pub mod tip;
pub mod window;

// Re-exports for ergonomics
pub use assembler::{
    ArtifactCopy, ExtractionPlan, GridBuild, RgbGrid, RunPlan, discover_runs, plan_run,
};
pub use config::GridConfig;
pub use progress::{GridProgressEvent, GridStage};
pub use report::{GridReport, RunOutcome, RunRecord};
pub use schema::{Column, ColumnKind, GridRow, SCHEMA, extract_row};
pub use table::{header_line, save_table, write_table};
pub use tip::{
    H1_EXHAUSTED, TEFF_MAX, find_transition, find_transition_with, reached_transition,
};
pub use window::{
    CHECKPOINT_INTERVAL, MAX_WINDOW_MODELS, SampleWindow, WindowTarget, anchor,
};

use std::path::PathBuf;

pub type GridResult<T> = Result<T, GridError>;

#[derive(thiserror::Error, Debug)]
pub enum GridError {
    #[error(transparent)]
    Core(#[from] rg_core::CoreError),

    #[error(transparent)]
    History(#[from] rg_history::HistoryError),

    #[error("Failed to list grid directory: {path}")]
    ListGrid {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to create output directory: {path}")]
    CreateOutputDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to copy checkpoint {from} to {to}")]
    CheckpointCopy {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write grid table: {path}")]
    TableWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write run report: {path}")]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
