//! rg-history: reader for MESA history files.
//!
//! Turns a `history.data` file into an [`rg_core::HistorySeries`].

pub mod reader;

pub use reader::{HISTORY_FILE_NAME, parse_history, read_history};

use std::path::PathBuf;

pub type HistoryResult<T> = Result<T, HistoryError>;

#[derive(thiserror::Error, Debug)]
pub enum HistoryError {
    #[error("Failed to read history file: {path}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Malformed history file {path} at line {line}: {message}")]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("History file has no samples: {path}")]
    Empty { path: PathBuf },

    #[error("Series error: {0}")]
    Series(#[from] rg_core::CoreError),
}
