//! Grid build configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::tip::{H1_EXHAUSTED, TEFF_MAX};
use crate::window::{MAX_WINDOW_MODELS, SampleWindow};
use crate::{GridError, GridResult};

/// Everything a grid build needs; loadable from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Directory holding one sub-directory per run.
    pub grid_dir: PathBuf,
    /// Destination of the aggregate table.
    pub output_file: PathBuf,
    /// Destination of the archived checkpoint models.
    pub output_dir: PathBuf,
    /// Only directories starting with this prefix are runs.
    pub run_prefix: String,
    /// History file name inside a run directory.
    pub history_file: String,
    pub window: SampleWindow,
    /// Upper `log_Teff` bound of the tip search.
    pub teff_max: f64,
    /// Central hydrogen fraction below which a core counts as exhausted.
    pub h1_exhausted: f64,
    /// Remove runs that never exhausted their core hydrogen.
    pub delete_rejected: bool,
    /// Drop history rows superseded by backups/restarts before sampling.
    pub remove_backups: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            grid_dir: PathBuf::new(),
            output_file: PathBuf::new(),
            output_dir: PathBuf::new(),
            run_prefix: "logs_".to_string(),
            history_file: rg_history::HISTORY_FILE_NAME.to_string(),
            window: SampleWindow::default(),
            teff_max: TEFF_MAX,
            h1_exhausted: H1_EXHAUSTED,
            delete_rejected: true,
            remove_backups: false,
        }
    }
}

impl GridConfig {
    pub fn new(
        grid_dir: impl Into<PathBuf>,
        output_file: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            grid_dir: grid_dir.into(),
            output_file: output_file.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn load_yaml(path: &Path) -> GridResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            GridError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn to_yaml(&self) -> GridResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reject configurations that cannot produce a meaningful grid.
    pub fn validate(&self) -> GridResult<()> {
        let paths = [
            ("grid_dir", &self.grid_dir),
            ("output_file", &self.output_file),
            ("output_dir", &self.output_dir),
        ];
        for (what, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(GridError::Config(format!("{} must be set", what)));
            }
        }
        if self.history_file.is_empty() {
            return Err(GridError::Config("history_file must be set".to_string()));
        }
        if self.window.interval == 0 {
            return Err(GridError::Config(
                "window.interval must be positive".to_string(),
            ));
        }
        let widths = [
            ("window.minus_models", self.window.minus_models),
            ("window.plus_models", self.window.plus_models),
        ];
        for (what, models) in widths {
            if models > MAX_WINDOW_MODELS {
                return Err(GridError::Config(format!(
                    "{} must be at most {}, got {}",
                    what, MAX_WINDOW_MODELS, models
                )));
            }
        }
        if !self.teff_max.is_finite() {
            return Err(GridError::Config(format!(
                "teff_max must be finite, got {}",
                self.teff_max
            )));
        }
        if !(self.h1_exhausted.is_finite() && self.h1_exhausted > 0.0) {
            return Err(GridError::Config(format!(
                "h1_exhausted must be positive, got {}",
                self.h1_exhausted
            )));
        }
        Ok(())
    }
}
