//! Grid assembly.
//!
//! Runs are visited in sorted name order. A run whose last sample still
//! burns core hydrogen is discarded (its directory removed unless disabled);
//! any other run is sampled around its RGB tip, contributing one row and one
//! archived checkpoint per window level. The table is written once at the end.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rg_core::series::columns;
use rg_core::{
    CoreError, InitialParameters, checkpoint_file_name, make_artifact_name, parse_run_name,
};
use rg_history::read_history;
use tracing::{debug, info, warn};

use crate::config::GridConfig;
use crate::progress::{GridProgressEvent, GridStage};
use crate::report::{GridReport, RunOutcome, RunRecord};
use crate::schema::{GridRow, extract_row};
use crate::table::save_table;
use crate::tip::{find_transition_with, reached_transition};
use crate::{GridError, GridResult};

/// One checkpoint to archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactCopy {
    pub level: i32,
    pub model_number: u32,
    /// Checkpoint inside the run directory.
    pub source: PathBuf,
    /// Archived file name inside the output directory.
    pub file_name: String,
}

/// Everything extracted from a run that reached the RGB tip.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionPlan {
    pub run_name: String,
    pub initial: InitialParameters,
    /// Samples of the (possibly cleaned) history the rows were taken from.
    pub samples: usize,
    pub tip_model: u32,
    pub anchor: u32,
    pub rows: Vec<GridRow>,
    pub artifacts: Vec<ArtifactCopy>,
}

/// Decision for one run, computed without touching the file system.
#[derive(Debug, Clone, PartialEq)]
pub enum RunPlan {
    Extract(ExtractionPlan),
    /// Core hydrogen not exhausted at the end of the track.
    Reject {
        run_name: String,
        initial: InitialParameters,
        samples: usize,
        last_center_h1: Option<f64>,
    },
}

/// Result of a full grid build.
#[derive(Debug, Clone)]
pub struct GridBuild {
    pub rows: Vec<GridRow>,
    pub report: GridReport,
}

/// Run directories below `grid_dir` whose name starts with `prefix`, sorted.
pub fn discover_runs(grid_dir: &Path, prefix: &str) -> GridResult<Vec<PathBuf>> {
    let list_err = |e| GridError::ListGrid {
        path: grid_dir.to_path_buf(),
        source: e,
    };

    let mut runs = Vec::new();
    for entry in fs::read_dir(grid_dir).map_err(list_err)? {
        let entry = entry.map_err(list_err)?;
        let path = entry.path();
        if path.is_dir() && entry.file_name().to_string_lossy().starts_with(prefix) {
            runs.push(path);
        }
    }
    runs.sort();
    Ok(runs)
}

fn run_name(run_dir: &Path) -> GridResult<String> {
    run_dir
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            GridError::Core(CoreError::Format {
                name: run_dir.display().to_string(),
                reason: "run directory name is not valid UTF-8".to_string(),
            })
        })
}

/// Read one run and decide what to extract from it.
///
/// Every window row is extracted here, so a window that leaves the track
/// fails before anything of the run is copied.
pub fn plan_run(config: &GridConfig, run_dir: &Path) -> GridResult<RunPlan> {
    let run_name = run_name(run_dir)?;
    let initial = parse_run_name(&run_name)?;

    let mut series = read_history(&run_dir.join(&config.history_file))?;
    if config.remove_backups {
        series = series.without_backups()?;
    }

    if !reached_transition(&series, config.h1_exhausted)? {
        return Ok(RunPlan::Reject {
            run_name,
            initial,
            samples: series.len(),
            last_center_h1: series.last(columns::CENTER_H1)?,
        });
    }

    let tip_model = find_transition_with(&series, config.teff_max, config.h1_exhausted)?;
    let window = config.window;
    let unanchored = || CoreError::SampleOutOfRange {
        model_number: i64::from(tip_model),
        len: series.len(),
    };
    let anchor = window.anchor(tip_model).ok_or_else(unanchored)?;
    let targets = window.targets(tip_model).ok_or_else(unanchored)?;
    debug!(run = %run_name, tip_model, anchor, "located RGB tip");

    let mut rows = Vec::with_capacity(targets.len());
    let mut artifacts = Vec::with_capacity(targets.len());
    for target in targets {
        rows.push(extract_row(
            &series,
            target.model_number,
            target.level,
            &initial,
        )?);
        let model_number =
            u32::try_from(target.model_number).map_err(|_| CoreError::SampleOutOfRange {
                model_number: target.model_number,
                len: series.len(),
            })?;
        artifacts.push(ArtifactCopy {
            level: target.level,
            model_number,
            source: run_dir.join(checkpoint_file_name(model_number)),
            file_name: make_artifact_name(&run_name, target.level, model_number)?,
        });
    }

    Ok(RunPlan::Extract(ExtractionPlan {
        run_name,
        initial,
        samples: series.len(),
        tip_model,
        anchor,
        rows,
        artifacts,
    }))
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(GridProgressEvent)>,
    stage: GridStage,
    run: Option<&Path>,
    position: usize,
    total: usize,
    started: Instant,
    message: Option<String>,
) {
    debug!(stage = stage.label(), position, total, "grid progress");
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(GridProgressEvent {
            stage,
            run: run.map(Path::to_path_buf),
            position,
            total,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
        });
    }
}

/// Create `dir` unless it exists; returns a human-readable note.
fn prepare_output_dir(dir: &Path) -> GridResult<String> {
    if dir.is_dir() {
        info!(path = %dir.display(), "output directory already exists");
        return Ok(format!("Output directory '{}' already exists.", dir.display()));
    }
    fs::create_dir_all(dir).map_err(|e| GridError::CreateOutputDir {
        path: dir.to_path_buf(),
        source: e,
    })?;
    info!(path = %dir.display(), "output directory created");
    Ok(format!("Output directory created: {}", dir.display()))
}

fn remove_run_dir(run_dir: &Path) -> io::Result<()> {
    fs::remove_dir_all(run_dir)
}

/// A grid of runs discovered under one directory.
#[derive(Debug, Clone)]
pub struct RgbGrid {
    config: GridConfig,
    runs: Vec<PathBuf>,
    remove_run: fn(&Path) -> io::Result<()>,
}

impl RgbGrid {
    /// Validate `config` and discover its runs.
    pub fn new(config: GridConfig) -> GridResult<Self> {
        config.validate()?;
        let runs = discover_runs(&config.grid_dir, &config.run_prefix)?;
        info!(
            grid_dir = %config.grid_dir.display(),
            runs = runs.len(),
            "discovered runs"
        );
        Ok(Self {
            config,
            runs,
            remove_run: remove_run_dir,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Run directories in processing order.
    pub fn runs(&self) -> &[PathBuf] {
        &self.runs
    }

    pub fn build(&self) -> GridResult<GridBuild> {
        self.build_with_progress(None)
    }

    /// Build the grid, streaming progress events to `progress_cb`.
    pub fn build_with_progress(
        &self,
        mut progress_cb: Option<&mut dyn FnMut(GridProgressEvent)>,
    ) -> GridResult<GridBuild> {
        let started = Instant::now();
        let total = self.runs.len();

        let note = prepare_output_dir(&self.config.output_dir)?;
        emit_progress(
            &mut progress_cb,
            GridStage::PreparingOutput,
            None,
            0,
            total,
            started,
            Some(note),
        );

        let mut rows = Vec::new();
        let mut report = GridReport::new(self.config.clone());

        for (i, run_dir) in self.runs.iter().enumerate() {
            emit_progress(
                &mut progress_cb,
                GridStage::RunStarted,
                Some(run_dir),
                i + 1,
                total,
                started,
                None,
            );

            let (record, note) = match plan_run(&self.config, run_dir)? {
                RunPlan::Extract(plan) => {
                    let artifacts = self.archive(&plan)?;
                    info!(
                        run = %plan.run_name,
                        tip_model = plan.tip_model,
                        anchor = plan.anchor,
                        rows = plan.rows.len(),
                        "run sampled around RGB tip"
                    );
                    let note = format!(
                        "RGB tip at model {}, archived {} models",
                        plan.tip_model,
                        artifacts.len()
                    );
                    rows.extend(plan.rows);
                    let record = RunRecord {
                        run_name: plan.run_name,
                        initial: plan.initial,
                        outcome: RunOutcome::Extracted,
                        tip_model: Some(plan.tip_model),
                        anchor: Some(plan.anchor),
                        artifacts,
                    };
                    (record, note)
                }
                RunPlan::Reject {
                    run_name,
                    initial,
                    last_center_h1,
                    ..
                } => {
                    debug!(run = %run_name, ?last_center_h1, "core hydrogen not exhausted");
                    let (outcome, note) = self.discard(run_dir);
                    let record = RunRecord {
                        run_name,
                        initial,
                        outcome,
                        tip_model: None,
                        anchor: None,
                        artifacts: Vec::new(),
                    };
                    (record, note)
                }
            };
            report.runs.push(record);

            emit_progress(
                &mut progress_cb,
                GridStage::RunFinished,
                Some(run_dir),
                i + 1,
                total,
                started,
                Some(note),
            );
        }

        emit_progress(
            &mut progress_cb,
            GridStage::WritingTable,
            None,
            total,
            total,
            started,
            None,
        );
        save_table(&self.config.output_file, &rows)?;
        report.row_count = rows.len();

        emit_progress(
            &mut progress_cb,
            GridStage::Completed,
            None,
            total,
            total,
            started,
            Some(format!("{} rows", rows.len())),
        );

        Ok(GridBuild { rows, report })
    }

    /// Copy the planned checkpoints into the output directory.
    fn archive(&self, plan: &ExtractionPlan) -> GridResult<Vec<String>> {
        let mut names = Vec::with_capacity(plan.artifacts.len());
        for artifact in &plan.artifacts {
            let dest = self.config.output_dir.join(&artifact.file_name);
            fs::copy(&artifact.source, &dest).map_err(|e| GridError::CheckpointCopy {
                from: artifact.source.clone(),
                to: dest.clone(),
                source: e,
            })?;
            debug!(from = %artifact.source.display(), to = %dest.display(), "archived checkpoint");
            names.push(artifact.file_name.clone());
        }
        Ok(names)
    }

    /// Remove (or keep) a rejected run; failures are logged, never fatal.
    fn discard(&self, run_dir: &Path) -> (RunOutcome, String) {
        if !self.config.delete_rejected {
            info!(run = %run_dir.display(), "rejected run kept");
            return (RunOutcome::Kept, format!("Kept: {}", run_dir.display()));
        }
        match (self.remove_run)(run_dir) {
            Ok(()) => {
                info!(run = %run_dir.display(), "rejected run deleted");
                (RunOutcome::Deleted, format!("Deleted: {}", run_dir.display()))
            }
            Err(e) => {
                warn!(run = %run_dir.display(), error = %e, "failed to delete rejected run");
                let note = format!("Error: {} : {}", run_dir.display(), e);
                (
                    RunOutcome::DeleteFailed {
                        message: e.to_string(),
                    },
                    note,
                )
            }
        }
    }
}

#[cfg(test)]
#[path = "../tests/common/mod.rs"]
mod test_runs;
