//! Synthetic MESA run trees for grid tests.

#![allow(dead_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

pub const RUN_A: &str = "logs_m1.0_rot0.0_z0.015_y0.27_fh0.01_fhe0.02_fsh0.005_mlt1.8_sc0.1_reimers0.5_blocker0.1_turbulence0.0";
pub const RUN_B: &str = "logs_m1.5_rot0.0_z0.015_y0.27_fh0.01_fhe0.02_fsh0.005_mlt1.8_sc0.1_reimers0.5_blocker0.1_turbulence0.0";
pub const RUN_MS: &str = "logs_m0.8_rot0.0_z0.015_y0.27_fh0.01_fhe0.02_fsh0.005_mlt1.8_sc0.1_reimers0.5_blocker0.1_turbulence0.0";

/// Shape of a synthetic evolutionary track.
#[derive(Clone, Copy, Debug)]
pub struct Track {
    pub models: usize,
    /// Position from which core hydrogen is exhausted; `None` keeps it burning.
    pub exhausted_at: Option<usize>,
    /// Position of the luminosity peak.
    pub peak_at: usize,
}

impl Track {
    /// 120 models, exhausted from model 61, tip at model 72 (anchor 80).
    pub fn giant() -> Self {
        Self {
            models: 120,
            exhausted_at: Some(60),
            peak_at: 71,
        }
    }

    pub fn main_sequence() -> Self {
        Self {
            models: 60,
            exhausted_at: None,
            peak_at: 30,
        }
    }
}

pub fn history_text(track: Track) -> String {
    let names = [
        "model_number",
        "star_age",
        "star_mass",
        "he_core_mass",
        "center_h1",
        "log_Teff",
        "log_L",
    ];
    let mut out = String::new();
    writeln!(out, "{:>42}{:>42}", 1, 2).unwrap();
    writeln!(out, "{:>42}{:>42}", "version_number", "initial_mass").unwrap();
    writeln!(out, "{:>42}{:>42}", "\"r15140\"", "1.0").unwrap();
    writeln!(out).unwrap();
    for i in 1..=names.len() {
        write!(out, "{:>42}", i).unwrap();
    }
    writeln!(out).unwrap();
    for name in names {
        write!(out, "{:>42}", name).unwrap();
    }
    writeln!(out).unwrap();

    for i in 0..track.models {
        let model = (i + 1) as f64;
        let exhausted = track.exhausted_at.is_some_and(|at| i >= at);
        let values = [
            model,
            1.0e7 * model,
            1.0 - 1.0e-3 * model,
            if exhausted { 0.2 + 1.0e-3 * model } else { 0.0 },
            if exhausted { 1.0e-6 } else { 0.7 - 1.0e-3 * model },
            3.9 - 0.005 * i as f64,
            3.0 - 0.01 * (i as f64 - track.peak_at as f64).abs(),
        ];
        for v in values {
            write!(out, "{:>42.16E}", v).unwrap();
        }
        writeln!(out).unwrap();
    }
    out
}

/// Create a run directory with its history and every tenth checkpoint.
pub fn write_run(grid: &Path, name: &str, track: Track) -> PathBuf {
    let dir = grid.join(name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("history.data"), history_text(track)).unwrap();
    for model in (10..=track.models).step_by(10) {
        std::fs::write(
            dir.join(format!("model_{:05}.mod", model)),
            format!("checkpoint {}\n", model),
        )
        .unwrap();
    }
    dir
}
