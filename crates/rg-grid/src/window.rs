//! Checkpoint-aligned sample windows around the RGB tip.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Model-number spacing of saved checkpoints.
pub const CHECKPOINT_INTERVAL: u32 = 10;

/// Largest accepted number of checkpoints on either side of the anchor.
pub const MAX_WINDOW_MODELS: u32 = 100_000;

/// First checkpoint strictly after `tip` with the default interval.
///
/// `None` when the next checkpoint does not fit a model number.
pub fn anchor(tip: u32) -> Option<u32> {
    SampleWindow::default().anchor(tip)
}

/// One sampled model of a window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WindowTarget {
    pub level: i32,
    /// Target model number; may fall outside the track near its edges.
    pub model_number: i64,
}

/// Offsets `-minus_models..=plus_models` around the anchor, `interval` models apart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SampleWindow {
    pub minus_models: u32,
    pub plus_models: u32,
    pub interval: u32,
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self {
            minus_models: 5,
            plus_models: 3,
            interval: CHECKPOINT_INTERVAL,
        }
    }
}

fn offset(models: u32) -> i32 {
    i32::try_from(models).unwrap_or(i32::MAX)
}

impl SampleWindow {
    /// Number of sampled models per run.
    pub fn size(&self) -> usize {
        let levels = self.levels();
        levels.start().unsigned_abs() as usize + levels.end().unsigned_abs() as usize + 1
    }

    /// Window levels in increasing order.
    ///
    /// Widths beyond `i32::MAX` are clamped; [`GridConfig::validate`](crate::GridConfig::validate)
    /// rejects them long before that.
    pub fn levels(&self) -> RangeInclusive<i32> {
        -offset(self.minus_models)..=offset(self.plus_models)
    }

    /// Round `tip` down to the checkpoint interval, then step one interval up.
    pub fn anchor(&self, tip: u32) -> Option<u32> {
        tip.checked_div(self.interval)?
            .checked_mul(self.interval)?
            .checked_add(self.interval)
    }

    /// Target model numbers of every level, `None` when the anchor is undefined.
    pub fn targets(&self, tip: u32) -> Option<Vec<WindowTarget>> {
        let anchor = i64::from(self.anchor(tip)?);
        let step = i64::from(self.interval);
        Some(
            self.levels()
                .map(|level| WindowTarget {
                    level,
                    model_number: anchor.saturating_add(step * i64::from(level)),
                })
                .collect(),
        )
    }
}
