//! RGB tip location.
//!
//! The tip is the most luminous model among the cool, hydrogen-exhausted
//! samples of a track. Cutting on `center_h1` and `log_Teff` rather than on
//! age or model number keeps the search independent of run conventions.

use rg_core::series::columns;
use rg_core::{CoreError, CoreResult, HistorySeries};

/// Central hydrogen fraction below which the core counts as exhausted.
pub const H1_EXHAUSTED: f64 = 1e-4;

/// Default upper bound on `log_Teff` for the tip search.
pub const TEFF_MAX: f64 = 3.8;

/// Whether the last sample of the track has an exhausted core.
pub fn reached_transition(series: &HistorySeries, h1_exhausted: f64) -> CoreResult<bool> {
    Ok(series
        .last(columns::CENTER_H1)?
        .is_some_and(|h1| h1 < h1_exhausted))
}

/// Model number of the RGB tip with the default hydrogen threshold.
pub fn find_transition(series: &HistorySeries, teff_max: f64) -> CoreResult<u32> {
    find_transition_with(series, teff_max, H1_EXHAUSTED)
}

/// Model number (not position) of the maximum `log_L` among samples with
/// `center_h1 < h1_exhausted` and `log_Teff < teff_max`.
///
/// Ties resolve to the earliest sample.
pub fn find_transition_with(
    series: &HistorySeries,
    teff_max: f64,
    h1_exhausted: f64,
) -> CoreResult<u32> {
    let model_number = series.column(columns::MODEL_NUMBER)?;
    let center_h1 = series.column(columns::CENTER_H1)?;
    let log_teff = series.column(columns::LOG_TEFF)?;
    let log_l = series.column(columns::LOG_L)?;

    let mut best: Option<(usize, f64)> = None;
    for i in 0..series.len() {
        if !(center_h1[i] < h1_exhausted && log_teff[i] < teff_max) || log_l[i].is_nan() {
            continue;
        }
        match best {
            Some((_, l)) if log_l[i] <= l => {}
            _ => best = Some((i, log_l[i])),
        }
    }

    let (position, _) = best.ok_or(CoreError::TipNotFound { teff_max })?;
    let model = model_number[position].round();
    if !(0.0..=f64::from(u32::MAX)).contains(&model) {
        return Err(CoreError::SampleOutOfRange {
            model_number: model as i64,
            len: series.len(),
        });
    }
    Ok(model as u32)
}
