//! In-memory evolutionary track.
//!
//! A `HistorySeries` stores named numeric columns of equal length. Position
//! `i` holds model number `i + 1` for a track without restarts.

use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};

/// Column names used by the grid tools.
pub mod columns {
    pub const MODEL_NUMBER: &str = "model_number";
    pub const CENTER_H1: &str = "center_h1";
    pub const LOG_TEFF: &str = "log_Teff";
    pub const LOG_L: &str = "log_L";
    pub const STAR_MASS: &str = "star_mass";
    pub const STAR_AGE: &str = "star_age";
    pub const HE_CORE_MASS: &str = "he_core_mass";
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistorySeries {
    header: BTreeMap<String, String>,
    names: Vec<String>,
    data: Vec<Vec<f64>>,
}

impl HistorySeries {
    /// Build a series from named columns; all columns must share one length.
    pub fn new(
        header: BTreeMap<String, String>,
        columns: Vec<(String, Vec<f64>)>,
    ) -> CoreResult<Self> {
        let expected = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut names = Vec::with_capacity(columns.len());
        let mut data = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            if values.len() != expected {
                return Err(CoreError::ColumnLength {
                    name,
                    expected,
                    actual: values.len(),
                });
            }
            names.push(name);
            data.push(values);
        }
        Ok(Self {
            header,
            names,
            data,
        })
    }

    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> CoreResult<Self> {
        Self::new(
            BTreeMap::new(),
            columns.into_iter().map(|(n, v)| (n.into(), v)).collect(),
        )
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.data.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn header(&self) -> &BTreeMap<String, String> {
        &self.header
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn column(&self, name: &str) -> CoreResult<&[f64]> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.data[i].as_slice())
            .ok_or_else(|| CoreError::MissingColumn {
                name: name.to_string(),
            })
    }

    /// Last sample of a column, `None` for an empty series.
    pub fn last(&self, name: &str) -> CoreResult<Option<f64>> {
        Ok(self.column(name)?.last().copied())
    }

    /// Value of `name` for a 1-based model number (stored at `model_number - 1`).
    pub fn at_model(&self, name: &str, model_number: i64) -> CoreResult<f64> {
        let values = self.column(name)?;
        let out_of_range = CoreError::SampleOutOfRange {
            model_number,
            len: values.len(),
        };
        let position = usize::try_from(model_number - 1).map_err(|_| out_of_range.clone())?;
        values.get(position).copied().ok_or(out_of_range)
    }

    /// Drop rows superseded by a backup or restart.
    ///
    /// Walking backwards, a row survives only if its model number is lower
    /// than every model number after it, so the last occurrence of each model
    /// number is kept.
    pub fn without_backups(&self) -> CoreResult<Self> {
        let models = self.column(columns::MODEL_NUMBER)?;
        let mut keep = Vec::with_capacity(models.len());
        let mut lowest = f64::INFINITY;
        for (i, &model) in models.iter().enumerate().rev() {
            if model < lowest {
                keep.push(i);
                lowest = model;
            }
        }
        keep.reverse();

        let data = self
            .data
            .iter()
            .map(|values| keep.iter().map(|&i| values[i]).collect())
            .collect();
        Ok(Self {
            header: self.header.clone(),
            names: self.names.clone(),
            data,
        })
    }
}
