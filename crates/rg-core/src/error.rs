use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Malformed name '{name}': {reason}")]
    Format { name: String, reason: String },

    #[error("No sample with exhausted core hydrogen below log_Teff={teff_max}")]
    TipNotFound { teff_max: f64 },

    #[error("Model number {model_number} outside of history (len={len})")]
    SampleOutOfRange { model_number: i64, len: usize },

    #[error("Missing history column: {name}")]
    MissingColumn { name: String },

    #[error("Column {name} has {actual} samples (expected {expected})")]
    ColumnLength {
        name: String,
        expected: usize,
        actual: usize,
    },
}

impl CoreError {
    pub(crate) fn format(name: &str, reason: impl Into<String>) -> Self {
        CoreError::Format {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
