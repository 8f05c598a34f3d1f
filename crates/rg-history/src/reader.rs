//! MESA history file parsing.
//!
//! Layout (1-based lines):
//! 1. header column numbers
//! 2. header names
//! 3. header values (strings are double-quoted)
//! 4. blank
//! 5. data column numbers
//! 6. data column names
//! 7. one whitespace-separated row per saved model

use std::collections::BTreeMap;
use std::path::Path;

use rg_core::HistorySeries;
use tracing::debug;

use crate::{HistoryError, HistoryResult};

/// Default history file name inside a run directory.
pub const HISTORY_FILE_NAME: &str = "history.data";

const HEADER_NAMES_LINE: usize = 2;
const HEADER_VALUES_LINE: usize = 3;
const COLUMN_NAMES_LINE: usize = 6;

/// Read and parse a history file.
pub fn read_history(path: &Path) -> HistoryResult<HistorySeries> {
    let content = std::fs::read_to_string(path).map_err(|e| HistoryError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_history(&content, path)
}

/// Parse history file contents; `path` is only used for error reporting.
pub fn parse_history(content: &str, path: &Path) -> HistoryResult<HistorySeries> {
    let parse_err = |line: usize, message: String| HistoryError::Parse {
        path: path.to_path_buf(),
        line,
        message,
    };

    let lines: Vec<&str> = content.lines().collect();
    if lines.len() < COLUMN_NAMES_LINE {
        return Err(parse_err(
            lines.len(),
            format!(
                "expected at least {} header lines, found {}",
                COLUMN_NAMES_LINE,
                lines.len()
            ),
        ));
    }

    let header_names = split_fields(lines[HEADER_NAMES_LINE - 1]);
    let header_values = split_fields(lines[HEADER_VALUES_LINE - 1]);
    if header_names.len() != header_values.len() {
        return Err(parse_err(
            HEADER_VALUES_LINE,
            format!(
                "{} header names but {} header values",
                header_names.len(),
                header_values.len()
            ),
        ));
    }
    let header: BTreeMap<String, String> = header_names
        .into_iter()
        .map(str::to_string)
        .zip(
            header_values
                .into_iter()
                .map(|v| v.trim_matches('"').to_string()),
        )
        .collect();

    let names: Vec<String> = split_fields(lines[COLUMN_NAMES_LINE - 1])
        .into_iter()
        .map(str::to_string)
        .collect();
    if names.is_empty() {
        return Err(parse_err(COLUMN_NAMES_LINE, "no column names".to_string()));
    }

    let mut data: Vec<Vec<f64>> = vec![Vec::new(); names.len()];
    for (offset, line) in lines[COLUMN_NAMES_LINE..].iter().enumerate() {
        let line_no = COLUMN_NAMES_LINE + offset + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        if fields.len() != names.len() {
            return Err(parse_err(
                line_no,
                format!("expected {} values, found {}", names.len(), fields.len()),
            ));
        }
        for (column, field) in data.iter_mut().zip(&fields) {
            let value = parse_number(field)
                .ok_or_else(|| parse_err(line_no, format!("invalid number '{}'", field)))?;
            column.push(value);
        }
    }

    if data[0].is_empty() {
        return Err(HistoryError::Empty {
            path: path.to_path_buf(),
        });
    }

    debug!(
        path = %path.display(),
        columns = names.len(),
        samples = data[0].len(),
        "parsed history"
    );

    Ok(HistorySeries::new(
        header,
        names.into_iter().zip(data).collect(),
    )?)
}

/// Split on whitespace, keeping double-quoted strings together.
fn split_fields(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut start: Option<usize> = None;
    let mut in_quotes = false;
    for (i, c) in line.char_indices() {
        match (c, in_quotes) {
            ('"', _) => {
                in_quotes = !in_quotes;
                start.get_or_insert(i);
            }
            (c, false) if c.is_whitespace() => {
                if let Some(s) = start.take() {
                    fields.push(&line[s..i]);
                }
            }
            _ => {
                start.get_or_insert(i);
            }
        }
    }
    if let Some(s) = start {
        fields.push(&line[s..]);
    }
    fields
}

/// Parse a number, accepting Fortran `D` exponents.
fn parse_number(field: &str) -> Option<f64> {
    field
        .parse::<f64>()
        .ok()
        .or_else(|| field.replace(['D', 'd'], "E").parse::<f64>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_fields_keeps_quoted_strings() {
        assert_eq!(
            split_fields(r#"  1   "r15140"  "a b"  2.5 "#),
            vec!["1", r#""r15140""#, r#""a b""#, "2.5"]
        );
        assert!(split_fields("   ").is_empty());
    }

    #[test]
    fn fortran_exponents() {
        assert_eq!(parse_number("1.5D+02"), Some(150.0));
        assert_eq!(parse_number("-2.0d-1"), Some(-0.2));
        assert_eq!(parse_number("1.0E-05"), Some(1.0e-5));
        assert_eq!(parse_number("abc"), None);
    }
}
