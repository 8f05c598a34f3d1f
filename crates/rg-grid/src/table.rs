//! Column-aligned text output of the grid table.
//!
//! The header right-aligns every name to its column width (plus a three
//! space gap after the first column); the body holds tab-separated `%18.8f`
//! values.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use tracing::{info, warn};

use crate::schema::{Column, GridRow, SCHEMA};
use crate::{GridError, GridResult};

const COLUMN_GAP: usize = 3;

/// Header line (without newline) for `columns`.
pub fn header_line(columns: &[Column]) -> String {
    let mut head = String::new();
    for (i, column) in columns.iter().enumerate() {
        let width = column.kind.width();
        let gap = if i == 0 { 0 } else { COLUMN_GAP };
        if column.name.len() > width {
            warn!(
                column = column.name,
                len = column.name.len(),
                width,
                "column name too long for its width"
            );
            head.push_str(&" ".repeat(gap));
            head.push_str(column.name);
        } else {
            head.push_str(&format!("{:>w$}", column.name, w = width + gap));
        }
    }
    head
}

/// Tab-separated fixed-point rendering of one row.
pub fn format_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format!("{:18.8}", v))
        .collect::<Vec<_>>()
        .join("\t")
}

pub fn write_table<W: Write>(out: &mut W, rows: &[GridRow]) -> io::Result<()> {
    writeln!(out, "{}", header_line(&SCHEMA))?;
    for row in rows {
        writeln!(out, "{}", format_values(&row.values()))?;
    }
    out.flush()
}

/// Write the full table to `path`, replacing any previous file.
pub fn save_table(path: &Path, rows: &[GridRow]) -> GridResult<()> {
    let table_err = |e| GridError::TableWrite {
        path: path.to_path_buf(),
        source: e,
    };
    let file = File::create(path).map_err(table_err)?;
    let mut out = BufWriter::new(file);
    write_table(&mut out, rows).map_err(table_err)?;
    info!(path = %path.display(), rows = rows.len(), "grid table written");
    Ok(())
}
