//! Fixed schema of the RGB grid table.

use rg_core::series::columns;
use rg_core::{CoreResult, HistorySeries, InitialParameters};

/// Storage kind of a table column, which fixes its header width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Text,
}

impl ColumnKind {
    pub fn width(self) -> usize {
        match self {
            ColumnKind::Numeric => 18,
            ColumnKind::Text => 80,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn numeric(name: &'static str) -> Column {
    Column {
        name,
        kind: ColumnKind::Numeric,
    }
}

/// Table columns in output order; matches [`GridRow::values`].
pub const SCHEMA: [Column; 19] = [
    numeric("m_i"),
    numeric("rot"),
    numeric("z"),
    numeric("y"),
    numeric("fh"),
    numeric("fhe"),
    numeric("fsh"),
    numeric("mlt"),
    numeric("sc"),
    numeric("reimers"),
    numeric("blocker"),
    numeric("turbulence"),
    numeric("m"),
    numeric("model_number"),
    numeric("log_Teff"),
    numeric("log_L"),
    numeric("age"),
    numeric("m_core"),
    numeric("level"),
];

/// One sampled model of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct GridRow {
    pub initial: InitialParameters,
    pub star_mass: f64,
    pub model_number: f64,
    pub log_teff: f64,
    pub log_l: f64,
    pub star_age: f64,
    pub he_core_mass: f64,
    /// Offset inside the sample window.
    pub level: i32,
}

impl GridRow {
    /// Values in [`SCHEMA`] order.
    pub fn values(&self) -> [f64; 19] {
        let p = self.initial.values();
        [
            p[0],
            p[1],
            p[2],
            p[3],
            p[4],
            p[5],
            p[6],
            p[7],
            p[8],
            p[9],
            p[10],
            p[11],
            self.star_mass,
            self.model_number,
            self.log_teff,
            self.log_l,
            self.star_age,
            self.he_core_mass,
            f64::from(self.level),
        ]
    }
}

/// Build the row for `model_number` (1-based, stored at `model_number - 1`).
pub fn extract_row(
    series: &HistorySeries,
    model_number: i64,
    level: i32,
    initial: &InitialParameters,
) -> CoreResult<GridRow> {
    let at = |name: &str| series.at_model(name, model_number);
    Ok(GridRow {
        initial: *initial,
        star_mass: at(columns::STAR_MASS)?,
        model_number: at(columns::MODEL_NUMBER)?,
        log_teff: at(columns::LOG_TEFF)?,
        log_l: at(columns::LOG_L)?,
        star_age: at(columns::STAR_AGE)?,
        he_core_mass: at(columns::HE_CORE_MASS)?,
        level,
    })
}
