//! Name codec for run directories and archived checkpoint models.
//!
//! Run directories follow the grid convention
//! `logs_m<m>_rot<rot>_z<z>_y<y>_fh<fh>_fhe<fhe>_fsh<fsh>_mlt<mlt>_sc<sc>_reimers<r>_blocker<b>_turbulence<t>`.
//! Each `_`-separated token after the tag carries a declared literal prefix
//! followed by a number.
//!
//! Archived models are named `rgb_<stem>_lvl<level>_<model_number>.mod`, where
//! `stem` is the run name without its `logs_` tag.

use core::fmt;

use crate::error::{CoreError, CoreResult};

/// Token separator inside run and artifact names.
pub const SEPARATOR: char = '_';

/// Length of the leading run tag (`logs_`) dropped from artifact names.
pub const RUN_TAG_LEN: usize = 5;

/// Declared prefixes of the twelve numeric tokens, in name order.
pub const RUN_FIELD_PREFIXES: [&str; 12] = [
    "m",
    "rot",
    "z",
    "y",
    "fh",
    "fhe",
    "fsh",
    "mlt",
    "sc",
    "reimers",
    "blocker",
    "turbulence",
];

const ARTIFACT_PREFIX: &str = "rgb_";
const ARTIFACT_LEVEL_PREFIX: &str = "lvl";
const ARTIFACT_EXTENSION: &str = ".mod";

/// Initial parameters of a progenitor, recovered from its run name.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InitialParameters {
    /// Initial mass.
    pub m: f64,
    /// Initial rotation.
    pub rot: f64,
    /// Metallicity.
    pub z: f64,
    /// Helium fraction.
    pub y: f64,
    /// Overshooting from the hydrogen-burning core.
    pub fh: f64,
    /// Overshooting from the helium-burning core.
    pub fhe: f64,
    /// Overshooting from the hydrogen shell.
    pub fsh: f64,
    /// Mixing length.
    pub mlt: f64,
    /// Semiconvection efficiency.
    pub sc: f64,
    /// Reimers wind efficiency.
    pub reimers: f64,
    /// Bloecker wind efficiency.
    pub blocker: f64,
    /// Turbulent mixing.
    pub turbulence: f64,
}

impl InitialParameters {
    /// Values in name order (same order as [`RUN_FIELD_PREFIXES`]).
    pub fn values(&self) -> [f64; 12] {
        [
            self.m,
            self.rot,
            self.z,
            self.y,
            self.fh,
            self.fhe,
            self.fsh,
            self.mlt,
            self.sc,
            self.reimers,
            self.blocker,
            self.turbulence,
        ]
    }

    pub fn from_values(v: [f64; 12]) -> Self {
        Self {
            m: v[0],
            rot: v[1],
            z: v[2],
            y: v[3],
            fh: v[4],
            fhe: v[5],
            fsh: v[6],
            mlt: v[7],
            sc: v[8],
            reimers: v[9],
            blocker: v[10],
            turbulence: v[11],
        }
    }
}

/// Parse the initial parameters encoded in a run directory name.
///
/// The name must consist of exactly 13 `_`-separated tokens: a tag followed by
/// the twelve prefixed numbers of [`RUN_FIELD_PREFIXES`].
pub fn parse_run_name(name: &str) -> CoreResult<InitialParameters> {
    let tokens: Vec<&str> = name.split(SEPARATOR).collect();
    let expected = RUN_FIELD_PREFIXES.len() + 1;
    if tokens.len() != expected {
        return Err(CoreError::format(
            name,
            format!("expected {} tokens, found {}", expected, tokens.len()),
        ));
    }

    let mut values = [0.0_f64; 12];
    for (slot, (prefix, token)) in RUN_FIELD_PREFIXES.iter().zip(&tokens[1..]).enumerate() {
        let digits = token.strip_prefix(prefix).ok_or_else(|| {
            CoreError::format(name, format!("token '{}' lacks prefix '{}'", token, prefix))
        })?;
        values[slot] = digits.parse::<f64>().map_err(|_| {
            CoreError::format(
                name,
                format!("value '{}' of field '{}' is not numeric", digits, prefix),
            )
        })?;
    }

    Ok(InitialParameters::from_values(values))
}

/// File name of the checkpoint saved for `model_number` inside a run directory.
pub fn checkpoint_file_name(model_number: u32) -> String {
    format!("model_{:05}.mod", model_number)
}

/// Decoded archived model name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArtifactName {
    /// Run name without its leading tag.
    pub run_stem: String,
    /// Window offset.
    pub level: i32,
    pub model_number: u32,
}

impl ArtifactName {
    pub fn for_run(run_name: &str, level: i32, model_number: u32) -> CoreResult<Self> {
        let run_stem = run_name.get(RUN_TAG_LEN..).ok_or_else(|| {
            CoreError::format(
                run_name,
                format!("shorter than the {}-character run tag", RUN_TAG_LEN),
            )
        })?;
        Ok(Self {
            run_stem: run_stem.to_string(),
            level,
            model_number,
        })
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}{}{}{}",
            ARTIFACT_PREFIX,
            self.run_stem,
            SEPARATOR,
            ARTIFACT_LEVEL_PREFIX,
            self.level,
            SEPARATOR,
            self.model_number,
            ARTIFACT_EXTENSION
        )
    }
}

/// Build the archive file name for the model `model_number` at window `level`.
pub fn make_artifact_name(run_name: &str, level: i32, model_number: u32) -> CoreResult<String> {
    Ok(ArtifactName::for_run(run_name, level, model_number)?.to_string())
}

/// Decode a name produced by [`make_artifact_name`].
pub fn parse_artifact_name(name: &str) -> CoreResult<ArtifactName> {
    let body = name
        .strip_prefix(ARTIFACT_PREFIX)
        .and_then(|rest| rest.strip_suffix(ARTIFACT_EXTENSION))
        .ok_or_else(|| {
            CoreError::format(
                name,
                format!(
                    "expected '{}...{}' artifact name",
                    ARTIFACT_PREFIX, ARTIFACT_EXTENSION
                ),
            )
        })?;

    let (rest, model) = body
        .rsplit_once(SEPARATOR)
        .ok_or_else(|| CoreError::format(name, "missing model number"))?;
    let (run_stem, level) = rest
        .rsplit_once(SEPARATOR)
        .ok_or_else(|| CoreError::format(name, "missing level"))?;

    let level = level
        .strip_prefix(ARTIFACT_LEVEL_PREFIX)
        .and_then(|l| l.parse::<i32>().ok())
        .ok_or_else(|| CoreError::format(name, format!("invalid level token '{}'", level)))?;
    let model_number = model
        .parse::<u32>()
        .map_err(|_| CoreError::format(name, format!("invalid model number '{}'", model)))?;

    Ok(ArtifactName {
        run_stem: run_stem.to_string(),
        level,
        model_number,
    })
}
