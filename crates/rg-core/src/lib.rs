//! rg-core: stable foundation for rgbgrid.
//!
//! Contains:
//! - error (shared error types)
//! - naming (run-directory and archived-model name codec)
//! - series (in-memory evolutionary track, named numeric columns)

pub mod error;
pub mod naming;
pub mod series;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use naming::{
    ArtifactName, InitialParameters, checkpoint_file_name, make_artifact_name, parse_artifact_name,
    parse_run_name,
};
pub use series::HistorySeries;
