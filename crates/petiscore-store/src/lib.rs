//! Storage layer: the collector's Postgres query and the JSON artifacts that
//! carry data between pipeline stages.

mod artifacts;
mod db;
mod error;

pub use artifacts::{EvaluationArtifact, Workspace};
pub use db::{AREA_CONSUMIDOR, Db, MODALITY_INICIAL};
pub use error::StoreError;
