//! On-disk workspace layout and the JSON artifacts that connect the stages.
//!
//! Layout under the workspace root:
//!
//! ```text
//! data/petitions_metadata.json    collector output
//! data/processed_petitions.json   downloader manifest
//! petitions/{id}_rating{r}.docx   downloaded documents (cache)
//! petitions/{id}_rating{r}.txt    extracted text (cache)
//! results/eval_{id}_rating{r}.json  per-record evaluations
//! results/all_evaluations.json    aggregate list
//! results/calibration_summary.json
//! ```
//!
//! All artifacts are pretty-printed UTF-8 JSON. A missing input artifact is
//! [`StoreError::MissingArtifact`]: fatal, since the earlier stage has not
//! run.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use petiscore_core::{CalibrationSummary, Evaluation, EvaluationRecord, PetitionRecord,
    ProcessedPetition};

use crate::StoreError;

/// Per-record evaluation artifact: the evaluation plus the manifest entry it
/// was produced from, for provenance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationArtifact {
    pub request_id: i64,
    pub customer_rating: i32,
    pub evaluation: Evaluation,
    pub metadata: ProcessedPetition,
    pub method: String,
}

/// Filesystem workspace for one calibration run.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create the `data/`, `petitions/`, and `results/` directories.
    pub fn ensure_layout(&self) -> Result<(), StoreError> {
        fs::create_dir_all(self.data_dir())?;
        fs::create_dir_all(self.petitions_dir())?;
        fs::create_dir_all(self.results_dir())?;
        Ok(())
    }

    pub fn data_dir(&self) -> PathBuf {
        self.root.join("data")
    }

    pub fn petitions_dir(&self) -> PathBuf {
        self.root.join("petitions")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.root.join("results")
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir().join("petitions_metadata.json")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.data_dir().join("processed_petitions.json")
    }

    pub fn docx_path(&self, request_id: i64, rating: i32) -> PathBuf {
        self.petitions_dir()
            .join(format!("{request_id}_rating{rating}.docx"))
    }

    pub fn text_path(&self, request_id: i64, rating: i32) -> PathBuf {
        self.petitions_dir()
            .join(format!("{request_id}_rating{rating}.txt"))
    }

    pub fn evaluation_path(&self, request_id: i64, rating: i32) -> PathBuf {
        self.results_dir()
            .join(format!("eval_{request_id}_rating{rating}.json"))
    }

    pub fn all_evaluations_path(&self) -> PathBuf {
        self.results_dir().join("all_evaluations.json")
    }

    pub fn summary_path(&self) -> PathBuf {
        self.results_dir().join("calibration_summary.json")
    }

    // ── Collector metadata ──

    pub fn save_metadata(&self, petitions: &[PetitionRecord]) -> Result<(), StoreError> {
        write_json(&self.metadata_path(), petitions)
    }

    pub fn load_metadata(&self) -> Result<Vec<PetitionRecord>, StoreError> {
        read_json(&self.metadata_path())
    }

    // ── Downloader manifest ──

    pub fn save_manifest(&self, processed: &[ProcessedPetition]) -> Result<(), StoreError> {
        write_json(&self.manifest_path(), processed)
    }

    pub fn load_manifest(&self) -> Result<Vec<ProcessedPetition>, StoreError> {
        read_json(&self.manifest_path())
    }

    // ── Evaluations ──

    pub fn save_evaluation(&self, artifact: &EvaluationArtifact) -> Result<(), StoreError> {
        write_json(
            &self.evaluation_path(artifact.request_id, artifact.customer_rating),
            artifact,
        )
    }

    pub fn save_all_evaluations(&self, records: &[EvaluationRecord]) -> Result<(), StoreError> {
        write_json(&self.all_evaluations_path(), records)
    }

    pub fn load_all_evaluations(&self) -> Result<Vec<EvaluationRecord>, StoreError> {
        read_json(&self.all_evaluations_path())
    }

    // ── Summary ──

    pub fn save_summary(&self, summary: &CalibrationSummary) -> Result<(), StoreError> {
        write_json(&self.summary_path(), summary)
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, StoreError> {
    if !path.exists() {
        return Err(StoreError::MissingArtifact(path.to_path_buf()));
    }
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}
