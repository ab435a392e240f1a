use std::fs;
use std::path::Path;

use chrono::Utc;
use dtv_core::errors::{DtvError, ErrorInfo};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::builder::TrialSequence;
use crate::config::SequenceConfig;
use crate::export::trials_to_csv_string;
use crate::stimuli::PropositionTable;

/// Hex digest of any serializable value's canonical JSON form.
pub fn stable_hash<T: Serialize>(value: &T) -> Result<String, DtvError> {
    let bytes = serde_json::to_vec(value)
        .map_err(|err| DtvError::Serde(ErrorInfo::new("hash-encode", err.to_string())))?;
    Ok(format!("{:x}", Sha256::digest(bytes)))
}

/// Reproducibility record written beside an exported sequence.
///
/// The hashes pin down the exact inputs and output, so a re-run with
/// the same manifest can verify it rebuilt the same sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceManifest {
    /// Manifest layout version.
    pub schema_version: u32,
    /// Master seed the sequence was generated from.
    pub seed: u64,
    /// Full configuration in effect for the run.
    pub config: SequenceConfig,
    /// Digest of the proposition table content.
    pub table_hash: String,
    /// Digest of the exported trial rows.
    pub rows_hash: String,
    /// Total number of trials, practice included.
    pub trial_count: usize,
    /// Number of practice trials at the head of the sequence.
    pub practice_count: usize,
    /// Number of numbered test blocks.
    pub test_block_count: u32,
    /// RFC 3339 timestamp recorded at generation time.
    pub created_at: String,
}

impl SequenceManifest {
    /// Builds the manifest for a generated sequence.
    pub fn describe(
        config: &SequenceConfig,
        table: &PropositionTable,
        sequence: &TrialSequence,
    ) -> Result<Self, DtvError> {
        let rows = trials_to_csv_string(sequence.trials())?;
        Ok(Self {
            schema_version: 1,
            seed: sequence.seed(),
            config: config.clone(),
            table_hash: stable_hash(&table.propositions())?,
            rows_hash: format!("{:x}", Sha256::digest(rows.as_bytes())),
            trial_count: sequence.len(),
            practice_count: sequence.practice_len(),
            test_block_count: sequence.test_block_count(),
            created_at: Utc::now().to_rfc3339(),
        })
    }

    /// Serializes the manifest as pretty JSON at `path`.
    pub fn write(&self, path: &Path) -> Result<(), DtvError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| {
                    DtvError::Serde(
                        ErrorInfo::new("manifest-mkdir", err.to_string())
                            .with_context("path", parent.display().to_string()),
                    )
                })?;
            }
        }
        let payload = serde_json::to_string_pretty(self)
            .map_err(|err| DtvError::Serde(ErrorInfo::new("manifest-encode", err.to_string())))?;
        fs::write(path, payload).map_err(|err| {
            DtvError::Serde(
                ErrorInfo::new("manifest-write", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })
    }

    /// Reads a manifest back from disk.
    pub fn load(path: &Path) -> Result<Self, DtvError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            DtvError::Serde(
                ErrorInfo::new("manifest-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        serde_json::from_str(&contents)
            .map_err(|err| DtvError::Serde(ErrorInfo::new("manifest-parse", err.to_string())))
    }
}
