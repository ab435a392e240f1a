#![deny(missing_docs)]
//! Deterministic trial-sequence generation for the dual-task
//! verification experiment, plus the session loop that runs a
//! generated sequence and records responses.

/// Content assignment with cue repair.
pub mod assign;
/// Pipeline orchestration and the generated sequence container.
pub mod builder;
/// YAML configuration schema, defaults, and validation.
pub mod config;
/// Probe picture selection.
pub mod distractor;
/// Fixed-column CSV rendering of trial rows.
pub mod export;
/// Reproducibility manifests and content digests.
pub mod manifest;
/// Practice carve-out.
pub mod practice;
/// Participant data files and the session loop.
pub mod session;
/// Proposition table loading and the consumable content pool.
pub mod stimuli;
/// Factorial design expansion into trial templates.
pub mod templates;

pub use builder::{generate, TrialSequence};
pub use config::{SequenceConfig, SessionConfig};
pub use export::{trial_record, trials_to_csv_string, write_trials_csv, TRIAL_COLUMNS};
pub use manifest::{stable_hash, SequenceManifest};
pub use session::{
    run_session, DataFile, Participant, SimulatedPresenter, TrialPresenter, SUBJECT_COLUMNS,
};
pub use stimuli::{question_slug, PropositionPool, PropositionTable};
