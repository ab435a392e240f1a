#![deny(missing_docs)]
//! Shared vocabulary for the dual-task trial generator: structured
//! errors, the deterministic RNG policy, and the trial data model.

pub mod errors;
pub mod rng;
pub mod types;

pub use errors::{DtvError, ErrorInfo};
pub use rng::{derive_subject_seed, RngHandle};
pub use types::{
    BlockType, CorrectResponse, Cue, FeatType, MaskType, Proposition, PropositionId, Response,
    ResponseType, Trial, TrialOutcome,
};
