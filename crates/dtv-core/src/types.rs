//! The trial data model: factor levels, propositions, and trial rows.

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{DtvError, ErrorInfo};

fn unknown_value(field: &str, value: &str) -> DtvError {
    DtvError::Stimuli(
        ErrorInfo::new(
            format!("unknown-{}", field.replace('_', "-")),
            format!("unrecognized {field} value"),
        )
        .with_context("value", value),
    )
}

/// Content framing dimension: visually grounded or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatType {
    /// The question probes a visual feature of the cued object.
    Visual,
    /// The question probes a non-visual (semantic) feature.
    Nonvisual,
}

impl FeatType {
    /// Returns the wire name used in tables and data files.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatType::Visual => "visual",
            FeatType::Nonvisual => "nonvisual",
        }
    }
}

impl Display for FeatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatType {
    type Err = DtvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "visual" => Ok(FeatType::Visual),
            "nonvisual" => Ok(FeatType::Nonvisual),
            other => Err(unknown_value("feat_type", other)),
        }
    }
}

/// Whether a dynamic visual mask is shown while audio plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaskType {
    /// Mask drawn during question and cue playback.
    Mask,
    /// Fixation cross only.
    Nomask,
}

impl MaskType {
    /// Returns the wire name used in tables and data files.
    pub fn as_str(&self) -> &'static str {
        match self {
            MaskType::Mask => "mask",
            MaskType::Nomask => "nomask",
        }
    }
}

impl Display for MaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MaskType {
    type Err = DtvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mask" => Ok(MaskType::Mask),
            "nomask" => Ok(MaskType::Nomask),
            other => Err(unknown_value("mask_type", other)),
        }
    }
}

/// Ground-truth answer to a proposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrectResponse {
    /// The proposition is true of the cued object.
    Yes,
    /// The proposition is false of the cued object.
    No,
}

impl CorrectResponse {
    /// Returns the wire name used in tables and data files.
    pub fn as_str(&self) -> &'static str {
        match self {
            CorrectResponse::Yes => "yes",
            CorrectResponse::No => "no",
        }
    }
}

impl Display for CorrectResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CorrectResponse {
    type Err = DtvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(CorrectResponse::Yes),
            "no" => Ok(CorrectResponse::No),
            other => Err(unknown_value("correct_response", other)),
        }
    }
}

/// What is displayed when a response is collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// Textual yes/no prompt.
    Prompt,
    /// A picture whose category may or may not match the cue.
    Pic,
}

impl ResponseType {
    /// Returns the wire name used in tables and data files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseType::Prompt => "prompt",
            ResponseType::Pic => "pic",
        }
    }
}

impl Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = DtvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "prompt" => Ok(ResponseType::Prompt),
            "pic" => Ok(ResponseType::Pic),
            other => Err(unknown_value("response_type", other)),
        }
    }
}

/// Which phase of the session a trial belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    /// Familiarization trial carved out before block partitioning.
    Practice,
    /// Main experimental trial.
    Test,
}

impl BlockType {
    /// Returns the wire name used in tables and data files.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Practice => "practice",
            BlockType::Test => "test",
        }
    }
}

impl Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BlockType {
    type Err = DtvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "practice" => Ok(BlockType::Practice),
            "test" => Ok(BlockType::Test),
            other => Err(unknown_value("block_type", other)),
        }
    }
}

/// A collected response, including the dedicated no-response sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    /// Participant answered yes.
    Yes,
    /// Participant answered no.
    No,
    /// No key press arrived before the response deadline.
    Timeout,
}

impl Response {
    /// Returns the wire name recorded in the data file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Response::Yes => "yes",
            Response::No => "no",
            Response::Timeout => "timeout",
        }
    }

    /// Whether this response agrees with the trial's correct response.
    /// A timeout never counts as correct.
    pub fn matches(&self, correct: CorrectResponse) -> bool {
        matches!(
            (self, correct),
            (Response::Yes, CorrectResponse::Yes) | (Response::No, CorrectResponse::No)
        )
    }
}

impl Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Response {
    type Err = DtvError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "yes" => Ok(Response::Yes),
            "no" => Ok(Response::No),
            "timeout" => Ok(Response::Timeout),
            other => Err(unknown_value("response", other)),
        }
    }
}

/// Category label a trial's content is about (an object class).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cue(String);

impl Cue {
    /// Creates a cue from its raw label.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw label.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Unique identifier of a proposition in the content table.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropositionId(String);

impl PropositionId {
    /// Creates an identifier from its raw form.
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PropositionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Immutable content record loaded from the proposition table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposition {
    /// Unique identifier within the table.
    pub id: PropositionId,
    /// Category the proposition is about.
    pub cue: Cue,
    /// Content framing dimension.
    pub feat_type: FeatType,
    /// Ground-truth answer.
    pub correct_response: CorrectResponse,
    /// Question text as presented to the participant.
    pub question: String,
    /// Slug derived from the question text, used to key audio stimuli.
    pub question_slug: String,
}

/// Response outcome recorded once a trial has run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// The collected response or the timeout sentinel.
    pub response: Response,
    /// Latency in milliseconds. For timeouts this is the response deadline.
    pub rt_ms: f64,
    /// Whether the response matched the trial's correct response.
    pub is_correct: bool,
}

impl TrialOutcome {
    /// Builds an outcome from a response and latency, scoring correctness
    /// against the given ground truth.
    pub fn scored(response: Response, rt_ms: f64, correct: CorrectResponse) -> Self {
        Self {
            response,
            rt_ms,
            is_correct: response.matches(correct),
        }
    }

    /// Builds the timeout outcome, recording the deadline as the latency.
    pub fn timed_out(deadline_ms: f64) -> Self {
        Self {
            response: Response::Timeout,
            rt_ms: deadline_ms,
            is_correct: false,
        }
    }
}

/// One fully resolved unit of the generated sequence.
///
/// Created by the sequence builder with `outcome` unset; a session fills
/// the outcome in exactly once after the trial has run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trial {
    /// Block id. Practice trials carry 0, test blocks count from 1.
    pub block: u32,
    /// Practice or test.
    pub block_type: BlockType,
    /// Final position in the concatenated sequence, counted from 0.
    pub trial: u32,
    /// Identifier of the assigned proposition.
    pub proposition_id: PropositionId,
    /// Slug keying the question audio stimulus.
    pub question_slug: String,
    /// Category the trial is about. May differ from the initial factorial
    /// draw when content assignment had to repair an infeasible cue.
    pub cue: Cue,
    /// Mask condition.
    pub mask_type: MaskType,
    /// Response display condition.
    pub response_type: ResponseType,
    /// Picture category shown at response time. Present iff
    /// `response_type` is [`ResponseType::Pic`].
    pub pic: Option<Cue>,
    /// Ground-truth answer for this trial.
    pub correct_response: CorrectResponse,
    /// Response fields, unset until a session runs the trial.
    pub outcome: Option<TrialOutcome>,
}

impl Trial {
    /// Whether this is a practice trial.
    pub fn is_practice(&self) -> bool {
        self.block_type == BlockType::Practice
    }
}
