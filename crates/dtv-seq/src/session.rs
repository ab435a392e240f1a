use std::fs::{self, File};
use std::path::{Path, PathBuf};

use csv::{Writer, WriterBuilder};
use dtv_core::errors::{DtvError, ErrorInfo};
use dtv_core::rng::RngHandle;
use dtv_core::types::{CorrectResponse, Response, Trial, TrialOutcome};
use rand::Rng;

use crate::builder::TrialSequence;
use crate::export::{trial_record, TRIAL_COLUMNS};

/// Identifier columns prefixed to every recorded trial row.
pub const SUBJECT_COLUMNS: [&str; 2] = ["subj_id", "seed"];

/// The person a sequence is generated for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Identifier naming the participant's data file.
    pub subj_id: String,
    /// Seed their sequence was generated from.
    pub seed: u64,
}

impl Participant {
    /// Pairs a subject id with its sequence seed.
    pub fn new(subj_id: impl Into<String>, seed: u64) -> Self {
        Self {
            subj_id: subj_id.into(),
            seed,
        }
    }

    /// Path of this participant's data file under `data_dir`.
    pub fn data_file(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}.csv", self.subj_id))
    }
}

/// Append-only CSV record of one session's responses.
///
/// Every append lands on disk immediately, so an interrupted session
/// keeps all trials run so far.
#[derive(Debug)]
pub struct DataFile {
    writer: Writer<File>,
    path: PathBuf,
}

impl DataFile {
    /// Creates the data file and writes its header row.
    ///
    /// Refuses to touch an existing file, so a colliding subject id
    /// cannot destroy recorded data.
    pub fn create(path: &Path) -> Result<Self, DtvError> {
        if path.exists() {
            return Err(DtvError::Session(
                ErrorInfo::new("data-file-exists", "refusing to overwrite recorded data")
                    .with_context("path", path.display().to_string()),
            ));
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| {
                    DtvError::Session(
                        ErrorInfo::new("data-dir-create", err.to_string())
                            .with_context("path", parent.display().to_string()),
                    )
                })?;
            }
        }
        let file = File::create(path).map_err(|err| {
            DtvError::Session(
                ErrorInfo::new("data-file-create", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let writer = WriterBuilder::new().has_headers(false).from_writer(file);
        let header: Vec<&str> = SUBJECT_COLUMNS
            .iter()
            .chain(TRIAL_COLUMNS.iter())
            .copied()
            .collect();
        let mut data = Self {
            writer,
            path: path.to_path_buf(),
        };
        data.writer
            .write_record(&header)
            .map_err(|err| data.wrap("data-header", err.to_string()))?;
        data.flush()?;
        Ok(data)
    }

    /// Records one completed trial and flushes it to disk.
    pub fn append(&mut self, participant: &Participant, trial: &Trial) -> Result<(), DtvError> {
        let mut record = vec![participant.subj_id.clone(), participant.seed.to_string()];
        record.extend(trial_record(trial));
        self.writer
            .write_record(&record)
            .map_err(|err| self.wrap("data-write", err.to_string()))?;
        self.flush()
    }

    fn flush(&mut self) -> Result<(), DtvError> {
        self.writer
            .flush()
            .map_err(|err| self.wrap("data-flush", err.to_string()))
    }

    fn wrap(&self, code: &str, message: String) -> DtvError {
        DtvError::Session(
            ErrorInfo::new(code, message).with_context("path", self.path.display().to_string()),
        )
    }
}

/// Presents trials and screens to the participant.
///
/// The session loop drives a presenter through the sequence; swapping
/// the implementation swaps the front end without touching recording.
pub trait TrialPresenter {
    /// Runs one trial and returns what the participant did.
    fn run_trial(&mut self, trial: &Trial) -> Result<TrialOutcome, DtvError>;

    /// Shown once the practice block is finished.
    fn end_of_practice(&mut self) -> Result<(), DtvError> {
        Ok(())
    }

    /// Shown after each completed test block.
    fn block_break(&mut self, block: u32) -> Result<(), DtvError> {
        let _ = block;
        Ok(())
    }

    /// Shown after the final block.
    fn end_of_session(&mut self) -> Result<(), DtvError> {
        Ok(())
    }
}

/// Runs a sequence block by block, recording every response.
///
/// Practice ends with its own screen; every test block ends with a
/// break. Returns the completed trials with their outcomes attached.
pub fn run_session(
    sequence: &TrialSequence,
    participant: &Participant,
    data: &mut DataFile,
    presenter: &mut dyn TrialPresenter,
) -> Result<Vec<Trial>, DtvError> {
    let mut completed = Vec::with_capacity(sequence.len());
    for block in sequence.iter_blocks() {
        for trial in block {
            let outcome = presenter.run_trial(trial)?;
            let mut done = trial.clone();
            done.outcome = Some(outcome);
            data.append(participant, &done)?;
            completed.push(done);
        }
        match block.first() {
            Some(first) if first.is_practice() => presenter.end_of_practice()?,
            Some(first) => presenter.block_break(first.block)?,
            None => {}
        }
    }
    presenter.end_of_session()?;
    Ok(completed)
}

/// Scripted presenter for exercising sessions without a participant.
#[derive(Debug)]
pub struct SimulatedPresenter {
    rng: RngHandle,
    accuracy: f64,
    timeout_rate: f64,
    max_wait_ms: f64,
}

impl SimulatedPresenter {
    /// A presenter answering correctly nine times out of ten.
    pub fn new(rng: RngHandle, max_wait_ms: f64) -> Self {
        Self {
            rng,
            accuracy: 0.9,
            timeout_rate: 0.02,
            max_wait_ms,
        }
    }

    /// Overrides the answer and timeout rates.
    pub fn with_rates(mut self, accuracy: f64, timeout_rate: f64) -> Self {
        self.accuracy = accuracy.clamp(0.0, 1.0);
        self.timeout_rate = timeout_rate.clamp(0.0, 1.0);
        self
    }
}

impl TrialPresenter for SimulatedPresenter {
    fn run_trial(&mut self, trial: &Trial) -> Result<TrialOutcome, DtvError> {
        if self.rng.gen_bool(self.timeout_rate) {
            return Ok(TrialOutcome::timed_out(self.max_wait_ms));
        }
        let answers_well = self.rng.gen_bool(self.accuracy);
        let response = match (trial.correct_response, answers_well) {
            (CorrectResponse::Yes, true) | (CorrectResponse::No, false) => Response::Yes,
            (CorrectResponse::No, true) | (CorrectResponse::Yes, false) => Response::No,
        };
        let rt_ms = self.rng.gen_range(0.0..self.max_wait_ms);
        Ok(TrialOutcome::scored(response, rt_ms, trial.correct_response))
    }
}
