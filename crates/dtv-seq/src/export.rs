use std::fs;
use std::io::Write;
use std::path::Path;

use csv::{Writer, WriterBuilder};
use dtv_core::errors::{DtvError, ErrorInfo};
use dtv_core::types::Trial;

/// Column order for every exported or recorded trial row.
pub const TRIAL_COLUMNS: [&str; 13] = [
    "block",
    "block_type",
    "trial",
    "proposition_id",
    "question_slug",
    "cue",
    "mask_type",
    "response_type",
    "pic",
    "correct_response",
    "response",
    "rt",
    "is_correct",
];

/// Formats one trial as its thirteen column values.
///
/// Unresolved fields render as empty strings: `pic` on prompt trials
/// and the three outcome columns on trials not yet run.
pub fn trial_record(trial: &Trial) -> Vec<String> {
    let (response, rt, is_correct) = match &trial.outcome {
        Some(outcome) => (
            outcome.response.to_string(),
            outcome.rt_ms.to_string(),
            if outcome.is_correct { "1" } else { "0" }.to_string(),
        ),
        None => (String::new(), String::new(), String::new()),
    };
    vec![
        trial.block.to_string(),
        trial.block_type.to_string(),
        trial.trial.to_string(),
        trial.proposition_id.to_string(),
        trial.question_slug.clone(),
        trial.cue.to_string(),
        trial.mask_type.to_string(),
        trial.response_type.to_string(),
        trial.pic.as_ref().map(ToString::to_string).unwrap_or_default(),
        trial.correct_response.to_string(),
        response,
        rt,
        is_correct,
    ]
}

fn write_all<W: Write>(writer: &mut Writer<W>, trials: &[Trial]) -> Result<(), csv::Error> {
    writer.write_record(TRIAL_COLUMNS)?;
    for trial in trials {
        writer.write_record(trial_record(trial))?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes trials as a headed CSV file.
pub fn write_trials_csv(path: &Path, trials: &[Trial]) -> Result<(), DtvError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|err| {
                DtvError::Serde(
                    ErrorInfo::new("trials-mkdir", err.to_string())
                        .with_context("path", parent.display().to_string()),
                )
            })?;
        }
    }
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|err| wrap_csv("trials-open", err))?;
    write_all(&mut writer, trials).map_err(|err| wrap_csv("trials-write", err))
}

/// Renders trials as headed CSV text, for digests and tests.
pub fn trials_to_csv_string(trials: &[Trial]) -> Result<String, DtvError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    write_all(&mut writer, trials).map_err(|err| wrap_csv("trials-write", err))?;
    let bytes = writer
        .into_inner()
        .map_err(|err| DtvError::Serde(ErrorInfo::new("trials-buffer", err.to_string())))?;
    String::from_utf8(bytes)
        .map_err(|err| DtvError::Serde(ErrorInfo::new("trials-utf8", err.to_string())))
}

fn wrap_csv(code: &str, err: csv::Error) -> DtvError {
    DtvError::Serde(
        ErrorInfo::new(code, "trial CSV encoding failed").with_context("cause", err.to_string()),
    )
}
