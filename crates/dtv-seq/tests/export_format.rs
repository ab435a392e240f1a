use std::fs;

use dtv_core::types::{
    BlockType, CorrectResponse, Cue, MaskType, PropositionId, Response, ResponseType, Trial,
    TrialOutcome,
};
use dtv_seq::{trial_record, trials_to_csv_string, write_trials_csv, TRIAL_COLUMNS};
use tempfile::tempdir;

fn pending_trial() -> Trial {
    Trial {
        block: 1,
        block_type: BlockType::Test,
        trial: 9,
        proposition_id: PropositionId::new("p-017"),
        question_slug: "is-it-used-in-circuses".to_string(),
        cue: Cue::new("elephant"),
        mask_type: MaskType::Mask,
        response_type: ResponseType::Prompt,
        pic: None,
        correct_response: CorrectResponse::Yes,
        outcome: None,
    }
}

#[test]
fn column_order_is_fixed() {
    assert_eq!(TRIAL_COLUMNS[0], "block");
    assert_eq!(TRIAL_COLUMNS[2], "trial");
    assert_eq!(TRIAL_COLUMNS[8], "pic");
    assert_eq!(TRIAL_COLUMNS[12], "is_correct");
}

#[test]
fn pending_trials_leave_outcome_columns_empty() {
    let record = trial_record(&pending_trial());
    assert_eq!(record.len(), TRIAL_COLUMNS.len());
    assert_eq!(record[0], "1");
    assert_eq!(record[1], "test");
    assert_eq!(record[2], "9");
    assert_eq!(record[3], "p-017");
    assert_eq!(record[4], "is-it-used-in-circuses");
    assert_eq!(record[5], "elephant");
    assert_eq!(record[8], "", "prompt trials have no picture");
    assert_eq!(record[10], "");
    assert_eq!(record[11], "");
    assert_eq!(record[12], "");
}

#[test]
fn scored_outcomes_render_response_latency_and_accuracy() {
    let mut trial = pending_trial();
    trial.outcome = Some(TrialOutcome::scored(
        Response::No,
        835.5,
        trial.correct_response,
    ));
    let record = trial_record(&trial);
    assert_eq!(record[10], "no");
    assert_eq!(record[11], "835.5");
    assert_eq!(record[12], "0");

    trial.outcome = Some(TrialOutcome::scored(
        Response::Yes,
        412.0,
        trial.correct_response,
    ));
    let record = trial_record(&trial);
    assert_eq!(record[10], "yes");
    assert_eq!(record[12], "1");
}

#[test]
fn timeouts_render_the_sentinel_row() {
    let mut trial = pending_trial();
    trial.outcome = Some(TrialOutcome::timed_out(3000.0));
    let record = trial_record(&trial);
    assert_eq!(record[10], "timeout");
    assert_eq!(record[11], "3000");
    assert_eq!(record[12], "0");
}

#[test]
fn pictures_render_their_cue() {
    let mut trial = pending_trial();
    trial.response_type = ResponseType::Pic;
    trial.pic = Some(Cue::new("lantern"));
    let record = trial_record(&trial);
    assert_eq!(record[7], "pic");
    assert_eq!(record[8], "lantern");
}

#[test]
fn csv_text_starts_with_the_header() {
    let text = trials_to_csv_string(&[pending_trial()]).unwrap();
    let mut lines = text.lines();
    assert_eq!(lines.next(), Some(TRIAL_COLUMNS.join(",").as_str()));
    assert_eq!(lines.next().map(|line| line.starts_with("1,test,9,p-017")), Some(true));
    assert_eq!(lines.next(), None);
}

#[test]
fn file_export_matches_the_text_rendering() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("trials").join("session.csv");

    let trials = vec![pending_trial()];
    write_trials_csv(&path, &trials).unwrap();

    let on_disk = fs::read_to_string(&path).unwrap();
    assert_eq!(on_disk, trials_to_csv_string(&trials).unwrap());
}
