use std::fs;
use std::path::PathBuf;

use dtv_core::errors::DtvError;
use dtv_core::rng::RngHandle;
use dtv_core::types::{CorrectResponse, Cue, FeatType};
use dtv_seq::PropositionTable;
use tempfile::{tempdir, TempDir};

fn write_table(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("propositions.csv");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

const GOOD: &str = "proposition_id,cue,feat_type,correct_response,question\n\
p-001,saxophone,visual,yes,Is it shiny?\n\
p-002,saxophone,nonvisual,no,Is it used in circuses?\n\
p-003,anchor,visual,no,Does it float by itself?\n";

#[test]
fn load_reads_rows_and_categories() {
    let (_dir, path) = write_table(GOOD);
    let table = PropositionTable::load(&path).unwrap();

    assert_eq!(table.len(), 3);
    assert_eq!(
        table.categories(),
        [Cue::new("saxophone"), Cue::new("anchor")]
    );
    assert_eq!(table.propositions()[1].question_slug, "is-it-used-in-circuses");
    assert_eq!(table.propositions()[2].feat_type, FeatType::Visual);
    assert_eq!(
        table.propositions()[2].correct_response,
        CorrectResponse::No
    );
}

#[test]
fn duplicate_ids_are_rejected() {
    let (_dir, path) = write_table(
        "proposition_id,cue,feat_type,correct_response,question\n\
         p-001,saxophone,visual,yes,Is it shiny?\n\
         p-001,anchor,visual,no,Does it float?\n",
    );
    let err = PropositionTable::load(&path).unwrap_err();
    assert!(matches!(err, DtvError::Stimuli(_)));
    assert_eq!(err.info().code, "duplicate-id");
    assert_eq!(
        err.info().context.get("proposition_id").map(String::as_str),
        Some("p-001")
    );
}

#[test]
fn unreadable_questions_are_rejected() {
    let (_dir, path) = write_table(
        "proposition_id,cue,feat_type,correct_response,question\n\
         p-001,saxophone,visual,yes,???\n",
    );
    let err = PropositionTable::load(&path).unwrap_err();
    assert_eq!(err.info().code, "empty-question");
}

#[test]
fn header_only_tables_are_rejected() {
    let (_dir, path) = write_table("proposition_id,cue,feat_type,correct_response,question\n");
    let err = PropositionTable::load(&path).unwrap_err();
    assert_eq!(err.info().code, "empty-table");
}

#[test]
fn missing_files_surface_the_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("absent.csv");
    let err = PropositionTable::load(&path).unwrap_err();
    assert_eq!(err.info().code, "table-open");
    assert!(err.info().context.contains_key("path"));
}

#[test]
fn unknown_factor_levels_name_the_record() {
    let (_dir, path) = write_table(
        "proposition_id,cue,feat_type,correct_response,question\n\
         p-001,saxophone,visible,yes,Is it shiny?\n",
    );
    let err = PropositionTable::load(&path).unwrap_err();
    assert_eq!(err.info().code, "unknown-feat-type");
    assert_eq!(err.info().context.get("record").map(String::as_str), Some("0"));
}

#[test]
fn short_records_are_parse_errors() {
    let (_dir, path) = write_table(
        "proposition_id,cue,feat_type,correct_response,question\n\
         p-001,saxophone,visual\n",
    );
    let err = PropositionTable::load(&path).unwrap_err();
    assert_eq!(err.info().code, "table-parse");
}

#[test]
fn pool_draws_consume_content() {
    let (_dir, path) = write_table(GOOD);
    let table = PropositionTable::load(&path).unwrap();
    let mut pool = table.pool();
    let mut rng = RngHandle::from_seed(7);

    let cue = Cue::new("saxophone");
    assert!(pool.has_matching(&cue, FeatType::Visual, CorrectResponse::Yes));

    let drawn = pool
        .take_matching(&cue, FeatType::Visual, CorrectResponse::Yes, &mut rng)
        .unwrap();
    assert_eq!(drawn.id.as_str(), "p-001");
    assert_eq!(pool.remaining(), 2);
    assert!(!pool.has_matching(&cue, FeatType::Visual, CorrectResponse::Yes));
    assert!(pool
        .take_matching(&cue, FeatType::Visual, CorrectResponse::Yes, &mut rng)
        .is_none());

    let viable = pool.cues_with_content(table.categories(), FeatType::Visual, CorrectResponse::No);
    assert_eq!(viable, [Cue::new("anchor")]);
}
