use dtv_core::rng::RngHandle;
use dtv_design::{add_block, counterbalance, expand, extend, smart_shuffle, DesignRow, FactorMap};

fn base_factors() -> FactorMap {
    let mut factors = FactorMap::new();
    factors.insert(
        "feat_type".into(),
        vec!["visual".into(), "nonvisual".into()],
    );
    factors.insert("mask_type".into(), vec!["mask".into(), "nomask".into()]);
    factors
}

fn column(rows: &[DesignRow], name: &str) -> Vec<String> {
    rows.iter().map(|row| row[name].clone()).collect()
}

#[test]
fn counterbalance_crosses_last_factor_fastest() {
    let rows = counterbalance(&base_factors()).unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(
        column(&rows, "feat_type"),
        vec!["visual", "visual", "nonvisual", "nonvisual"]
    );
    assert_eq!(
        column(&rows, "mask_type"),
        vec!["mask", "nomask", "mask", "nomask"]
    );
}

#[test]
fn counterbalance_rejects_empty_inputs() {
    let err = counterbalance(&FactorMap::new()).unwrap_err();
    assert_eq!(err.info().code, "no-factors");

    let mut factors = base_factors();
    factors.insert("degenerate".into(), Vec::new());
    let err = counterbalance(&factors).unwrap_err();
    assert_eq!(err.info().code, "empty-factor");
    assert_eq!(
        err.info().context.get("factor").map(String::as_str),
        Some("degenerate")
    );
}

#[test]
fn expand_doubles_rows_and_deals_exact_ratio() {
    let base = counterbalance(&base_factors()).unwrap();
    let mut rng = RngHandle::from_seed(539);
    let rows = expand(&base, "correct_response", ["yes", "no"], 0.75, &mut rng).unwrap();

    assert_eq!(rows.len(), 8);
    let yes = rows
        .iter()
        .filter(|row| row["correct_response"] == "yes")
        .count();
    assert_eq!(yes, 6);
    for row in &rows {
        assert!(row.contains_key("feat_type"));
        assert!(row.contains_key("mask_type"));
    }
}

#[test]
fn expand_is_deterministic_for_a_seed() {
    let base = counterbalance(&base_factors()).unwrap();
    let mut rng_a = RngHandle::from_seed(7);
    let mut rng_b = RngHandle::from_seed(7);
    let rows_a = expand(&base, "correct_response", ["yes", "no"], 0.5, &mut rng_a).unwrap();
    let rows_b = expand(&base, "correct_response", ["yes", "no"], 0.5, &mut rng_b).unwrap();
    assert_eq!(rows_a, rows_b);
}

#[test]
fn expand_rejects_bad_ratio_and_duplicate_column() {
    let base = counterbalance(&base_factors()).unwrap();
    let mut rng = RngHandle::from_seed(1);

    let err = expand(&base, "correct_response", ["yes", "no"], 1.5, &mut rng).unwrap_err();
    assert_eq!(err.info().code, "bad-ratio");

    let err = expand(&base, "mask_type", ["mask", "nomask"], 0.5, &mut rng).unwrap_err();
    assert_eq!(err.info().code, "duplicate-column");
}

#[test]
fn extend_concatenates_copies_in_order() {
    let base = counterbalance(&base_factors()).unwrap();
    let rows = extend(&base, 4).unwrap();
    assert_eq!(rows.len(), 16);
    assert_eq!(rows[0], rows[4]);
    assert_eq!(rows[3], rows[15]);
}

#[test]
fn extend_rejects_zero_reps() {
    let base = counterbalance(&base_factors()).unwrap();
    let err = extend(&base, 0).unwrap_err();
    assert_eq!(err.info().code, "zero-reps");
}

#[test]
fn add_block_ids_are_contiguous_and_bounded() {
    let rows: Vec<u8> = vec![0, 1, 0, 1, 2, 2, 0, 1, 2, 0];
    let mut rng = RngHandle::from_seed(539);
    let ids = add_block(&rows, 4, 1, |key| *key, &mut rng).unwrap();

    assert_eq!(ids.len(), rows.len());
    let mut seen: Vec<u32> = ids.clone();
    seen.sort_unstable();
    seen.dedup();
    assert_eq!(seen, vec![1, 2, 3]);

    for block in 1..=3u32 {
        let size = ids.iter().filter(|id| **id == block).count();
        assert!(size <= 4);
        assert!(size >= 3);
    }
}

#[test]
fn add_block_spreads_each_key_class() {
    // 9 rows of one key over 3 blocks: every block must hold exactly 3.
    let rows = vec!["cat"; 9];
    let mut rng = RngHandle::from_seed(2);
    let ids = add_block(&rows, 3, 1, |key| *key, &mut rng).unwrap();
    for block in 1..=3u32 {
        assert_eq!(ids.iter().filter(|id| **id == block).count(), 3);
    }
}

#[test]
fn add_block_handles_degenerate_inputs() {
    let mut rng = RngHandle::from_seed(3);
    let empty: Vec<u8> = Vec::new();
    assert!(add_block(&empty, 4, 1, |key| *key, &mut rng)
        .unwrap()
        .is_empty());

    let err = add_block(&[1u8, 2], 0, 1, |key| *key, &mut rng).unwrap_err();
    assert_eq!(err.info().code, "zero-block-size");
}

#[test]
fn smart_shuffle_keeps_rows_inside_their_blocks() {
    let rows: Vec<(u32, char)> = vec![
        (1, 'a'),
        (1, 'b'),
        (1, 'a'),
        (1, 'b'),
        (2, 'c'),
        (2, 'd'),
        (2, 'c'),
        (2, 'd'),
    ];
    let mut rng = RngHandle::from_seed(539);
    let out = smart_shuffle(rows.clone(), |row| row.1, |row| row.0, &mut rng);

    assert_eq!(out.len(), rows.len());
    assert!(out.windows(2).all(|pair| pair[0].0 <= pair[1].0));

    for block in [1, 2] {
        let mut before: Vec<char> = rows
            .iter()
            .filter(|row| row.0 == block)
            .map(|row| row.1)
            .collect();
        let mut after: Vec<char> = out
            .iter()
            .filter(|row| row.0 == block)
            .map(|row| row.1)
            .collect();
        before.sort_unstable();
        after.sort_unstable();
        assert_eq!(before, after);
    }
}

#[test]
fn smart_shuffle_avoids_repeats_when_keys_are_unique() {
    let rows: Vec<(u32, u32)> = (0..12).map(|idx| (1 + idx / 6, idx)).collect();
    let mut rng = RngHandle::from_seed(11);
    let out = smart_shuffle(rows, |row| row.1, |row| row.0, &mut rng);
    assert!(out.windows(2).all(|pair| pair[0].1 != pair[1].1));
}

#[test]
fn smart_shuffle_is_deterministic_for_a_seed() {
    let rows: Vec<(u32, char)> = vec![
        (1, 'a'),
        (1, 'a'),
        (1, 'b'),
        (1, 'c'),
        (2, 'a'),
        (2, 'b'),
        (2, 'b'),
        (2, 'c'),
    ];
    let mut rng_a = RngHandle::from_seed(99);
    let mut rng_b = RngHandle::from_seed(99);
    let out_a = smart_shuffle(rows.clone(), |row| row.1, |row| row.0, &mut rng_a);
    let out_b = smart_shuffle(rows, |row| row.1, |row| row.0, &mut rng_b);
    assert_eq!(out_a, out_b);
}
