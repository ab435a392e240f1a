use dtv_core::errors::{DtvError, ErrorInfo};
use dtv_core::rng::RngHandle;
use rand::seq::SliceRandom;

use crate::factorial::DesignRow;

/// Doubles the design and deals a new two-level column across it.
///
/// The output holds two copies of `rows` in order, with `name` assigned so
/// that exactly `round(ratio * 2n)` rows carry `values[0]` and the rest
/// carry `values[1]`. Which rows receive the first value is a seeded
/// uniform draw without replacement.
pub fn expand(
    rows: &[DesignRow],
    name: &str,
    values: [&str; 2],
    ratio: f64,
    rng: &mut RngHandle,
) -> Result<Vec<DesignRow>, DtvError> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(DtvError::Design(
            ErrorInfo::new("bad-ratio", "expansion ratio outside the unit interval")
                .with_context("column", name)
                .with_context("ratio", ratio.to_string()),
        ));
    }
    if rows.iter().any(|row| row.contains_key(name)) {
        return Err(DtvError::Design(
            ErrorInfo::new("duplicate-column", "design already has this column")
                .with_context("column", name),
        ));
    }

    let mut doubled = Vec::with_capacity(rows.len() * 2);
    doubled.extend(rows.iter().cloned());
    doubled.extend(rows.iter().cloned());

    let total = doubled.len();
    let first_count = (ratio * total as f64).round() as usize;
    let mut labels: Vec<&str> = Vec::with_capacity(total);
    labels.resize(first_count, values[0]);
    labels.resize(total, values[1]);
    labels.shuffle(rng);

    for (row, label) in doubled.iter_mut().zip(&labels) {
        row.insert(name.to_string(), (*label).to_string());
    }
    Ok(doubled)
}

/// Replicates the design `reps` times, copies concatenated in order.
pub fn extend(rows: &[DesignRow], reps: usize) -> Result<Vec<DesignRow>, DtvError> {
    if reps == 0 {
        return Err(DtvError::Design(ErrorInfo::new(
            "zero-reps",
            "replication count must be at least one",
        )));
    }
    let mut out = Vec::with_capacity(rows.len() * reps);
    for _ in 0..reps {
        out.extend(rows.iter().cloned());
    }
    Ok(out)
}
