use std::collections::BTreeMap;

use dtv_core::errors::{DtvError, ErrorInfo};
use dtv_core::rng::RngHandle;
use rand::seq::SliceRandom;

/// Assigns a block id to every row, grouped fairly by a key.
///
/// Returns one id per row, parallel to the input. Ids form the contiguous
/// range `start..start + ceil(n / max_size)` and no block receives more
/// than `max_size` rows. Rows sharing a key value are dealt round-robin
/// across the blocks (in a seeded within-key order), so every block sees
/// a near-even share of each key class and block sizes differ by at most
/// one.
pub fn add_block<T, K, F>(
    rows: &[T],
    max_size: usize,
    start: u32,
    key_fn: F,
    rng: &mut RngHandle,
) -> Result<Vec<u32>, DtvError>
where
    F: Fn(&T) -> K,
    K: Ord,
{
    if max_size == 0 {
        return Err(DtvError::Design(ErrorInfo::new(
            "zero-block-size",
            "maximum block size must be at least one",
        )));
    }
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let count = rows.len().div_ceil(max_size);
    let mut classes: BTreeMap<K, Vec<usize>> = BTreeMap::new();
    for (idx, row) in rows.iter().enumerate() {
        classes.entry(key_fn(row)).or_default().push(idx);
    }

    // Global rotating cursor: consecutive assignments land in consecutive
    // blocks, which keeps both the per-key spread and the overall block
    // sizes within one of each other.
    let mut ids = vec![0u32; rows.len()];
    let mut cursor = 0usize;
    for members in classes.values_mut() {
        members.shuffle(rng);
        for &idx in members.iter() {
            ids[idx] = start + (cursor % count) as u32;
            cursor += 1;
        }
    }
    Ok(ids)
}
