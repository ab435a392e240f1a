use std::collections::BTreeMap;

use dtv_core::rng::RngHandle;
use rand::seq::SliceRandom;

const SHUFFLE_ATTEMPTS: usize = 32;

/// Randomizes row order inside each block while avoiding key repeats.
///
/// Rows never cross block boundaries; the output is ordered by ascending
/// block id. Within a block the order is drawn by seeded shuffling, re-drawn
/// up to a fixed number of attempts while two rows sharing a key value sit
/// adjacent, and finally patched by a deterministic swap pass. When no
/// conflict-free arrangement is found the best attempt (fewest adjacent
/// repeats) is returned.
pub fn smart_shuffle<T, K, B, FK, FB>(
    rows: Vec<T>,
    key_fn: FK,
    block_fn: FB,
    rng: &mut RngHandle,
) -> Vec<T>
where
    FK: Fn(&T) -> K,
    FB: Fn(&T) -> B,
    K: Eq,
    B: Ord,
{
    let keys: Vec<K> = rows.iter().map(&key_fn).collect();
    let mut blocks: BTreeMap<B, Vec<usize>> = BTreeMap::new();
    for (idx, row) in rows.iter().enumerate() {
        blocks.entry(block_fn(row)).or_default().push(idx);
    }

    let mut order: Vec<usize> = Vec::with_capacity(rows.len());
    for members in blocks.into_values() {
        order.extend(arrange_block(members, &keys, rng));
    }

    let mut slots: Vec<Option<T>> = rows.into_iter().map(Some).collect();
    let mut out = Vec::with_capacity(slots.len());
    for idx in order {
        if let Some(row) = slots[idx].take() {
            out.push(row);
        }
    }
    out
}

fn arrange_block<K: Eq>(mut members: Vec<usize>, keys: &[K], rng: &mut RngHandle) -> Vec<usize> {
    members.shuffle(rng);
    let mut best = members.clone();
    let mut best_conflicts = count_conflicts(&best, keys);
    for _ in 1..SHUFFLE_ATTEMPTS {
        if best_conflicts == 0 {
            break;
        }
        members.shuffle(rng);
        let conflicts = count_conflicts(&members, keys);
        if conflicts < best_conflicts {
            best.copy_from_slice(&members);
            best_conflicts = conflicts;
        }
    }
    if best_conflicts > 0 {
        repair(&mut best, keys);
    }
    best
}

fn count_conflicts<K: Eq>(order: &[usize], keys: &[K]) -> usize {
    order
        .windows(2)
        .filter(|pair| keys[pair[0]] == keys[pair[1]])
        .count()
}

/// Single forward pass: every remaining adjacent repeat is swapped away if
/// a position exists that resolves it without creating a new repeat.
fn repair<K: Eq>(order: &mut [usize], keys: &[K]) {
    for pos in 1..order.len() {
        if keys[order[pos]] != keys[order[pos - 1]] {
            continue;
        }
        if let Some(target) = swap_target(order, keys, pos) {
            order.swap(pos, target);
        }
    }
}

fn swap_target<K: Eq>(order: &[usize], keys: &[K], pos: usize) -> Option<usize> {
    let len = order.len();
    (0..len).find(|&cand| {
        // neighbourhoods must not overlap, or the checks below go stale
        if cand + 1 >= pos && cand <= pos + 1 {
            return false;
        }
        let moved_in = &keys[order[cand]];
        let moved_out = &keys[order[pos]];
        if moved_in == &keys[order[pos - 1]] {
            return false;
        }
        if pos + 1 < len && moved_in == &keys[order[pos + 1]] {
            return false;
        }
        if cand > 0 && moved_out == &keys[order[cand - 1]] {
            return false;
        }
        if cand + 1 < len && moved_out == &keys[order[cand + 1]] {
            return false;
        }
        true
    })
}
