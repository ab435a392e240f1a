use dtv_core::errors::{DtvError, ErrorInfo};
use dtv_core::rng::RngHandle;
use dtv_core::types::{BlockType, Trial};
use rand::seq::index;

/// Splits off `count` practice trials, drawn without replacement.
///
/// Returns the practice trials in draw order and the rest in their
/// original relative order. Practice trials are relabelled block 0;
/// the rest stay untouched for later block numbering. Practice must
/// leave at least one test trial behind.
pub fn carve_practice(
    trials: Vec<Trial>,
    count: usize,
    rng: &mut RngHandle,
) -> Result<(Vec<Trial>, Vec<Trial>), DtvError> {
    if count >= trials.len() {
        return Err(DtvError::Config(
            ErrorInfo::new(
                "practice-exceeds-trials",
                "practice would swallow the whole sequence",
            )
            .with_context("practice", count.to_string())
            .with_context("total", trials.len().to_string()),
        ));
    }

    let picked = index::sample(rng, trials.len(), count).into_vec();
    let mut slots: Vec<Option<Trial>> = trials.into_iter().map(Some).collect();

    let mut practice = Vec::with_capacity(count);
    for idx in &picked {
        let Some(mut trial) = slots[*idx].take() else {
            continue;
        };
        trial.block = 0;
        trial.block_type = BlockType::Practice;
        practice.push(trial);
    }
    let rest: Vec<Trial> = slots.into_iter().flatten().collect();
    Ok((practice, rest))
}
