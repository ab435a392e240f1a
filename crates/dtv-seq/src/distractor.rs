use dtv_core::errors::{DtvError, ErrorInfo};
use dtv_core::rng::RngHandle;
use dtv_core::types::{CorrectResponse, Cue, ResponseType};
use rand::seq::SliceRandom;

/// Picks the picture shown at the probe, if the trial uses one.
///
/// Prompt trials carry no picture. Picture trials whose correct answer
/// is yes show the cued object itself; no-trials show an object drawn
/// uniformly from the other categories, so the picture alone always
/// decides the answer.
pub fn pick_distractor(
    response_type: ResponseType,
    correct_response: CorrectResponse,
    cue: &Cue,
    categories: &[Cue],
    rng: &mut RngHandle,
) -> Result<Option<Cue>, DtvError> {
    if response_type != ResponseType::Pic {
        return Ok(None);
    }
    if correct_response == CorrectResponse::Yes {
        return Ok(Some(cue.clone()));
    }
    let others: Vec<&Cue> = categories.iter().filter(|other| *other != cue).collect();
    let Some(&pick) = others.choose(rng) else {
        return Err(DtvError::Config(
            ErrorInfo::new(
                "no-distractor",
                "picture no-trials need a second cue category",
            )
            .with_context("cue", cue.as_str()),
        ));
    };
    Ok(Some(pick.clone()))
}
