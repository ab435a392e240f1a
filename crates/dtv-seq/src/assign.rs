use dtv_core::errors::{DtvError, ErrorInfo};
use dtv_core::rng::RngHandle;
use dtv_core::types::{CorrectResponse, Cue, FeatType, Proposition};
use rand::seq::SliceRandom;

use crate::stimuli::PropositionPool;
use crate::templates::TrialTemplate;

/// A template bound to the proposition it will present.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedTrial {
    /// Factor assignments, with the cue repaired where needed.
    pub template: TrialTemplate,
    /// Content drawn from the pool, never shared with another trial.
    pub proposition: Proposition,
}

/// Binds one proposition to every template, consuming the pool.
///
/// When a template's cue has no content left for its feat_type and
/// correct_response cell, the cue is redrawn uniformly from the cues
/// that still do. A cell no cue can serve is a content exhaustion
/// error rather than a stuck retry loop.
pub fn assign_content(
    templates: Vec<TrialTemplate>,
    mut pool: PropositionPool,
    categories: &[Cue],
    rng: &mut RngHandle,
) -> Result<Vec<AssignedTrial>, DtvError> {
    let mut assigned = Vec::with_capacity(templates.len());
    for (idx, mut template) in templates.into_iter().enumerate() {
        if !pool.has_matching(&template.cue, template.feat_type, template.correct_response) {
            let viable =
                pool.cues_with_content(categories, template.feat_type, template.correct_response);
            let Some(cue) = viable.choose(rng) else {
                return Err(exhausted(idx, template.feat_type, template.correct_response));
            };
            template.cue = cue.clone();
        }
        let Some(proposition) = pool.take_matching(
            &template.cue,
            template.feat_type,
            template.correct_response,
            rng,
        ) else {
            return Err(exhausted(idx, template.feat_type, template.correct_response));
        };
        assigned.push(AssignedTrial {
            template,
            proposition,
        });
    }
    Ok(assigned)
}

fn exhausted(idx: usize, feat: FeatType, correct: CorrectResponse) -> DtvError {
    DtvError::Content(
        ErrorInfo::new(
            "pool-exhausted",
            "no proposition left for any cue in this cell",
        )
        .with_context("trial", idx.to_string())
        .with_context("feat_type", feat.as_str())
        .with_context("correct_response", correct.as_str()),
    )
}
