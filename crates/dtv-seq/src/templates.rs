use dtv_core::errors::{DtvError, ErrorInfo};
use dtv_core::rng::RngHandle;
use dtv_core::types::{CorrectResponse, Cue, FeatType, MaskType, ResponseType};
use dtv_design::{counterbalance, expand, extend, DesignRow, FactorMap};
use rand::seq::SliceRandom;

use crate::config::SequenceConfig;
use crate::stimuli::PropositionTable;

/// Factor assignments for one trial before content is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrialTemplate {
    /// Whether the question probes a visual feature.
    pub feat_type: FeatType,
    /// Whether the interference mask is shown.
    pub mask_type: MaskType,
    /// The answer the participant should give.
    pub correct_response: CorrectResponse,
    /// How the trial is probed.
    pub response_type: ResponseType,
    /// Cue category drawn for this trial; assignment may redraw it.
    pub cue: Cue,
}

/// Expands the factorial design into one template per trial.
///
/// The base design crosses feat_type with mask_type, gains weighted
/// correct_response and response_type columns, and is replicated
/// `config.reps` times. Each row then draws a cue uniformly from the
/// table's categories, with replacement.
pub fn build_templates(
    config: &SequenceConfig,
    table: &PropositionTable,
    rng: &mut RngHandle,
) -> Result<Vec<TrialTemplate>, DtvError> {
    let mut factors = FactorMap::new();
    factors.insert(
        "feat_type".to_string(),
        vec!["visual".to_string(), "nonvisual".to_string()],
    );
    factors.insert(
        "mask_type".to_string(),
        vec!["mask".to_string(), "nomask".to_string()],
    );
    let rows = counterbalance(&factors)?;
    let rows = expand(
        &rows,
        "correct_response",
        ["yes", "no"],
        config.ratio_yes_correct_responses,
        rng,
    )?;
    let rows = expand(
        &rows,
        "response_type",
        ["prompt", "pic"],
        config.ratio_prompt_response_type,
        rng,
    )?;
    let rows = extend(&rows, config.reps)?;

    let mut templates = Vec::with_capacity(rows.len());
    for row in &rows {
        let Some(cue) = table.categories().choose(rng) else {
            return Err(DtvError::Stimuli(ErrorInfo::new(
                "no-categories",
                "the proposition table has no cue categories",
            )));
        };
        templates.push(TrialTemplate {
            feat_type: field(row, "feat_type")?.parse()?,
            mask_type: field(row, "mask_type")?.parse()?,
            correct_response: field(row, "correct_response")?.parse()?,
            response_type: field(row, "response_type")?.parse()?,
            cue: cue.clone(),
        });
    }
    Ok(templates)
}

fn field<'a>(row: &'a DesignRow, name: &str) -> Result<&'a str, DtvError> {
    row.get(name).map(String::as_str).ok_or_else(|| {
        DtvError::Design(
            ErrorInfo::new("missing-column", "a design row lacks a required column")
                .with_context("column", name),
        )
    })
}
