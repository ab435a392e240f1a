use dtv_core::errors::{DtvError, ErrorInfo};
use dtv_core::rng::RngHandle;
use dtv_core::types::{BlockType, Trial};
use dtv_design::{add_block, smart_shuffle};

use crate::assign::assign_content;
use crate::config::SequenceConfig;
use crate::distractor::pick_distractor;
use crate::practice::carve_practice;
use crate::stimuli::PropositionTable;
use crate::templates::build_templates;

/// A complete generated sequence, practice first, ready to run or export.
#[derive(Debug, Clone, PartialEq)]
pub struct TrialSequence {
    trials: Vec<Trial>,
    seed: u64,
    practice_count: usize,
    test_block_count: u32,
}

impl TrialSequence {
    fn new(trials: Vec<Trial>, seed: u64) -> Self {
        let practice_count = trials.iter().filter(|trial| trial.is_practice()).count();
        let test_block_count = trials.iter().map(|trial| trial.block).max().unwrap_or(0);
        Self {
            trials,
            seed,
            practice_count,
            test_block_count,
        }
    }

    /// The master seed this sequence was generated from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// All trials in presentation order.
    pub fn trials(&self) -> &[Trial] {
        &self.trials
    }

    /// Total number of trials, practice included.
    pub fn len(&self) -> usize {
        self.trials.len()
    }

    /// Whether the sequence holds no trials.
    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    /// Number of practice trials at the head of the sequence.
    pub fn practice_len(&self) -> usize {
        self.practice_count
    }

    /// Number of numbered test blocks.
    pub fn test_block_count(&self) -> u32 {
        self.test_block_count
    }

    /// Iterates over maximal runs of trials sharing a block id.
    ///
    /// Runs cover the whole sequence in order, the final block included.
    pub fn iter_blocks(&self) -> BlockRuns<'_> {
        BlockRuns {
            trials: &self.trials,
            start: 0,
        }
    }

    /// Consumes the sequence, returning its trials.
    pub fn into_trials(self) -> Vec<Trial> {
        self.trials
    }
}

/// Iterator over contiguous same-block runs of a sequence.
#[derive(Debug)]
pub struct BlockRuns<'a> {
    trials: &'a [Trial],
    start: usize,
}

impl<'a> Iterator for BlockRuns<'a> {
    type Item = &'a [Trial];

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.trials.get(self.start)?;
        let mut end = self.start + 1;
        while self
            .trials
            .get(end)
            .is_some_and(|trial| trial.block == first.block)
        {
            end += 1;
        }
        let run = &self.trials[self.start..end];
        self.start = end;
        Some(run)
    }
}

/// Generates the full trial sequence for one seed.
///
/// The pipeline expands the factorial design, binds a distinct
/// proposition to every trial, resolves probe pictures, carves off
/// practice, numbers cue-balanced test blocks, shuffles each block away
/// from cue repeats, and numbers the resulting order. Equal inputs give
/// byte-equal output.
pub fn generate(
    config: &SequenceConfig,
    table: &PropositionTable,
    seed: u64,
) -> Result<TrialSequence, DtvError> {
    config.validate()?;
    if table.categories().len() < 2 {
        return Err(DtvError::Config(
            ErrorInfo::new(
                "too-few-categories",
                "distractor selection needs at least two cue categories",
            )
            .with_context("categories", table.categories().len().to_string()),
        ));
    }

    let mut rng = RngHandle::from_seed(seed);
    let templates = build_templates(config, table, &mut rng)?;
    let assigned = assign_content(templates, table.pool(), table.categories(), &mut rng)?;

    let mut trials = Vec::with_capacity(assigned.len());
    for item in assigned {
        let pic = pick_distractor(
            item.template.response_type,
            item.template.correct_response,
            &item.template.cue,
            table.categories(),
            &mut rng,
        )?;
        trials.push(Trial {
            block: 0,
            block_type: BlockType::Test,
            trial: 0,
            proposition_id: item.proposition.id,
            question_slug: item.proposition.question_slug,
            cue: item.template.cue,
            mask_type: item.template.mask_type,
            response_type: item.template.response_type,
            pic,
            correct_response: item.template.correct_response,
            outcome: None,
        });
    }

    let (practice, mut rest) = carve_practice(trials, config.practice_trials, &mut rng)?;
    let block_ids = add_block(
        &rest,
        config.max_block_size,
        1,
        |trial: &Trial| trial.cue.clone(),
        &mut rng,
    )?;
    for (trial, id) in rest.iter_mut().zip(block_ids) {
        trial.block = id;
    }
    let rest = smart_shuffle(
        rest,
        |trial| trial.cue.clone(),
        |trial| trial.block,
        &mut rng,
    );

    let mut ordered = practice;
    ordered.extend(rest);
    for (idx, trial) in ordered.iter_mut().enumerate() {
        trial.trial = idx as u32;
    }

    Ok(TrialSequence::new(ordered, seed))
}
