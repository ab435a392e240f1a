use std::collections::BTreeSet;
use std::path::Path;

use csv::ReaderBuilder;
use dtv_core::errors::{DtvError, ErrorInfo};
use dtv_core::rng::RngHandle;
use dtv_core::types::{CorrectResponse, Cue, FeatType, Proposition, PropositionId};
use rand::seq::SliceRandom;
use serde::Deserialize;

/// One record of the proposition CSV before validation.
#[derive(Debug, Deserialize)]
struct PropositionRow {
    proposition_id: String,
    cue: String,
    feat_type: String,
    correct_response: String,
    question: String,
}

impl PropositionRow {
    fn into_proposition(self, record: usize) -> Result<Proposition, DtvError> {
        let feat_type: FeatType = self
            .feat_type
            .parse()
            .map_err(|err: DtvError| err.with_context("record", record.to_string()))?;
        let correct_response: CorrectResponse = self
            .correct_response
            .parse()
            .map_err(|err: DtvError| err.with_context("record", record.to_string()))?;
        Ok(Proposition {
            id: PropositionId::new(self.proposition_id),
            cue: Cue::new(self.cue),
            feat_type,
            correct_response,
            question_slug: question_slug(&self.question),
            question: self.question,
        })
    }
}

/// Lowercases a question and joins its alphanumeric runs with hyphens.
///
/// "Is it used in circuses?" becomes "is-it-used-in-circuses". The slug
/// names response recordings on disk, so it never carries punctuation or
/// leading and trailing hyphens.
pub fn question_slug(question: &str) -> String {
    let mut slug = String::with_capacity(question.len());
    let mut gap = false;
    for ch in question.chars() {
        if ch.is_alphanumeric() {
            if gap && !slug.is_empty() {
                slug.push('-');
            }
            gap = false;
            for lower in ch.to_lowercase() {
                slug.push(lower);
            }
        } else {
            gap = true;
        }
    }
    slug
}

/// The validated set of propositions available to one sequence.
#[derive(Debug, Clone)]
pub struct PropositionTable {
    propositions: Vec<Proposition>,
    categories: Vec<Cue>,
}

impl PropositionTable {
    /// Validates a set of propositions and records its cue categories.
    ///
    /// Categories keep the order in which their cue first appears in the
    /// table, so two loads of the same file agree on category indices.
    pub fn new(propositions: Vec<Proposition>) -> Result<Self, DtvError> {
        if propositions.is_empty() {
            return Err(DtvError::Stimuli(ErrorInfo::new(
                "empty-table",
                "the proposition table holds no rows",
            )));
        }
        let mut seen = BTreeSet::new();
        let mut categories: Vec<Cue> = Vec::new();
        for proposition in &propositions {
            if !seen.insert(proposition.id.clone()) {
                return Err(DtvError::Stimuli(
                    ErrorInfo::new("duplicate-id", "proposition ids must be unique")
                        .with_context("proposition_id", proposition.id.to_string()),
                ));
            }
            if proposition.question_slug.is_empty() {
                return Err(DtvError::Stimuli(
                    ErrorInfo::new("empty-question", "a proposition needs a readable question")
                        .with_context("proposition_id", proposition.id.to_string()),
                ));
            }
            if !categories.contains(&proposition.cue) {
                categories.push(proposition.cue.clone());
            }
        }
        Ok(Self {
            propositions,
            categories,
        })
    }

    /// Reads and validates a proposition table from a CSV file.
    pub fn load(path: &Path) -> Result<Self, DtvError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|err| {
                DtvError::Stimuli(
                    ErrorInfo::new("table-open", err.to_string())
                        .with_context("path", path.display().to_string()),
                )
            })?;
        let mut propositions = Vec::new();
        for (record, result) in reader.deserialize::<PropositionRow>().enumerate() {
            let row = result.map_err(|err| {
                DtvError::Stimuli(
                    ErrorInfo::new("table-parse", err.to_string())
                        .with_context("record", record.to_string()),
                )
            })?;
            propositions.push(row.into_proposition(record)?);
        }
        Self::new(propositions)
    }

    /// All propositions in table order.
    pub fn propositions(&self) -> &[Proposition] {
        &self.propositions
    }

    /// Distinct cues in order of first appearance.
    pub fn categories(&self) -> &[Cue] {
        &self.categories
    }

    /// Number of propositions in the table.
    pub fn len(&self) -> usize {
        self.propositions.len()
    }

    /// Whether the table holds no propositions.
    pub fn is_empty(&self) -> bool {
        self.propositions.is_empty()
    }

    /// A consumable copy of the table for content assignment.
    pub fn pool(&self) -> PropositionPool {
        PropositionPool {
            remaining: self.propositions.clone(),
        }
    }
}

/// Propositions not yet bound to a trial.
///
/// Assignment removes each drawn proposition, so no two trials in a
/// sequence share content.
#[derive(Debug, Clone)]
pub struct PropositionPool {
    remaining: Vec<Proposition>,
}

fn matches(proposition: &Proposition, cue: &Cue, feat: FeatType, correct: CorrectResponse) -> bool {
    proposition.cue == *cue
        && proposition.feat_type == feat
        && proposition.correct_response == correct
}

impl PropositionPool {
    /// Number of propositions still available.
    pub fn remaining(&self) -> usize {
        self.remaining.len()
    }

    /// Whether any proposition is left for this cue and cell.
    pub fn has_matching(&self, cue: &Cue, feat: FeatType, correct: CorrectResponse) -> bool {
        self.remaining
            .iter()
            .any(|proposition| matches(proposition, cue, feat, correct))
    }

    /// Cues from `categories` that still have content for this cell.
    pub fn cues_with_content(
        &self,
        categories: &[Cue],
        feat: FeatType,
        correct: CorrectResponse,
    ) -> Vec<Cue> {
        categories
            .iter()
            .filter(|cue| self.has_matching(cue, feat, correct))
            .cloned()
            .collect()
    }

    /// Removes and returns a uniformly drawn matching proposition.
    pub fn take_matching(
        &mut self,
        cue: &Cue,
        feat: FeatType,
        correct: CorrectResponse,
        rng: &mut RngHandle,
    ) -> Option<Proposition> {
        let matching: Vec<usize> = self
            .remaining
            .iter()
            .enumerate()
            .filter(|(_, proposition)| matches(proposition, cue, feat, correct))
            .map(|(idx, _)| idx)
            .collect();
        let &idx = matching.choose(rng)?;
        Some(self.remaining.remove(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::question_slug;

    #[test]
    fn slug_drops_punctuation() {
        assert_eq!(question_slug("Is it used in circuses?"), "is-it-used-in-circuses");
    }

    #[test]
    fn slug_collapses_runs() {
        assert_eq!(question_slug("Does it fly?  (at night)"), "does-it-fly-at-night");
    }

    #[test]
    fn slug_has_no_edge_hyphens() {
        assert_eq!(question_slug("...really??"), "really");
        assert_eq!(question_slug("?!"), "");
    }
}
