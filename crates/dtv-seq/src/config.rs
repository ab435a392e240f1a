use std::fs;
use std::path::Path;

use dtv_core::errors::{DtvError, ErrorInfo};
use serde::{Deserialize, Serialize};

fn default_yes_ratio() -> f64 {
    0.75
}

fn default_prompt_ratio() -> f64 {
    0.75
}

fn default_reps() -> usize {
    4
}

fn default_practice_trials() -> usize {
    8
}

fn default_max_block_size() -> usize {
    50
}

fn default_max_wait_ms() -> f64 {
    3000.0
}

/// Parameters governing one generated trial sequence.
///
/// Every field has a default matching the standard session, so a config
/// file only needs to name the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SequenceConfig {
    /// Share of trials whose correct response is yes.
    #[serde(default = "default_yes_ratio")]
    pub ratio_yes_correct_responses: f64,
    /// Share of trials probed with the spoken prompt rather than a picture.
    #[serde(default = "default_prompt_ratio")]
    pub ratio_prompt_response_type: f64,
    /// Number of copies of the expanded factorial design.
    #[serde(default = "default_reps")]
    pub reps: usize,
    /// Number of trials carved off the front as practice.
    #[serde(default = "default_practice_trials")]
    pub practice_trials: usize,
    /// Upper bound on the size of a test block.
    #[serde(default = "default_max_block_size")]
    pub max_block_size: usize,
    /// Response collection settings used when the sequence is run.
    #[serde(default)]
    pub session: SessionConfig,
}

/// Timing settings for response collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Response deadline in milliseconds; slower answers are timeouts.
    #[serde(default = "default_max_wait_ms")]
    pub max_wait_ms: f64,
}

impl Default for SequenceConfig {
    fn default() -> Self {
        Self {
            ratio_yes_correct_responses: default_yes_ratio(),
            ratio_prompt_response_type: default_prompt_ratio(),
            reps: default_reps(),
            practice_trials: default_practice_trials(),
            max_block_size: default_max_block_size(),
            session: SessionConfig::default(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_wait_ms: default_max_wait_ms(),
        }
    }
}

impl SequenceConfig {
    /// Reads a config from a YAML file.
    pub fn load(path: &Path) -> Result<Self, DtvError> {
        let contents = fs::read_to_string(path).map_err(|err| {
            DtvError::Config(
                ErrorInfo::new("config-read", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        let config: Self = serde_yaml::from_str(&contents).map_err(|err| {
            DtvError::Config(
                ErrorInfo::new("config-parse", err.to_string())
                    .with_context("path", path.display().to_string()),
            )
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects parameter values no sequence can be generated from.
    pub fn validate(&self) -> Result<(), DtvError> {
        let ratios = [
            ("ratio_yes_correct_responses", self.ratio_yes_correct_responses),
            ("ratio_prompt_response_type", self.ratio_prompt_response_type),
        ];
        for (name, ratio) in ratios {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(DtvError::Config(
                    ErrorInfo::new("bad-ratio", "ratio must lie in [0, 1]")
                        .with_context("parameter", name)
                        .with_context("ratio", ratio.to_string()),
                ));
            }
        }
        if self.reps == 0 {
            return Err(DtvError::Config(ErrorInfo::new(
                "zero-reps",
                "at least one repetition of the design is required",
            )));
        }
        if self.max_block_size == 0 {
            return Err(DtvError::Config(ErrorInfo::new(
                "zero-block-size",
                "test blocks must hold at least one trial",
            )));
        }
        if self.session.max_wait_ms <= 0.0 {
            return Err(DtvError::Config(
                ErrorInfo::new("bad-max-wait", "response deadline must be positive")
                    .with_context("max_wait_ms", self.session.max_wait_ms.to_string()),
            ));
        }
        Ok(())
    }
}
