//! Structured error types shared across DTV crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`DtvError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (trial indices, factor levels, paths).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " {{")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "}}")?;
        }
        Ok(())
    }
}

/// Canonical error type for the DTV trial generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum DtvError {
    /// Invalid ratios, sizes, or other run configuration problems.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Malformed or inconsistent proposition table contents.
    #[error("stimuli error: {0}")]
    Stimuli(ErrorInfo),
    /// Design primitive contract violations (factorials, blocks, shuffles).
    #[error("design error: {0}")]
    Design(ErrorInfo),
    /// Content assignment failures, including pool exhaustion.
    #[error("content error: {0}")]
    Content(ErrorInfo),
    /// Data file and presenter failures during a session.
    #[error("session error: {0}")]
    Session(ErrorInfo),
    /// Serialization and schema errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl DtvError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            DtvError::Config(info)
            | DtvError::Stimuli(info)
            | DtvError::Design(info)
            | DtvError::Content(info)
            | DtvError::Session(info)
            | DtvError::Serde(info) => info,
        }
    }

    /// Adds a context entry to the payload, preserving the error family.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            DtvError::Config(info) => DtvError::Config(info.with_context(key, value)),
            DtvError::Stimuli(info) => DtvError::Stimuli(info.with_context(key, value)),
            DtvError::Design(info) => DtvError::Design(info.with_context(key, value)),
            DtvError::Content(info) => DtvError::Content(info.with_context(key, value)),
            DtvError::Session(info) => DtvError::Session(info.with_context(key, value)),
            DtvError::Serde(info) => DtvError::Serde(info.with_context(key, value)),
        }
    }
}
