//! Accumulated answers for a wizard session.

use std::collections::{BTreeMap, BTreeSet};

/// A single recorded answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerValue {
    /// Free-form text or a single chosen option.
    Text(String),
    /// Multi-choice selections.
    Choices(BTreeSet<String>),
    /// Boolean answers (consent toggles).
    Flag(bool),
    /// Sentinel recorded when an optional step is skipped.
    Skipped,
}

impl AnswerValue {
    pub fn text(value: impl Into<String>) -> Self {
        AnswerValue::Text(value.into())
    }

    /// Whether the answer counts toward required-field completeness.
    pub fn is_filled(&self) -> bool {
        match self {
            AnswerValue::Text(value) => !value.trim().is_empty(),
            AnswerValue::Choices(set) => !set.is_empty(),
            AnswerValue::Flag(_) => true,
            AnswerValue::Skipped => false,
        }
    }

    pub fn as_choices(&self) -> Option<&BTreeSet<String>> {
        match self {
            AnswerValue::Choices(set) => Some(set),
            _ => None,
        }
    }

    /// Presentation text used for transcripts and review summaries.
    pub fn display_text(&self) -> String {
        match self {
            AnswerValue::Text(value) => value.clone(),
            AnswerValue::Choices(set) => set.iter().cloned().collect::<Vec<_>>().join(", "),
            AnswerValue::Flag(true) => "yes".into(),
            AnswerValue::Flag(false) => "no".into(),
            AnswerValue::Skipped => "(skipped)".into(),
        }
    }
}

/// Mapping from field id to the recorded answer. Holds entries only for
/// steps at or before the current index that were not cleared.
pub type AnswerMap = BTreeMap<String, AnswerValue>;
