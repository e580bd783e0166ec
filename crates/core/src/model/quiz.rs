use std::collections::HashSet;

use serde::Serialize;
use thiserror::Error;

use crate::model::ids::OptionLabel;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// Data-integrity faults in a received question.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question has no options")]
    NoOptions,

    #[error("option or answer label is missing")]
    MissingLabel,

    #[error("option label {label} appears more than once")]
    DuplicateLabel { label: OptionLabel },

    #[error("correct label {label} matches no option")]
    NoCorrectOption { label: OptionLabel },

    #[error("correct label {label} matches more than one option")]
    AmbiguousCorrectOption { label: OptionLabel },
}

//
// ─── OPTION ────────────────────────────────────────────────────────────────────
//

/// One labelled answer choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizOption {
    label: OptionLabel,
    text: String,
}

impl QuizOption {
    #[must_use]
    pub fn new(label: OptionLabel, text: impl Into<String>) -> Self {
        Self {
            label,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn label(&self) -> &OptionLabel {
        &self.label
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestion {
    prompt: String,
    options: Vec<QuizOption>,
    correct_label: OptionLabel,
}

impl QuizQuestion {
    /// Build a question, checking option integrity.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::NoOptions` for an empty option set,
    /// `QuestionError::AmbiguousCorrectOption` if the correct label is repeated,
    /// `QuestionError::DuplicateLabel` if any other label is repeated, and
    /// `QuestionError::NoCorrectOption` if no option carries the correct label.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<QuizOption>,
        correct_label: OptionLabel,
    ) -> Result<Self, QuestionError> {
        if options.is_empty() {
            return Err(QuestionError::NoOptions);
        }

        let matches = options
            .iter()
            .filter(|option| option.label == correct_label)
            .count();
        match matches {
            0 => {
                return Err(QuestionError::NoCorrectOption {
                    label: correct_label,
                });
            }
            1 => {}
            _ => {
                return Err(QuestionError::AmbiguousCorrectOption {
                    label: correct_label,
                });
            }
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(&option.label) {
                return Err(QuestionError::DuplicateLabel {
                    label: option.label.clone(),
                });
            }
        }

        Ok(Self {
            prompt: prompt.into(),
            options,
            correct_label,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[QuizOption] {
        &self.options
    }

    #[must_use]
    pub fn correct_label(&self) -> &OptionLabel {
        &self.correct_label
    }

    #[must_use]
    pub fn option(&self, label: &OptionLabel) -> Option<&QuizOption> {
        self.options.iter().find(|option| &option.label == label)
    }

    #[must_use]
    pub fn has_option(&self, label: &OptionLabel) -> bool {
        self.option(label).is_some()
    }

    /// Grade a selection. Pure; never mutates.
    #[must_use]
    pub fn is_correct(&self, selected: &OptionLabel) -> bool {
        &self.correct_label == selected
    }
}
