use std::fmt;

use lesson_core::model::{OptionLabel, QuizQuestion};

use super::progress::{Grade, OptionState, QuizPhase, QuizProgress, QuizSummary};
use crate::error::QuizError;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// Multiple-choice quiz over the questions generated for one video.
///
/// Each question moves from answering to graded on `submit`. `next_question`
/// either moves to the next question in the answering phase or, on the last
/// question, finishes the quiz. Unlike the playlist the quiz never wraps; a
/// finished session stays finished until `load_questions` is called again.
#[derive(Clone, Default)]
pub struct QuizSession {
    questions: Vec<QuizQuestion>,
    cursor: usize,
    selected: Option<OptionLabel>,
    submitted: bool,
    finished: bool,
    grades: Vec<Grade>,
}

impl QuizSession {
    #[must_use]
    pub fn new(questions: Vec<QuizQuestion>) -> Self {
        let mut session = Self::default();
        session.load_questions(questions);
        session
    }

    /// Replace all questions and start over at the first one.
    pub fn load_questions(&mut self, questions: Vec<QuizQuestion>) {
        self.questions = questions;
        self.cursor = 0;
        self.selected = None;
        self.submitted = false;
        self.finished = false;
        self.grades.clear();
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&QuizQuestion> {
        self.questions.get(self.cursor)
    }

    #[must_use]
    pub fn selected(&self) -> Option<&OptionLabel> {
        self.selected.as_ref()
    }

    #[must_use]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[must_use]
    pub fn phase(&self) -> QuizPhase {
        if self.questions.is_empty() {
            QuizPhase::NoQuestions
        } else if self.finished {
            QuizPhase::Finished
        } else if self.submitted {
            QuizPhase::Graded
        } else {
            QuizPhase::Answering
        }
    }

    /// True when another question follows the current one.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.cursor + 1 < self.questions.len()
    }

    /// Choose an option for the current question.
    ///
    /// After `submit` the choice is locked and this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty quiz and
    /// `QuizError::UnknownOption` if `label` is not an option of the current question.
    pub fn select_option(&mut self, label: &OptionLabel) -> Result<(), QuizError> {
        let question = self.current_question().ok_or(QuizError::NoQuestions)?;
        if self.submitted {
            return Ok(());
        }
        if !question.has_option(label) {
            return Err(QuizError::UnknownOption(label.to_string()));
        }
        self.selected = Some(label.clone());
        Ok(())
    }

    /// Lock in the selected option and grade it.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty quiz,
    /// `QuizError::AlreadySubmitted` if the current question was already submitted,
    /// and `QuizError::IncompleteAnswer` if no option is selected.
    pub fn submit(&mut self) -> Result<Grade, QuizError> {
        let question = self.current_question().ok_or(QuizError::NoQuestions)?;
        if self.submitted {
            return Err(QuizError::AlreadySubmitted);
        }
        let selected = self.selected.as_ref().ok_or(QuizError::IncompleteAnswer)?;
        let grade = grade_of(question, selected);

        self.submitted = true;
        self.grades.push(grade);
        Ok(grade)
    }

    /// Grade of the current question, derived from the question and the selection.
    ///
    /// `None` until the current question is submitted.
    #[must_use]
    pub fn grade(&self) -> Option<Grade> {
        if !self.submitted {
            return None;
        }
        let question = self.current_question()?;
        let selected = self.selected.as_ref()?;
        Some(grade_of(question, selected))
    }

    /// Move past a graded question.
    ///
    /// On the last question this finishes the quiz; once finished, further
    /// calls are no-ops returning `QuizPhase::Finished`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoQuestions` for an empty quiz and
    /// `QuizError::NotGraded` if the current question has not been submitted.
    pub fn next_question(&mut self) -> Result<QuizPhase, QuizError> {
        if self.questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        if self.finished {
            return Ok(QuizPhase::Finished);
        }
        if !self.submitted {
            return Err(QuizError::NotGraded);
        }

        if self.has_next() {
            self.cursor += 1;
            self.selected = None;
            self.submitted = false;
        } else {
            self.finished = true;
        }
        Ok(self.phase())
    }

    /// Display state of `label` for the current question.
    #[must_use]
    pub fn option_state(&self, label: &OptionLabel) -> OptionState {
        let Some(question) = self.current_question() else {
            return OptionState::Idle;
        };
        let is_selected = self.selected.as_ref() == Some(label);

        if !self.submitted {
            return if is_selected {
                OptionState::Selected
            } else {
                OptionState::Idle
            };
        }

        if question.is_correct(label) {
            OptionState::Correct
        } else if is_selected {
            OptionState::Incorrect
        } else {
            OptionState::Idle
        }
    }

    /// Returns a summary of the current quiz progress.
    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            total: self.questions.len(),
            cursor: self.cursor,
            answered: self.grades.len(),
            correct: self.correct_count(),
            phase: self.phase(),
        }
    }

    /// Final tally, available once the quiz is finished.
    #[must_use]
    pub fn summary(&self) -> Option<QuizSummary> {
        self.finished.then(|| QuizSummary {
            total: self.questions.len(),
            correct: self.correct_count(),
        })
    }

    fn correct_count(&self) -> usize {
        self.grades.iter().filter(|grade| grade.is_correct()).count()
    }
}

fn grade_of(question: &QuizQuestion, selected: &OptionLabel) -> Grade {
    if question.is_correct(selected) {
        Grade::Correct
    } else {
        Grade::Incorrect
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("questions_len", &self.questions.len())
            .field("cursor", &self.cursor)
            .field("selected", &self.selected)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
