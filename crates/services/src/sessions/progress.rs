/// Where a quiz session stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizPhase {
    /// Loaded with zero questions; nothing to answer.
    NoQuestions,
    /// Current question awaits a submitted answer.
    Answering,
    /// Current question was submitted and can be graded.
    Graded,
    /// Last question graded and advanced past. Terminal.
    Finished,
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Correct,
    Incorrect,
}

impl Grade {
    #[must_use]
    pub fn is_correct(self) -> bool {
        matches!(self, Grade::Correct)
    }
}

/// How an option should be displayed for the current question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionState {
    Idle,
    Selected,
    Correct,
    Incorrect,
}

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub total: usize,
    pub cursor: usize,
    pub answered: usize,
    pub correct: usize,
    pub phase: QuizPhase,
}

/// Final tally once a quiz is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizSummary {
    pub total: usize,
    pub correct: usize,
}

impl QuizSummary {
    #[must_use]
    pub fn incorrect(&self) -> usize {
        self.total.saturating_sub(self.correct)
    }
}
