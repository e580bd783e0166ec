#![forbid(unsafe_code)]

pub mod error;
pub mod generation;
pub mod lesson;
pub mod sessions;

pub use error::{GenerationError, LessonError, PlaylistError, QuizError};
pub use generation::{GenerationConfig, HttpGenerationClient, LessonGenerator, QuizGenerator};
pub use lesson::{
    LessonOrchestrator, LessonTicket, OrchestratorStatus, QuizTicket, RequestToken, ResumeOutcome,
};
pub use sessions::{
    Grade, OptionState, PlaylistSession, QuizPhase, QuizProgress, QuizSession, QuizSummary,
};
