mod orchestrator;
mod ticket;

pub use crate::error::LessonError;
pub use orchestrator::LessonOrchestrator;
pub use ticket::{LessonTicket, OrchestratorStatus, QuizTicket, RequestToken, ResumeOutcome};
