mod playlist;
mod progress;
mod quiz;

// Public API of the session subsystem.
pub use crate::error::{PlaylistError, QuizError};
pub use playlist::PlaylistSession;
pub use progress::{Grade, OptionState, QuizPhase, QuizProgress, QuizSummary};
pub use quiz::QuizSession;
