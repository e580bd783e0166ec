//! Shared error types for the services crate.

use thiserror::Error;

use lesson_core::model::{LessonRequestError, QuestionError, VideoError, VideoId};

/// Errors emitted by `PlaylistSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PlaylistError {
    #[error("video index {index} is out of range for a playlist of {len}")]
    OutOfRange { index: usize, len: usize },
    #[error("video {0} is not in the playlist")]
    UnknownVideo(VideoId),
}

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    NoQuestions,
    #[error("option {0} does not belong to the current question")]
    UnknownOption(String),
    #[error("no option selected")]
    IncompleteAnswer,
    #[error("current question already submitted")]
    AlreadySubmitted,
    #[error("current question has not been graded yet")]
    NotGraded,
}

/// Failures reported by a generation service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error(transparent)]
    Integrity(#[from] QuestionError),
}

/// Errors emitted by `LessonOrchestrator`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LessonError {
    #[error(transparent)]
    Validation(#[from] LessonRequestError),
    #[error("a lesson request is already in flight")]
    LessonInFlight,
    #[error("a quiz request is already in flight")]
    QuizInFlight,
    #[error("no lesson has been created yet")]
    NoLesson,
    #[error("playlist has no current video")]
    NoCurrentVideo,
    #[error("no quiz is active")]
    NoQuiz,
    #[error(transparent)]
    InvalidVideoReference(#[from] VideoError),
    #[error(transparent)]
    DataIntegrity(#[from] QuestionError),
    #[error("remote generation failed: {0}")]
    Remote(GenerationError),
    #[error(transparent)]
    Playlist(#[from] PlaylistError),
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

impl From<GenerationError> for LessonError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::Integrity(fault) => LessonError::DataIntegrity(fault),
            other => LessonError::Remote(other),
        }
    }
}
