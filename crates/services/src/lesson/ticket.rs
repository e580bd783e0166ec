use std::fmt;

use lesson_core::model::{LessonRequest, VideoId};

/// Identifies one outgoing generation request.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestToken(u64);

impl RequestToken {
    pub(crate) fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Debug for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RequestToken({})", self.0)
    }
}

impl fmt::Display for RequestToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An issued lesson request awaiting its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonTicket {
    pub token: RequestToken,
    pub request: LessonRequest,
}

/// An issued quiz request awaiting its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizTicket {
    pub token: RequestToken,
    pub video: VideoId,
}

/// What happened to a response when it was handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeOutcome {
    /// The response replaced the session state.
    Applied,
    /// The context that issued the request is gone; the response was dropped.
    Stale,
}

/// Loading and failure flags for presentation layers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrchestratorStatus {
    pub lesson_loading: bool,
    pub quiz_loading: bool,
    pub lesson_error: Option<String>,
    pub quiz_error: Option<String>,
}
