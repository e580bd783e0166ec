//! Seams to the external lesson and quiz generation services.

mod http;
pub mod wire;

use async_trait::async_trait;

use lesson_core::model::{LessonRequest, QuizQuestion, VideoDescriptor, VideoId};

use crate::error::GenerationError;

pub use http::{GenerationConfig, HttpGenerationClient};

/// Produces the ordered video list for a validated lesson request.
#[async_trait]
pub trait LessonGenerator: Send + Sync {
    /// Generate the videos for a lesson.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if the service call fails.
    async fn generate_lesson(
        &self,
        request: &LessonRequest,
    ) -> Result<Vec<VideoDescriptor>, GenerationError>;
}

/// Produces multiple-choice questions about one video.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// Generate the questions for a video.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError` if the service call fails or a question
    /// fails integrity checks.
    async fn generate_quiz(&self, video: &VideoId) -> Result<Vec<QuizQuestion>, GenerationError>;
}
