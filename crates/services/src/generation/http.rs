use std::env;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use lesson_core::model::{LessonRequest, QuizQuestion, VideoDescriptor, VideoId};

use super::wire::{LessonPayload, QuestionRecord, QuizPayload, VideoRecord};
use super::{LessonGenerator, QuizGenerator, wire};
use crate::error::GenerationError;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_LESSON_PATH: &str = "/process";
const DEFAULT_QUIZ_PATH: &str = "/quiz";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerationConfig {
    pub base_url: String,
    pub lesson_path: String,
    pub quiz_path: String,
}

impl GenerationConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            lesson_path: DEFAULT_LESSON_PATH.into(),
            quiz_path: DEFAULT_QUIZ_PATH.into(),
        }
    }

    /// Read `LESSON_API_BASE_URL`, `LESSON_API_LESSON_PATH` and
    /// `LESSON_API_QUIZ_PATH`, falling back to the local defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let non_blank = |key: &str| env::var(key).ok().filter(|value| !value.trim().is_empty());
        Self {
            base_url: non_blank("LESSON_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            lesson_path: non_blank("LESSON_API_LESSON_PATH")
                .unwrap_or_else(|| DEFAULT_LESSON_PATH.into()),
            quiz_path: non_blank("LESSON_API_QUIZ_PATH").unwrap_or_else(|| DEFAULT_QUIZ_PATH.into()),
        }
    }

    #[must_use]
    pub fn lesson_url(&self) -> String {
        join_url(&self.base_url, &self.lesson_path)
    }

    #[must_use]
    pub fn quiz_url(&self) -> String {
        join_url(&self.base_url, &self.quiz_path)
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// JSON-over-HTTP client for both generation services.
#[derive(Clone)]
pub struct HttpGenerationClient {
    client: Client,
    config: GenerationConfig,
}

impl HttpGenerationClient {
    #[must_use]
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }
}

#[async_trait]
impl LessonGenerator for HttpGenerationClient {
    async fn generate_lesson(
        &self,
        request: &LessonRequest,
    ) -> Result<Vec<VideoDescriptor>, GenerationError> {
        let url = self.config.lesson_url();
        debug!(%url, topic = request.topic(), "requesting lesson");

        let response = self
            .client
            .post(url)
            .json(&LessonPayload::from(request))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let records: Vec<VideoRecord> = response.json().await?;
        Ok(wire::decode_videos(records))
    }
}

#[async_trait]
impl QuizGenerator for HttpGenerationClient {
    async fn generate_quiz(&self, video: &VideoId) -> Result<Vec<QuizQuestion>, GenerationError> {
        let url = self.config.quiz_url();
        debug!(%url, video = %video, "requesting quiz");

        let response = self
            .client
            .post(url)
            .json(&QuizPayload::from(video))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let records: Vec<QuestionRecord> = response.json().await?;
        Ok(wire::decode_questions(records)?)
    }
}
