//! Request and response shapes exchanged with the generation services.

use serde::{Deserialize, Serialize};

use lesson_core::model::{
    LessonRequest, OptionLabel, QuestionError, QuizOption, QuizQuestion, VideoDescriptor, VideoId,
};

/// Body of a lesson generation request. Every field is sent as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonPayload {
    pub study_topic: String,
    /// Picker index of the duration, or empty when unset.
    pub duration: String,
    pub slider_value: String,
    pub random_theme: String,
}

impl From<&LessonRequest> for LessonPayload {
    fn from(request: &LessonRequest) -> Self {
        Self {
            study_topic: request.topic().to_string(),
            duration: request
                .duration()
                .map(|duration| duration.index().to_string())
                .unwrap_or_default(),
            slider_value: request.randomness().to_string(),
            random_theme: request.theme().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoRecord {
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub is_fun: bool,
}

impl From<VideoRecord> for VideoDescriptor {
    fn from(record: VideoRecord) -> Self {
        VideoDescriptor::new(record.url, record.title, record.channel, record.is_fun)
    }
}

/// Body of a quiz generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizPayload {
    pub youtube_id: String,
}

impl From<&VideoId> for QuizPayload {
    fn from(id: &VideoId) -> Self {
        Self {
            youtube_id: id.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub options: Vec<OptionRecord>,
    pub answer: String,
}

/// An option arrives either as `["A", "Paris"]` or as `"A) Paris"`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OptionRecord {
    Pair(String, String),
    Text(String),
}

impl OptionRecord {
    /// Split into a label and display text.
    ///
    /// For the single-string form the first character is the label and any
    /// `)`, `.`, `:` or whitespace after it is dropped from the text.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::MissingLabel` if no label can be read.
    pub fn into_option(self) -> Result<QuizOption, QuestionError> {
        match self {
            OptionRecord::Pair(label, text) => {
                let label = OptionLabel::new(label).ok_or(QuestionError::MissingLabel)?;
                Ok(QuizOption::new(label, text.trim()))
            }
            OptionRecord::Text(raw) => {
                let raw = raw.trim();
                let mut chars = raw.chars();
                let first = chars.next().ok_or(QuestionError::MissingLabel)?;
                let label =
                    OptionLabel::new(first.to_string()).ok_or(QuestionError::MissingLabel)?;
                let text = chars
                    .as_str()
                    .trim_start_matches(|c: char| matches!(c, ')' | '.' | ':') || c.is_whitespace());
                Ok(QuizOption::new(label, text))
            }
        }
    }
}

impl QuestionRecord {
    /// Decode into a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` when labels are missing or the options fail
    /// integrity checks.
    pub fn into_question(self) -> Result<QuizQuestion, QuestionError> {
        let options = self
            .options
            .into_iter()
            .map(OptionRecord::into_option)
            .collect::<Result<Vec<_>, _>>()?;
        let correct = OptionLabel::new(&self.answer).ok_or(QuestionError::MissingLabel)?;
        QuizQuestion::new(self.question, options, correct)
    }
}

/// Decode a full quiz response, failing on the first faulty question.
///
/// # Errors
///
/// Returns the `QuestionError` of the first question that fails integrity checks.
pub fn decode_questions(records: Vec<QuestionRecord>) -> Result<Vec<QuizQuestion>, QuestionError> {
    records
        .into_iter()
        .map(QuestionRecord::into_question)
        .collect()
}

#[must_use]
pub fn decode_videos(records: Vec<VideoRecord>) -> Vec<VideoDescriptor> {
    records.into_iter().map(VideoDescriptor::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lesson_core::model::{LessonDraft, LessonDuration};

    #[test]
    fn lesson_payload_uses_text_fields() {
        let request = LessonDraft::new("photosynthesis", "pirates")
            .with_duration(LessonDuration::Medium)
            .with_randomness(8)
            .validate()
            .unwrap();

        let json = serde_json::to_value(LessonPayload::from(&request)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "studyTopic": "photosynthesis",
                "duration": "1",
                "sliderValue": "8",
                "randomTheme": "pirates",
            })
        );
    }

    #[test]
    fn unset_duration_is_sent_empty() {
        let request = LessonDraft::new("a", "b").validate().unwrap();
        assert_eq!(LessonPayload::from(&request).duration, "");
    }

    #[test]
    fn quiz_payload_carries_youtube_id() {
        let id = VideoId::new("xyz").unwrap();
        let json = serde_json::to_value(QuizPayload::from(&id)).unwrap();
        assert_eq!(json, serde_json::json!({ "youtubeId": "xyz" }));
    }

    #[test]
    fn video_records_map_is_fun() {
        let records: Vec<VideoRecord> = serde_json::from_str(
            r#"[
                {"url": "https://youtube.com/watch?v=1", "title": "One", "channel": "C", "is_fun": true},
                {"url": "https://youtube.com/watch?v=2", "title": "Two", "channel": "C"}
            ]"#,
        )
        .unwrap();

        let videos = decode_videos(records);
        assert_eq!(videos.len(), 2);
        assert!(videos[0].is_fun());
        assert!(!videos[1].is_fun());
    }

    #[test]
    fn questions_decode_both_option_shapes() {
        let records: Vec<QuestionRecord> = serde_json::from_str(
            r#"[
                {"question": "Capital of France?", "options": ["A) Paris", "B) Rome"], "answer": "A"},
                {"question": "2 + 2?", "options": [["A", "3"], ["B", "4"]], "answer": "b"}
            ]"#,
        )
        .unwrap();

        let questions = decode_questions(records).unwrap();
        let first = &questions[0];
        assert_eq!(first.options()[0].label().as_str(), "A");
        assert_eq!(first.options()[0].text(), "Paris");
        assert_eq!(first.correct_label().as_str(), "A");

        let second = &questions[1];
        assert_eq!(second.options()[1].text(), "4");
        assert_eq!(second.correct_label().as_str(), "B");
    }

    #[test]
    fn faulty_question_is_surfaced() {
        let records: Vec<QuestionRecord> = serde_json::from_str(
            r#"[{"question": "?", "options": ["A) x", "B) y"], "answer": "E"}]"#,
        )
        .unwrap();

        let err = decode_questions(records).unwrap_err();
        assert!(matches!(err, QuestionError::NoCorrectOption { .. }));
    }

    #[test]
    fn blank_option_has_no_label() {
        let err = OptionRecord::Text("  ".into()).into_option().unwrap_err();
        assert_eq!(err, QuestionError::MissingLabel);
    }
}
