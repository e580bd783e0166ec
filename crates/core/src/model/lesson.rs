use std::fmt;
use std::str::FromStr;

use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonRequestError {
    #[error("study topic cannot be empty")]
    EmptyTopic,

    #[error("random theme cannot be empty")]
    EmptyTheme,

    #[error("randomness must be between 1 and 10, got {value}")]
    RandomnessOutOfRange { value: u8 },

    #[error("unknown lesson duration: {0}")]
    UnknownDuration(String),
}

//
// ─── DURATION ──────────────────────────────────────────────────────────────────
//

/// Target length of a generated lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LessonDuration {
    Short,
    Medium,
    Long,
}

impl LessonDuration {
    /// Position of this duration in the picker, also its wire value.
    #[must_use]
    pub fn index(self) -> u8 {
        match self {
            LessonDuration::Short => 0,
            LessonDuration::Medium => 1,
            LessonDuration::Long => 2,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            LessonDuration::Short => "Short (15-30 min)",
            LessonDuration::Medium => "Medium (30min - 1 hr)",
            LessonDuration::Long => "Long (1 hr - 2 hrs)",
        }
    }
}

impl fmt::Display for LessonDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LessonDuration {
    type Err = LessonRequestError;

    /// Accepts the picker index (`"0"`..`"2"`) or the name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "0" | "short" => Ok(Self::Short),
            "1" | "medium" => Ok(Self::Medium),
            "2" | "long" => Ok(Self::Long),
            _ => Err(LessonRequestError::UnknownDuration(s.to_string())),
        }
    }
}

//
// ─── RANDOMNESS ────────────────────────────────────────────────────────────────
//

/// How far the generated lesson may stray toward the random theme (1..=10).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Randomness(u8);

impl Randomness {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    /// # Errors
    ///
    /// Returns `LessonRequestError::RandomnessOutOfRange` outside `1..=10`.
    pub fn new(value: u8) -> Result<Self, LessonRequestError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(LessonRequestError::RandomnessOutOfRange { value });
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Randomness {
    fn default() -> Self {
        Self(5)
    }
}

impl fmt::Display for Randomness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

//
// ─── DRAFT / VALIDATED REQUEST ─────────────────────────────────────────────────
//

/// Unvalidated lesson form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonDraft {
    pub topic: String,
    pub duration: Option<LessonDuration>,
    pub randomness: u8,
    pub theme: String,
}

impl LessonDraft {
    pub fn new(topic: impl Into<String>, theme: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            duration: None,
            randomness: Randomness::default().value(),
            theme: theme.into(),
        }
    }

    #[must_use]
    pub fn with_duration(mut self, duration: LessonDuration) -> Self {
        self.duration = Some(duration);
        self
    }

    #[must_use]
    pub fn with_randomness(mut self, randomness: u8) -> Self {
        self.randomness = randomness;
        self
    }

    /// Pre-flight validation; nothing is sent for a draft that fails here.
    ///
    /// # Errors
    ///
    /// Returns `LessonRequestError::EmptyTopic` / `EmptyTheme` for blank fields
    /// and `LessonRequestError::RandomnessOutOfRange` outside `1..=10`.
    pub fn validate(self) -> Result<LessonRequest, LessonRequestError> {
        if self.topic.trim().is_empty() {
            return Err(LessonRequestError::EmptyTopic);
        }
        if self.theme.trim().is_empty() {
            return Err(LessonRequestError::EmptyTheme);
        }
        let randomness = Randomness::new(self.randomness)?;

        Ok(LessonRequest {
            topic: self.topic,
            duration: self.duration,
            randomness,
            theme: self.theme,
        })
    }
}

/// A lesson request that passed pre-flight validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonRequest {
    topic: String,
    duration: Option<LessonDuration>,
    randomness: Randomness,
    theme: String,
}

impl LessonRequest {
    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn duration(&self) -> Option<LessonDuration> {
        self.duration
    }

    #[must_use]
    pub fn randomness(&self) -> Randomness {
        self.randomness
    }

    #[must_use]
    pub fn theme(&self) -> &str {
        &self.theme
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
