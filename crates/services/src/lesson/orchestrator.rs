use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use lesson_core::model::{
    LessonDraft, OptionLabel, QuizQuestion, VideoDescriptor, VideoId, VideoList,
};

use super::ticket::{LessonTicket, OrchestratorStatus, QuizTicket, RequestToken, ResumeOutcome};
use crate::error::{GenerationError, LessonError};
use crate::generation::{LessonGenerator, QuizGenerator};
use crate::sessions::{Grade, PlaylistSession, QuizPhase, QuizSession};

struct ActiveQuiz {
    video: VideoId,
    session: QuizSession,
}

struct PendingQuiz {
    token: RequestToken,
    video: VideoId,
    lesson_generation: u64,
}

/// Owns the lesson playlist and the quiz for one of its videos.
///
/// Both generation calls are split into `begin_*` (validate, mark in flight,
/// hand out a ticket) and `complete_*` (apply the response if the ticket is
/// still relevant). Only one request of each kind may be in flight. The
/// `create_lesson` and `start_quiz_for_current_video` helpers run both halves
/// around the generator call.
pub struct LessonOrchestrator {
    lessons: Arc<dyn LessonGenerator>,
    quizzes: Arc<dyn QuizGenerator>,
    playlist: Option<PlaylistSession>,
    quiz: Option<ActiveQuiz>,
    next_token: u64,
    lesson_generation: u64,
    pending_lesson: Option<RequestToken>,
    pending_quiz: Option<PendingQuiz>,
    lesson_error: Option<String>,
    quiz_error: Option<String>,
}

impl LessonOrchestrator {
    #[must_use]
    pub fn new(lessons: Arc<dyn LessonGenerator>, quizzes: Arc<dyn QuizGenerator>) -> Self {
        Self {
            lessons,
            quizzes,
            playlist: None,
            quiz: None,
            next_token: 0,
            lesson_generation: 0,
            pending_lesson: None,
            pending_quiz: None,
            lesson_error: None,
            quiz_error: None,
        }
    }

    #[must_use]
    pub fn status(&self) -> OrchestratorStatus {
        OrchestratorStatus {
            lesson_loading: self.pending_lesson.is_some(),
            quiz_loading: self.pending_quiz.is_some(),
            lesson_error: self.lesson_error.clone(),
            quiz_error: self.quiz_error.clone(),
        }
    }

    fn issue_token(&mut self) -> RequestToken {
        self.next_token += 1;
        RequestToken::new(self.next_token)
    }

    //
    // ─── PLAYLIST ──────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn playlist(&self) -> Option<&PlaylistSession> {
        self.playlist.as_ref()
    }

    #[must_use]
    pub fn current_video(&self) -> Option<&VideoDescriptor> {
        self.playlist.as_ref().and_then(PlaylistSession::current)
    }

    /// Playback-ended handler: move to the next video, wrapping around.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::NoLesson` before a lesson exists.
    pub fn advance(&mut self) -> Result<Option<&VideoDescriptor>, LessonError> {
        let playlist = self.playlist.as_mut().ok_or(LessonError::NoLesson)?;
        Ok(playlist.advance())
    }

    /// # Errors
    ///
    /// Returns `LessonError::NoLesson` before a lesson exists and
    /// `LessonError::Playlist` if `index` is out of range.
    pub fn select_index(&mut self, index: usize) -> Result<&VideoDescriptor, LessonError> {
        let playlist = self.playlist.as_mut().ok_or(LessonError::NoLesson)?;
        Ok(playlist.select_index(index)?)
    }

    /// # Errors
    ///
    /// Returns `LessonError::NoLesson` before a lesson exists and
    /// `LessonError::Playlist` if no video carries `id`.
    pub fn select_video(&mut self, id: &VideoId) -> Result<&VideoDescriptor, LessonError> {
        let playlist = self.playlist.as_mut().ok_or(LessonError::NoLesson)?;
        Ok(playlist.select_video(id)?)
    }

    /// Drop the playlist and everything tied to it.
    pub fn leave_playlist(&mut self) {
        self.playlist = None;
        self.lesson_generation += 1;
        self.leave_quiz();
    }

    //
    // ─── QUIZ ──────────────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn quiz(&self) -> Option<&QuizSession> {
        self.quiz.as_ref().map(|active| &active.session)
    }

    pub fn quiz_mut(&mut self) -> Option<&mut QuizSession> {
        self.quiz.as_mut().map(|active| &mut active.session)
    }

    /// Video the active quiz was generated for.
    #[must_use]
    pub fn quiz_video(&self) -> Option<&VideoId> {
        self.quiz.as_ref().map(|active| &active.video)
    }

    /// Discard the active quiz and ignore any quiz response still on its way.
    pub fn leave_quiz(&mut self) {
        self.quiz = None;
        self.pending_quiz = None;
    }

    fn active_quiz(&mut self) -> Result<&mut QuizSession, LessonError> {
        self.quiz_mut().ok_or(LessonError::NoQuiz)
    }

    /// # Errors
    ///
    /// Returns `LessonError::NoQuiz` without an active quiz and
    /// `LessonError::Quiz` if the session rejects the selection.
    pub fn select_option(&mut self, label: &OptionLabel) -> Result<(), LessonError> {
        Ok(self.active_quiz()?.select_option(label)?)
    }

    /// # Errors
    ///
    /// Returns `LessonError::NoQuiz` without an active quiz and
    /// `LessonError::Quiz` if the current question cannot be graded.
    pub fn submit_answer(&mut self) -> Result<Grade, LessonError> {
        Ok(self.active_quiz()?.submit()?)
    }

    /// # Errors
    ///
    /// Returns `LessonError::NoQuiz` without an active quiz and
    /// `LessonError::Quiz` if the current question is still ungraded.
    pub fn next_question(&mut self) -> Result<QuizPhase, LessonError> {
        Ok(self.active_quiz()?.next_question()?)
    }

    //
    // ─── LESSON GENERATION ─────────────────────────────────────────────────────
    //

    /// Validate `draft` and mark a lesson request as in flight.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::Validation` for an invalid draft and
    /// `LessonError::LessonInFlight` if a lesson request is already pending.
    /// Neither changes any state.
    pub fn begin_lesson(&mut self, draft: LessonDraft) -> Result<LessonTicket, LessonError> {
        let request = draft.validate()?;
        if self.pending_lesson.is_some() {
            return Err(LessonError::LessonInFlight);
        }

        let token = self.issue_token();
        self.pending_lesson = Some(token);
        debug!(%token, topic = request.topic(), "lesson request issued");
        Ok(LessonTicket { token, request })
    }

    /// Hand back the lesson response for `token`.
    ///
    /// On success the playlist is replaced and reset to its first video, and
    /// the quiz for the previous playlist is discarded.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::Remote` if the service failed; the existing
    /// playlist and quiz are left untouched.
    pub fn complete_lesson(
        &mut self,
        token: RequestToken,
        result: Result<Vec<VideoDescriptor>, GenerationError>,
    ) -> Result<ResumeOutcome, LessonError> {
        if self.pending_lesson != Some(token) {
            debug!(%token, "discarding stale lesson response");
            return Ok(ResumeOutcome::Stale);
        }
        self.pending_lesson = None;

        let videos = match result {
            Ok(videos) => videos,
            Err(err) => {
                warn!(%token, error = %err, "lesson generation failed");
                self.lesson_error = Some(err.to_string());
                return Err(err.into());
            }
        };

        info!(%token, videos = videos.len(), "lesson ready");
        let list = VideoList::new(videos);
        match self.playlist.as_mut() {
            Some(playlist) => playlist.initialize(list),
            None => self.playlist = Some(PlaylistSession::new(list)),
        }
        self.lesson_generation += 1;
        self.lesson_error = None;
        self.leave_quiz();
        Ok(ResumeOutcome::Applied)
    }

    /// Validate, call the lesson generator, and apply its response.
    ///
    /// # Errors
    ///
    /// See `begin_lesson` and `complete_lesson`.
    pub async fn create_lesson(&mut self, draft: LessonDraft) -> Result<ResumeOutcome, LessonError> {
        let ticket = self.begin_lesson(draft)?;
        let lessons = Arc::clone(&self.lessons);
        let result = lessons.generate_lesson(&ticket.request).await;
        self.complete_lesson(ticket.token, result)
    }

    //
    // ─── QUIZ GENERATION ───────────────────────────────────────────────────────
    //

    /// Mark a quiz request for the current video as in flight.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::NoLesson` before a lesson exists,
    /// `LessonError::NoCurrentVideo` for an empty playlist,
    /// `LessonError::InvalidVideoReference` if the current video has no
    /// identifier, and `LessonError::QuizInFlight` if a quiz request is pending.
    pub fn begin_quiz(&mut self) -> Result<QuizTicket, LessonError> {
        let playlist = self.playlist.as_ref().ok_or(LessonError::NoLesson)?;
        let video = playlist
            .current()
            .ok_or(LessonError::NoCurrentVideo)?
            .require_identifier()?;
        if self.pending_quiz.is_some() {
            return Err(LessonError::QuizInFlight);
        }

        let token = self.issue_token();
        self.pending_quiz = Some(PendingQuiz {
            token,
            video: video.clone(),
            lesson_generation: self.lesson_generation,
        });
        debug!(%token, %video, "quiz request issued");
        Ok(QuizTicket { token, video })
    }

    /// Hand back the quiz response for `token`.
    ///
    /// The response is dropped as stale if the request was superseded, the
    /// lesson was replaced, or the current video changed since it was issued.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::DataIntegrity` for a faulty question and
    /// `LessonError::Remote` for a service failure; the playlist and any
    /// existing quiz are left untouched.
    pub fn complete_quiz(
        &mut self,
        token: RequestToken,
        result: Result<Vec<QuizQuestion>, GenerationError>,
    ) -> Result<ResumeOutcome, LessonError> {
        let Some(pending) = self.pending_quiz.take_if(|pending| pending.token == token) else {
            debug!(%token, "discarding superseded quiz response");
            return Ok(ResumeOutcome::Stale);
        };

        let current = self.current_video().and_then(VideoDescriptor::identifier);
        if pending.lesson_generation != self.lesson_generation
            || current.as_ref() != Some(&pending.video)
        {
            debug!(%token, video = %pending.video, "discarding quiz response for a video no longer selected");
            return Ok(ResumeOutcome::Stale);
        }

        let questions = match result {
            Ok(questions) => questions,
            Err(err) => {
                warn!(%token, video = %pending.video, error = %err, "quiz generation failed");
                self.quiz_error = Some(err.to_string());
                return Err(err.into());
            }
        };

        info!(%token, video = %pending.video, questions = questions.len(), "quiz ready");
        self.quiz = Some(ActiveQuiz {
            video: pending.video,
            session: QuizSession::new(questions),
        });
        self.quiz_error = None;
        Ok(ResumeOutcome::Applied)
    }

    /// Request a quiz for the current video and load it when it arrives.
    ///
    /// # Errors
    ///
    /// See `begin_quiz` and `complete_quiz`.
    pub async fn start_quiz_for_current_video(&mut self) -> Result<ResumeOutcome, LessonError> {
        let ticket = self.begin_quiz()?;
        let quizzes = Arc::clone(&self.quizzes);
        let result = quizzes.generate_quiz(&ticket.video).await;
        self.complete_quiz(ticket.token, result)
    }
}

impl fmt::Debug for LessonOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LessonOrchestrator")
            .field("playlist", &self.playlist)
            .field("quiz_video", &self.quiz_video())
            .field("status", &self.status())
            .finish_non_exhaustive()
    }
}
