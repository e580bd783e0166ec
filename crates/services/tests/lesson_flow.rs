use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lesson_core::model::{
    LessonDraft, LessonRequest, OptionLabel, QuestionError, QuizOption, QuizQuestion,
    VideoDescriptor, VideoId,
};
use reqwest::StatusCode;
use services::{
    GenerationError, Grade, LessonError, LessonGenerator, LessonOrchestrator, PlaylistError,
    QuizGenerator, QuizPhase, ResumeOutcome,
};

//
// ─── FAKE GENERATORS ───────────────────────────────────────────────────────────
//

enum Scripted<T> {
    Ok(T),
    Status(StatusCode),
    Fault(QuestionError),
}

impl<T> Scripted<T> {
    fn into_result(self) -> Result<T, GenerationError> {
        match self {
            Scripted::Ok(value) => Ok(value),
            Scripted::Status(status) => Err(GenerationError::HttpStatus(status)),
            Scripted::Fault(fault) => Err(GenerationError::Integrity(fault)),
        }
    }
}

/// Replays scripted responses in order and counts calls.
#[derive(Default)]
struct FakeGenerator {
    lessons: Mutex<VecDeque<Scripted<Vec<VideoDescriptor>>>>,
    quizzes: Mutex<VecDeque<Scripted<Vec<QuizQuestion>>>>,
    lesson_calls: AtomicUsize,
    quiz_calls: AtomicUsize,
    quiz_videos: Mutex<Vec<VideoId>>,
}

impl FakeGenerator {
    fn push_lesson(&self, response: Scripted<Vec<VideoDescriptor>>) {
        self.lessons.lock().unwrap().push_back(response);
    }

    fn push_quiz(&self, response: Scripted<Vec<QuizQuestion>>) {
        self.quizzes.lock().unwrap().push_back(response);
    }
}

#[async_trait]
impl LessonGenerator for FakeGenerator {
    async fn generate_lesson(
        &self,
        _request: &LessonRequest,
    ) -> Result<Vec<VideoDescriptor>, GenerationError> {
        self.lesson_calls.fetch_add(1, Ordering::SeqCst);
        self.lessons
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected lesson call")
            .into_result()
    }
}

#[async_trait]
impl QuizGenerator for FakeGenerator {
    async fn generate_quiz(&self, video: &VideoId) -> Result<Vec<QuizQuestion>, GenerationError> {
        self.quiz_calls.fetch_add(1, Ordering::SeqCst);
        self.quiz_videos.lock().unwrap().push(video.clone());
        self.quizzes
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected quiz call")
            .into_result()
    }
}

//
// ─── FIXTURES ──────────────────────────────────────────────────────────────────
//

fn video(id: &str) -> VideoDescriptor {
    VideoDescriptor::new(
        format!("https://www.youtube.com/watch?v={id}"),
        format!("Video {id}"),
        "Channel",
        false,
    )
}

fn label(raw: &str) -> OptionLabel {
    OptionLabel::new(raw).unwrap()
}

fn question(prompt: &str, correct: &str) -> QuizQuestion {
    let options = ["A", "B", "C"]
        .iter()
        .map(|raw| QuizOption::new(label(raw), format!("{prompt} {raw}")))
        .collect();
    QuizQuestion::new(prompt, options, label(correct)).unwrap()
}

fn draft() -> LessonDraft {
    LessonDraft::new("photosynthesis", "pirates")
}

fn setup() -> (Arc<FakeGenerator>, LessonOrchestrator) {
    let fake = Arc::new(FakeGenerator::default());
    let orchestrator = LessonOrchestrator::new(fake.clone(), fake.clone());
    (fake, orchestrator)
}

async fn with_lesson(ids: &[&str]) -> (Arc<FakeGenerator>, LessonOrchestrator) {
    let (fake, mut orchestrator) = setup();
    fake.push_lesson(Scripted::Ok(ids.iter().map(|id| video(id)).collect()));
    let outcome = orchestrator.create_lesson(draft()).await.unwrap();
    assert_eq!(outcome, ResumeOutcome::Applied);
    (fake, orchestrator)
}

//
// ─── LESSON ────────────────────────────────────────────────────────────────────
//

#[tokio::test]
async fn lesson_playlist_cycles() {
    let (_fake, mut orchestrator) = with_lesson(&["a", "b", "c"]).await;

    assert_eq!(orchestrator.current_video().unwrap().title(), "Video a");
    assert_eq!(orchestrator.advance().unwrap().unwrap().title(), "Video b");
    assert_eq!(orchestrator.advance().unwrap().unwrap().title(), "Video c");
    assert_eq!(orchestrator.advance().unwrap().unwrap().title(), "Video a");
    assert!(!orchestrator.status().lesson_loading);
}

#[tokio::test]
async fn empty_topic_never_reaches_the_service() {
    let (fake, mut orchestrator) = with_lesson(&["a", "b"]).await;
    orchestrator.select_index(1).unwrap();

    let err = orchestrator
        .create_lesson(LessonDraft::new("  ", "pirates"))
        .await
        .unwrap_err();

    assert!(matches!(err, LessonError::Validation(_)));
    assert_eq!(fake.lesson_calls.load(Ordering::SeqCst), 1);
    assert_eq!(orchestrator.playlist().unwrap().current_index(), Some(1));
    assert!(!orchestrator.status().lesson_loading);
}

#[tokio::test]
async fn empty_lesson_has_no_current_video() {
    let (_fake, mut orchestrator) = with_lesson(&[]).await;

    assert!(orchestrator.current_video().is_none());
    assert!(orchestrator.advance().unwrap().is_none());
    assert!(matches!(
        orchestrator.begin_quiz().unwrap_err(),
        LessonError::NoCurrentVideo
    ));
}

#[tokio::test]
async fn failed_lesson_keeps_previous_playlist() {
    let (fake, mut orchestrator) = with_lesson(&["a", "b"]).await;
    orchestrator.select_index(1).unwrap();
    fake.push_lesson(Scripted::Status(StatusCode::INTERNAL_SERVER_ERROR));

    let err = orchestrator.create_lesson(draft()).await.unwrap_err();

    assert!(matches!(err, LessonError::Remote(_)));
    assert_eq!(orchestrator.current_video().unwrap().title(), "Video b");
    let status = orchestrator.status();
    assert!(!status.lesson_loading);
    assert!(status.lesson_error.is_some());
}

#[tokio::test]
async fn second_lesson_request_is_rejected_while_in_flight() {
    let (_fake, mut orchestrator) = setup();
    let first = orchestrator.begin_lesson(draft()).unwrap();
    assert!(orchestrator.status().lesson_loading);

    let err = orchestrator.begin_lesson(draft()).unwrap_err();
    assert!(matches!(err, LessonError::LessonInFlight));

    let outcome = orchestrator
        .complete_lesson(first.token, Ok(vec![video("a")]))
        .unwrap();
    assert_eq!(outcome, ResumeOutcome::Applied);
    assert!(orchestrator.begin_lesson(draft()).is_ok());
}

#[tokio::test]
async fn unknown_lesson_token_is_stale() {
    let (_fake, mut orchestrator) = with_lesson(&["a"]).await;
    let ticket = orchestrator.begin_lesson(draft()).unwrap();
    orchestrator
        .complete_lesson(ticket.token, Ok(vec![video("x"), video("y")]))
        .unwrap();

    let replay = orchestrator
        .complete_lesson(ticket.token, Ok(vec![video("z")]))
        .unwrap();
    assert_eq!(replay, ResumeOutcome::Stale);
    assert_eq!(orchestrator.current_video().unwrap().title(), "Video x");
}

#[tokio::test]
async fn stale_lesson_token_leaves_newer_request_loading() {
    let (_fake, mut orchestrator) = setup();
    let first = orchestrator.begin_lesson(draft()).unwrap();
    orchestrator
        .complete_lesson(first.token, Ok(vec![video("a")]))
        .unwrap();
    let second = orchestrator.begin_lesson(draft()).unwrap();

    let outcome = orchestrator
        .complete_lesson(first.token, Ok(vec![video("z")]))
        .unwrap();
    assert_eq!(outcome, ResumeOutcome::Stale);
    assert!(orchestrator.status().lesson_loading);
    assert_eq!(orchestrator.current_video().unwrap().title(), "Video a");

    let outcome = orchestrator
        .complete_lesson(second.token, Ok(vec![video("b")]))
        .unwrap();
    assert_eq!(outcome, ResumeOutcome::Applied);
    assert!(!orchestrator.status().lesson_loading);
    assert_eq!(orchestrator.current_video().unwrap().title(), "Video b");
}

#[tokio::test]
async fn successful_requests_clear_previous_errors() {
    let (fake, mut orchestrator) = with_lesson(&["a"]).await;

    fake.push_lesson(Scripted::Status(StatusCode::INTERNAL_SERVER_ERROR));
    orchestrator.create_lesson(draft()).await.unwrap_err();
    assert!(orchestrator.status().lesson_error.is_some());
    fake.push_lesson(Scripted::Ok(vec![video("b")]));
    orchestrator.create_lesson(draft()).await.unwrap();
    assert_eq!(orchestrator.status().lesson_error, None);

    fake.push_quiz(Scripted::Status(StatusCode::BAD_GATEWAY));
    orchestrator.start_quiz_for_current_video().await.unwrap_err();
    assert!(orchestrator.status().quiz_error.is_some());
    assert!(orchestrator.status().lesson_error.is_none());
    fake.push_quiz(Scripted::Ok(vec![question("Q1", "A")]));
    orchestrator.start_quiz_for_current_video().await.unwrap();
    assert_eq!(orchestrator.status().quiz_error, None);
}

#[tokio::test]
async fn select_video_by_identifier() {
    let (_fake, mut orchestrator) = setup();
    let wanted = VideoId::new("c").unwrap();
    assert!(matches!(
        orchestrator.select_video(&wanted),
        Err(LessonError::NoLesson)
    ));

    let (_fake, mut orchestrator) = with_lesson(&["a", "b", "c"]).await;
    assert_eq!(orchestrator.select_video(&wanted).unwrap().title(), "Video c");
    assert_eq!(orchestrator.playlist().unwrap().current_index(), Some(2));

    let missing = VideoId::new("zzz").unwrap();
    assert!(matches!(
        orchestrator.select_video(&missing),
        Err(LessonError::Playlist(PlaylistError::UnknownVideo(_)))
    ));
    assert_eq!(orchestrator.playlist().unwrap().current_index(), Some(2));
}

#[tokio::test]
async fn new_lesson_resets_index_and_drops_quiz() {
    let (fake, mut orchestrator) = with_lesson(&["a", "b"]).await;
    orchestrator.select_index(1).unwrap();
    fake.push_quiz(Scripted::Ok(vec![question("Q1", "A")]));
    orchestrator.start_quiz_for_current_video().await.unwrap();
    assert!(orchestrator.quiz().is_some());

    fake.push_lesson(Scripted::Ok(vec![video("c"), video("d")]));
    orchestrator.create_lesson(draft()).await.unwrap();

    assert_eq!(orchestrator.playlist().unwrap().current_index(), Some(0));
    assert_eq!(orchestrator.current_video().unwrap().title(), "Video c");
    assert!(orchestrator.quiz().is_none());
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

#[tokio::test]
async fn quiz_requires_a_lesson() {
    let (fake, mut orchestrator) = setup();
    let err = orchestrator
        .start_quiz_for_current_video()
        .await
        .unwrap_err();
    assert!(matches!(err, LessonError::NoLesson));
    assert_eq!(fake.quiz_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn quiz_requires_a_video_identifier() {
    let (fake, mut orchestrator) = setup();
    fake.push_lesson(Scripted::Ok(vec![VideoDescriptor::new(
        "https://example.com/clip.mp4",
        "No id",
        "Channel",
        true,
    )]));
    orchestrator.create_lesson(draft()).await.unwrap();

    let err = orchestrator
        .start_quiz_for_current_video()
        .await
        .unwrap_err();
    assert!(matches!(err, LessonError::InvalidVideoReference(_)));
    assert_eq!(fake.quiz_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn quiz_for_current_video_runs_to_finish() {
    let (fake, mut orchestrator) = with_lesson(&["a", "b"]).await;
    orchestrator.advance().unwrap();
    fake.push_quiz(Scripted::Ok(vec![question("Q1", "B"), question("Q2", "C")]));

    let outcome = orchestrator.start_quiz_for_current_video().await.unwrap();
    assert_eq!(outcome, ResumeOutcome::Applied);
    assert_eq!(
        fake.quiz_videos.lock().unwrap().as_slice(),
        &[VideoId::new("b").unwrap()]
    );
    assert_eq!(orchestrator.quiz_video(), VideoId::new("b").as_ref());

    let quiz = orchestrator.quiz_mut().unwrap();
    quiz.select_option(&label("A")).unwrap();
    assert_eq!(quiz.submit().unwrap(), Grade::Incorrect);
    quiz.select_option(&label("C")).unwrap();
    assert_eq!(quiz.selected(), Some(&label("A")));
    assert_eq!(quiz.next_question().unwrap(), QuizPhase::Answering);
    assert_eq!(quiz.cursor(), 1);

    quiz.select_option(&label("C")).unwrap();
    assert_eq!(quiz.submit().unwrap(), Grade::Correct);
    assert_eq!(quiz.next_question().unwrap(), QuizPhase::Finished);
    assert_eq!(quiz.summary().unwrap().correct, 1);
}

#[tokio::test]
async fn quiz_response_for_abandoned_video_is_discarded() {
    let (_fake, mut orchestrator) = with_lesson(&["a", "b"]).await;
    let ticket = orchestrator.begin_quiz().unwrap();
    assert!(orchestrator.status().quiz_loading);

    orchestrator.advance().unwrap();
    let outcome = orchestrator
        .complete_quiz(ticket.token, Ok(vec![question("Q1", "A")]))
        .unwrap();

    assert_eq!(outcome, ResumeOutcome::Stale);
    assert!(orchestrator.quiz().is_none());
    assert!(!orchestrator.status().quiz_loading);
}

#[tokio::test]
async fn quiz_response_after_lesson_replaced_is_discarded() {
    let (_fake, mut orchestrator) = with_lesson(&["a"]).await;
    let quiz_ticket = orchestrator.begin_quiz().unwrap();

    let lesson_ticket = orchestrator.begin_lesson(draft()).unwrap();
    orchestrator
        .complete_lesson(lesson_ticket.token, Ok(vec![video("a")]))
        .unwrap();

    let outcome = orchestrator
        .complete_quiz(quiz_ticket.token, Ok(vec![question("Q1", "A")]))
        .unwrap();
    assert_eq!(outcome, ResumeOutcome::Stale);
    assert!(orchestrator.quiz().is_none());
}

#[tokio::test]
async fn second_quiz_request_is_rejected_while_in_flight() {
    let (_fake, mut orchestrator) = with_lesson(&["a"]).await;
    let _ticket = orchestrator.begin_quiz().unwrap();
    assert!(matches!(
        orchestrator.begin_quiz().unwrap_err(),
        LessonError::QuizInFlight
    ));
}

#[tokio::test]
async fn failed_quiz_keeps_playlist_and_previous_quiz() {
    let (fake, mut orchestrator) = with_lesson(&["a", "b"]).await;
    fake.push_quiz(Scripted::Ok(vec![question("Q1", "A")]));
    orchestrator.start_quiz_for_current_video().await.unwrap();
    orchestrator
        .quiz_mut()
        .unwrap()
        .select_option(&label("B"))
        .unwrap();

    fake.push_quiz(Scripted::Status(StatusCode::BAD_GATEWAY));
    let err = orchestrator
        .start_quiz_for_current_video()
        .await
        .unwrap_err();

    assert!(matches!(err, LessonError::Remote(_)));
    assert_eq!(orchestrator.quiz().unwrap().selected(), Some(&label("B")));
    assert_eq!(orchestrator.current_video().unwrap().title(), "Video a");
    let status = orchestrator.status();
    assert!(!status.quiz_loading);
    assert!(status.quiz_error.is_some());
}

#[tokio::test]
async fn faulty_quiz_is_reported_as_data_integrity() {
    let (fake, mut orchestrator) = with_lesson(&["a"]).await;
    fake.push_quiz(Scripted::Fault(QuestionError::NoOptions));

    let err = orchestrator
        .start_quiz_for_current_video()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LessonError::DataIntegrity(QuestionError::NoOptions)
    ));
    assert!(orchestrator.quiz().is_none());
}

#[tokio::test]
async fn empty_quiz_exposes_no_questions() {
    let (fake, mut orchestrator) = with_lesson(&["a"]).await;
    fake.push_quiz(Scripted::Ok(Vec::new()));
    orchestrator.start_quiz_for_current_video().await.unwrap();

    assert_eq!(orchestrator.quiz().unwrap().phase(), QuizPhase::NoQuestions);
}

#[tokio::test]
async fn leaving_the_quiz_ignores_late_response() {
    let (_fake, mut orchestrator) = with_lesson(&["a"]).await;
    let ticket = orchestrator.begin_quiz().unwrap();
    orchestrator.leave_quiz();

    let outcome = orchestrator
        .complete_quiz(ticket.token, Ok(vec![question("Q1", "A")]))
        .unwrap();
    assert_eq!(outcome, ResumeOutcome::Stale);
    assert!(orchestrator.quiz().is_none());
}

#[tokio::test]
async fn answering_without_a_quiz_is_rejected() {
    let (fake, mut orchestrator) = with_lesson(&["a"]).await;
    assert!(matches!(
        orchestrator.select_option(&label("A")),
        Err(LessonError::NoQuiz)
    ));
    assert!(matches!(orchestrator.submit_answer(), Err(LessonError::NoQuiz)));

    fake.push_quiz(Scripted::Ok(vec![question("Q1", "A")]));
    orchestrator.start_quiz_for_current_video().await.unwrap();
    assert!(matches!(
        orchestrator.next_question(),
        Err(LessonError::Quiz(_))
    ));
    orchestrator.select_option(&label("a")).unwrap();
    assert_eq!(orchestrator.submit_answer().unwrap(), Grade::Correct);
    assert_eq!(orchestrator.next_question().unwrap(), QuizPhase::Finished);
}

#[tokio::test]
async fn leaving_the_playlist_drops_quiz_and_pending_request() {
    let (fake, mut orchestrator) = with_lesson(&["a", "b"]).await;
    fake.push_quiz(Scripted::Ok(vec![question("Q1", "A")]));
    orchestrator.start_quiz_for_current_video().await.unwrap();
    assert!(orchestrator.quiz().is_some());

    orchestrator.advance().unwrap();
    let ticket = orchestrator.begin_quiz().unwrap();
    orchestrator.leave_playlist();

    assert!(orchestrator.playlist().is_none());
    assert!(orchestrator.quiz().is_none());
    assert!(!orchestrator.status().quiz_loading);
    assert!(matches!(orchestrator.advance(), Err(LessonError::NoLesson)));

    let outcome = orchestrator
        .complete_quiz(ticket.token, Ok(vec![question("Q1", "A")]))
        .unwrap();
    assert_eq!(outcome, ResumeOutcome::Stale);
    assert!(orchestrator.quiz().is_none());
}
