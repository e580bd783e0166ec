//! Read-only view models over the lesson sessions.

use lesson_core::model::VideoDescriptor;
use services::{OptionState, PlaylistSession, QuizPhase, QuizSession};

const FUN_BADGE: &str = "Fun Video";
const THUMBNAIL_PLACEHOLDER: &str = "(no thumbnail)";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlaylistItemVm {
    pub position: usize,
    pub title: String,
    pub channel: String,
    pub thumbnail: String,
    pub badge: Option<&'static str>,
    pub is_current: bool,
}

#[must_use]
pub fn map_playlist_item(
    index: usize,
    video: &VideoDescriptor,
    current: Option<usize>,
) -> PlaylistItemVm {
    PlaylistItemVm {
        position: index + 1,
        title: video.title().to_string(),
        channel: video.channel().to_string(),
        thumbnail: video
            .thumbnail_url()
            .unwrap_or_else(|| THUMBNAIL_PLACEHOLDER.to_string()),
        badge: video.is_fun().then_some(FUN_BADGE),
        is_current: current == Some(index),
    }
}

#[must_use]
pub fn map_playlist(playlist: &PlaylistSession) -> Vec<PlaylistItemVm> {
    let current = playlist.current_index();
    playlist
        .list()
        .iter()
        .enumerate()
        .map(|(index, video)| map_playlist_item(index, video, current))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizOptionVm {
    pub label: String,
    pub text: String,
    pub state: OptionState,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuizVm {
    pub heading: String,
    pub prompt: String,
    pub options: Vec<QuizOptionVm>,
    pub action_label: &'static str,
    pub action_enabled: bool,
}

/// Map the current question, or `None` when there is nothing to show.
#[must_use]
pub fn map_quiz(quiz: &QuizSession) -> Option<QuizVm> {
    let question = quiz.current_question()?;
    let progress = quiz.progress();

    let options = question
        .options()
        .iter()
        .map(|option| QuizOptionVm {
            label: option.label().to_string(),
            text: option.text().to_string(),
            state: quiz.option_state(option.label()),
        })
        .collect();

    let (action_label, action_enabled) = match progress.phase {
        QuizPhase::Answering => ("Submit Answer", quiz.selected().is_some()),
        QuizPhase::Graded if quiz.has_next() => ("Next Question", true),
        QuizPhase::Graded | QuizPhase::Finished | QuizPhase::NoQuestions => ("Quiz Over!", false),
    };

    Some(QuizVm {
        heading: format!("Question {} of {}", progress.cursor + 1, progress.total),
        prompt: question.prompt().to_string(),
        options,
        action_label,
        action_enabled,
    })
}
