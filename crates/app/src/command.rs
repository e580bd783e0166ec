use std::fmt;
use std::str::FromStr;

use lesson_core::model::{LessonDraft, LessonDuration, OptionLabel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    Empty,
    Unknown(String),
    MissingArgument { command: &'static str, what: &'static str },
    InvalidPosition { raw: String },
    InvalidRandomness { raw: String },
    InvalidDuration { raw: String },
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::Empty => write!(f, "empty command"),
            CommandError::Unknown(raw) => write!(f, "unknown command: {raw}"),
            CommandError::MissingArgument { command, what } => {
                write!(f, "{command} requires {what}")
            }
            CommandError::InvalidPosition { raw } => write!(f, "invalid video position: {raw}"),
            CommandError::InvalidRandomness { raw } => write!(f, "invalid randomness: {raw}"),
            CommandError::InvalidDuration { raw } => write!(f, "invalid duration: {raw}"),
        }
    }
}

impl std::error::Error for CommandError {}

/// One line of terminal input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `lesson <topic> | <theme> [| <duration>] [| <randomness>]`
    Lesson(LessonDraft),
    List,
    /// Playback of the current video ended.
    Next,
    /// 1-based position in the playlist.
    Play(usize),
    Quiz,
    Pick(OptionLabel),
    Submit,
    Continue,
    Leave,
    Close,
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(word, rest)| (word, rest.trim()));

        match word.to_ascii_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "lesson" => parse_lesson(rest).map(Command::Lesson),
            "list" | "ls" => Ok(Command::List),
            "next" | "ended" => Ok(Command::Next),
            "play" => {
                let raw = require(rest, "play", "a position")?;
                let position = raw
                    .parse::<usize>()
                    .ok()
                    .filter(|position| *position > 0)
                    .ok_or_else(|| CommandError::InvalidPosition { raw: raw.into() })?;
                Ok(Command::Play(position))
            }
            "quiz" => Ok(Command::Quiz),
            "pick" => {
                let raw = require(rest, "pick", "an option label")?;
                OptionLabel::new(raw)
                    .map(Command::Pick)
                    .ok_or(CommandError::MissingArgument {
                        command: "pick",
                        what: "an option label",
                    })
            }
            "submit" => Ok(Command::Submit),
            "continue" => Ok(Command::Continue),
            "leave" => Ok(Command::Leave),
            "close" => Ok(Command::Close),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

fn require<'a>(
    rest: &'a str,
    command: &'static str,
    what: &'static str,
) -> Result<&'a str, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument { command, what });
    }
    Ok(rest)
}

/// Blank topic or theme is left for draft validation to reject.
fn parse_lesson(rest: &str) -> Result<LessonDraft, CommandError> {
    let mut fields = rest.split('|').map(str::trim);
    let topic = fields.next().unwrap_or_default();
    let theme = fields.next().unwrap_or_default();
    let mut draft = LessonDraft::new(topic, theme);

    if let Some(raw) = fields.next().filter(|raw| !raw.is_empty()) {
        let duration = raw
            .parse::<LessonDuration>()
            .map_err(|_| CommandError::InvalidDuration { raw: raw.into() })?;
        draft = draft.with_duration(duration);
    }
    if let Some(raw) = fields.next().filter(|raw| !raw.is_empty()) {
        let randomness = raw
            .parse::<u8>()
            .map_err(|_| CommandError::InvalidRandomness { raw: raw.into() })?;
        draft = draft.with_randomness(randomness);
    }

    Ok(draft)
}

pub const HELP: &str = "\
Commands:
  lesson <topic> | <theme> [| short|medium|long] [| 1-10]
  list                 show the playlist
  next                 current video ended; play the next one
  play <n>             jump to video n
  quiz                 generate a quiz for the current video
  pick <label>         choose an answer
  submit               grade the chosen answer
  continue             move to the next question
  leave                close the quiz
  close                close the playlist
  status               show loading and error state
  quit";
