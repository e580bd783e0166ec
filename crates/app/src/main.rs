mod command;
mod vm;

use std::fmt;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use lesson_core::model::{QuizQuestion, VideoDescriptor};
use services::{
    GenerationConfig, GenerationError, Grade, HttpGenerationClient, LessonError,
    LessonGenerator, LessonOrchestrator, LessonTicket, OptionState, QuizGenerator, QuizPhase,
    QuizTicket, RequestToken, ResumeOutcome,
};

use command::{Command, HELP};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidBaseUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidBaseUrl { raw } => write!(f, "invalid --base-url value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct Args {
    config: GenerationConfig,
}

impl Args {
    fn parse(args: &mut impl Iterator<Item = String>) -> Result<Option<Self>, ArgsError> {
        let mut config = GenerationConfig::from_env();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--base-url" => {
                    let value = require_value(args, "--base-url")?;
                    if !value.starts_with("http://") && !value.starts_with("https://") {
                        return Err(ArgsError::InvalidBaseUrl { raw: value });
                    }
                    config.base_url = value;
                }
                "--help" | "-h" => return Ok(None),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Some(Self { config }))
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [--base-url <url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --base-url http://127.0.0.1:5000");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  LESSON_API_BASE_URL, LESSON_API_LESSON_PATH, LESSON_API_QUIZ_PATH, RUST_LOG");
}

enum Flow {
    Continue,
    Quit,
}

/// A generator response travelling back to the command loop.
enum Resume {
    Lesson(RequestToken, Result<Vec<VideoDescriptor>, GenerationError>),
    Quiz(RequestToken, Result<Vec<QuizQuestion>, GenerationError>),
}

/// Runs generator calls off the command loop so input and `status` stay live.
struct Requests {
    client: Arc<HttpGenerationClient>,
    resumes: mpsc::UnboundedSender<Resume>,
}

impl Requests {
    fn spawn_lesson(&self, ticket: LessonTicket) {
        let client = Arc::clone(&self.client);
        let resumes = self.resumes.clone();
        tokio::spawn(async move {
            let result = client.generate_lesson(&ticket.request).await;
            if resumes.send(Resume::Lesson(ticket.token, result)).is_err() {
                debug!(token = %ticket.token, "command loop gone; dropping lesson response");
            }
        });
    }

    fn spawn_quiz(&self, ticket: QuizTicket) {
        let client = Arc::clone(&self.client);
        let resumes = self.resumes.clone();
        tokio::spawn(async move {
            let result = client.generate_quiz(&ticket.video).await;
            if resumes.send(Resume::Quiz(ticket.token, result)).is_err() {
                debug!(token = %ticket.token, "command loop gone; dropping quiz response");
            }
        });
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv = std::env::args().skip(1);
    let Some(args) = Args::parse(&mut argv).inspect_err(|_| print_usage())? else {
        print_usage();
        return Ok(());
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "app=info,services=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(
        lesson_url = %args.config.lesson_url(),
        quiz_url = %args.config.quiz_url(),
        "starting lesson terminal"
    );
    let client = Arc::new(HttpGenerationClient::new(args.config));
    let mut orchestrator = LessonOrchestrator::new(client.clone(), client.clone());
    let (resumes, mut pending) = mpsc::unbounded_channel();
    let requests = Requests { client, resumes };

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let command = match line.parse::<Command>() {
                    Ok(command) => command,
                    Err(command::CommandError::Empty) => continue,
                    Err(err) => {
                        println!("{err}");
                        continue;
                    }
                };
                debug!(?command, "command");

                match handle(&mut orchestrator, &requests, command) {
                    Ok(Flow::Continue) => {}
                    Ok(Flow::Quit) => break,
                    // Recoverable: the orchestrator keeps its state on every error.
                    Err(err) => println!("error: {err}"),
                }
            }
            Some(resume) = pending.recv() => {
                if let Err(err) = resume_request(&mut orchestrator, resume) {
                    println!("error: {err}");
                }
            }
        }
    }

    Ok(())
}

fn resume_request(orchestrator: &mut LessonOrchestrator, resume: Resume) -> Result<(), LessonError> {
    match resume {
        Resume::Lesson(token, result) => {
            if orchestrator.complete_lesson(token, result)? == ResumeOutcome::Applied {
                print_playlist(orchestrator);
            }
        }
        Resume::Quiz(token, result) => {
            if orchestrator.complete_quiz(token, result)? == ResumeOutcome::Applied {
                print_quiz(orchestrator);
            }
        }
    }
    Ok(())
}

fn handle(
    orchestrator: &mut LessonOrchestrator,
    requests: &Requests,
    command: Command,
) -> Result<Flow, LessonError> {
    match command {
        Command::Lesson(draft) => {
            requests.spawn_lesson(orchestrator.begin_lesson(draft)?);
            println!("Generating lesson...");
        }
        Command::List => print_playlist(orchestrator),
        Command::Next => {
            if orchestrator.advance()?.is_some() {
                print_now_playing(orchestrator);
            }
        }
        Command::Play(position) => {
            orchestrator.select_index(position - 1)?;
            print_now_playing(orchestrator);
        }
        Command::Quiz => {
            requests.spawn_quiz(orchestrator.begin_quiz()?);
            println!("Generating quiz...");
        }
        Command::Pick(label) => {
            orchestrator.select_option(&label)?;
            print_quiz(orchestrator);
        }
        Command::Submit => {
            let grade = orchestrator.submit_answer()?;
            println!(
                "{}",
                match grade {
                    Grade::Correct => "Correct!",
                    Grade::Incorrect => "Incorrect.",
                }
            );
            print_quiz(orchestrator);
        }
        Command::Continue => match orchestrator.next_question()? {
            QuizPhase::Finished => print_summary(orchestrator),
            _ => print_quiz(orchestrator),
        },
        Command::Leave => {
            orchestrator.leave_quiz();
            println!("Quiz closed.");
        }
        Command::Close => {
            orchestrator.leave_playlist();
            println!("Playlist closed.");
        }
        Command::Status => print_status(orchestrator),
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(Flow::Quit),
    }
    Ok(Flow::Continue)
}

fn print_playlist(orchestrator: &LessonOrchestrator) {
    let Some(playlist) = orchestrator.playlist() else {
        println!("No lesson yet. Try: lesson <topic> | <theme>");
        return;
    };
    if playlist.is_empty() {
        println!("The lesson came back without videos.");
        return;
    }
    for item in vm::map_playlist(playlist) {
        let marker = if item.is_current { ">" } else { " " };
        let badge = item.badge.map(|badge| format!(" [{badge}]")).unwrap_or_default();
        println!(
            "{marker} {}. {} ({}){badge}\n      {}",
            item.position, item.title, item.channel, item.thumbnail
        );
    }
}

fn print_now_playing(orchestrator: &LessonOrchestrator) {
    if let Some(video) = orchestrator.current_video() {
        println!("Now playing: {} ({})", video.title(), video.url());
    }
}

fn print_quiz(orchestrator: &LessonOrchestrator) {
    let Some(quiz) = orchestrator.quiz() else {
        return;
    };
    let Some(view) = vm::map_quiz(quiz) else {
        println!("This video has no quiz questions.");
        return;
    };

    println!("{}", view.heading);
    println!("{}", view.prompt);
    for option in &view.options {
        let mark = match option.state {
            OptionState::Idle => " ",
            OptionState::Selected => "*",
            OptionState::Correct => "+",
            OptionState::Incorrect => "x",
        };
        println!(" [{mark}] {}) {}", option.label, option.text);
    }
    let hint = if view.action_enabled { "" } else { " (unavailable)" };
    println!("-> {}{hint}", view.action_label);
}

fn print_summary(orchestrator: &LessonOrchestrator) {
    if let Some(summary) = orchestrator.quiz().and_then(|quiz| quiz.summary()) {
        println!(
            "Quiz over: {} of {} correct.",
            summary.correct, summary.total
        );
    }
}

fn print_status(orchestrator: &LessonOrchestrator) {
    let status = orchestrator.status();
    let videos = orchestrator.playlist().map_or(0, |playlist| playlist.len());
    println!("videos: {videos}");
    if let Some(index) = orchestrator.playlist().and_then(|playlist| playlist.current_index()) {
        println!("current: {}", index + 1);
    }
    if let Some(video) = orchestrator.quiz_video() {
        println!("quiz for: {video}");
    }
    println!(
        "lesson loading: {}, quiz loading: {}",
        status.lesson_loading, status.quiz_loading
    );
    if let Some(err) = status.lesson_error {
        println!("last lesson error: {err}");
    }
    if let Some(err) = status.quiz_error {
        println!("last quiz error: {err}");
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
