//! Line-oriented game loop on stdin/stdout.

use std::fmt::Write as _;

use guesser_core::answer::AnswerChoice;
use guesser_core::session::GameSettings;
use guesser_core::summary::GameSummary;
use guesser_session::{GameEvent, GameOrchestrator, QuestionView};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::error::AppError;

const HELP: &str = "Commands: <number> answer, n next question, r restart, v <0-100> volume, q quit";

/// A line typed by the player.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Zero-based option index.
    Answer(usize),
    Next,
    Restart,
    /// Volume in `[0, 1]`.
    Volume(f32),
    Help,
    Quit,
    Unknown(String),
}

/// Parses one input line. Blank lines yield `None`.
#[must_use]
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    let mut words = line.split_whitespace();
    let head = words.next().unwrap_or_default().to_ascii_lowercase();
    let command = match head.as_str() {
        "n" | "next" => Command::Next,
        "r" | "restart" => Command::Restart,
        "q" | "quit" | "exit" => Command::Quit,
        "h" | "help" | "?" => Command::Help,
        "v" | "volume" => match words.next().and_then(|w| w.parse::<f32>().ok()) {
            Some(percent) if (0.0..=100.0).contains(&percent) => Command::Volume(percent / 100.0),
            _ => Command::Unknown(line.to_owned()),
        },
        number => match number.parse::<usize>() {
            Ok(choice) if choice >= 1 => Command::Answer(choice - 1),
            _ => Command::Unknown(line.to_owned()),
        },
    };
    Some(command)
}

/// End-of-game report.
#[must_use]
pub fn render_summary(summary: &GameSummary) -> String {
    format!(
        "Game over! Final score: {}\nCorrect answers: {}/{} ({:.0}%)\nRank: {}\n{}",
        summary.score,
        summary.correct_answers,
        summary.total_questions,
        summary.accuracy,
        summary.rank().label(),
        summary.message(),
    )
}

/// Text shown for `event`, given the question currently displayed.
#[must_use]
pub fn render_event(
    event: &GameEvent,
    question: Option<&QuestionView>,
    total_questions: usize,
) -> Option<String> {
    match event {
        GameEvent::SessionStarted {
            total_questions, ..
        } => Some(format!("New game with {total_questions} questions.")),
        GameEvent::QuestionPresented { question_index } => Some(format!(
            "Question {}/{total_questions}: loading clip...",
            question_index + 1
        )),
        GameEvent::QuestionArmed {
            question_index,
            with_audio,
        } => {
            let question = question?;
            let mut text = format!(
                "Question {}/{total_questions} ({}s to answer)",
                question_index + 1,
                question.time_limit_seconds
            );
            if !with_audio {
                text.push_str(" [clip unavailable, answer blind]");
            }
            for (i, label) in question.options.iter().enumerate() {
                let _ = write!(text, "\n  {}) {label}", i + 1);
            }
            Some(text)
        }
        GameEvent::AnswerResolved(outcome) => {
            let answer = question
                .and_then(|q| q.options.get(outcome.correct_option_index))
                .map_or("unknown", String::as_str);
            let artists = question.map_or("", |q| q.artists.as_str());
            let verdict = if outcome.correct {
                format!("Correct! +{} points.", outcome.points_earned)
            } else {
                format!("Wrong. It was \"{answer}\" by {artists}.")
            };
            Some(format!("{verdict} Score: {}", outcome.score_after))
        }
        GameEvent::ReadyToAdvance { .. } => Some("Press n for the next question.".to_owned()),
        GameEvent::GameCompleted(summary) => Some(format!(
            "{}\nPress r to play again or q to quit.",
            render_summary(summary)
        )),
        GameEvent::SessionFailed { message } => Some(format!(
            "Error: {message}\nPress r to restart or q to quit."
        )),
    }
}

/// Plays games until the player quits or stdin closes.
///
/// # Errors
///
/// Returns `AppError::Io` if reading stdin fails.
pub async fn run(game: GameOrchestrator, settings: GameSettings) -> Result<(), AppError> {
    let mut events = game.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("{HELP}");
    if let Err(error) = game.create_session(settings).await {
        debug!(%error, "initial session failed");
    }

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(event) => {
                    let snapshot = game.snapshot();
                    if let Some(text) =
                        render_event(&event, snapshot.question.as_ref(), snapshot.total_questions)
                    {
                        println!("{text}");
                    }
                    if matches!(event, GameEvent::GameCompleted(_)) {
                        log_remote_summary(&game).await;
                    }
                }
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "game events lagged"),
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    game.exit_session();
                    break;
                };
                let Some(command) = parse_command(&line) else {
                    continue;
                };
                if !handle_command(&game, command).await {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Applies `command`; returns false when the player quits.
async fn handle_command(game: &GameOrchestrator, command: Command) -> bool {
    match command {
        Command::Answer(index) => {
            if let Ok(None) = game.submit_answer(AnswerChoice::Option(index)).await {
                println!("That answer is not accepted right now.");
            }
        }
        Command::Next => {
            if let Ok(None) = game.advance_to_next_question().await {
                println!("Nothing to move on to yet.");
            }
        }
        Command::Restart => {
            if let Err(error) = game.restart().await {
                debug!(%error, "restart failed");
            }
        }
        Command::Volume(volume) => {
            game.set_volume(volume);
            println!("Volume set to {:.0}%.", game.volume() * 100.0);
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => {
            game.exit_session();
            return false;
        }
        Command::Unknown(line) => println!("Unknown command \"{line}\". {HELP}"),
    }
    true
}

async fn log_remote_summary(game: &GameOrchestrator) {
    match game.fetch_remote_summary().await {
        Ok(Some(remote)) => info!(
            session_id = %remote.session_id,
            score = remote.score,
            accuracy = remote.accuracy,
            "service summary"
        ),
        Ok(None) => {}
        Err(error) => warn!(%error, "failed to fetch service summary"),
    }
}
