//! Wire shapes of the game service and their domain conversions.

use guesser_core::answer::{AnswerRequest, AnswerResponse};
use guesser_core::catalog::Playlist;
use guesser_core::question::{AnswerOption, Question};
use guesser_core::session::{
    GameSettings, GameStateResponse, RemoteSummary, SessionCreated, SessionId,
};
use serde::{Deserialize, Serialize};

/// Time limit the service assumes when a question omits one.
const DEFAULT_TIME_LIMIT_SECONDS: u32 = 15;

fn default_time_limit() -> u32 {
    DEFAULT_TIME_LIMIT_SECONDS
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateGameBody<'a> {
    num_songs: u32,
    num_choices: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    genres: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    playlist_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start_year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end_year: Option<i32>,
}

impl<'a> From<&'a GameSettings> for CreateGameBody<'a> {
    fn from(settings: &'a GameSettings) -> Self {
        Self {
            num_songs: settings.song_count,
            num_choices: settings.option_count,
            genres: settings.genres.as_deref(),
            playlist_id: settings.playlist_id.as_deref(),
            start_year: settings.start_year,
            end_year: settings.end_year,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GameSessionDto {
    session_id: SessionId,
    total_questions: usize,
    #[serde(default)]
    started_at: f64,
}

impl From<GameSessionDto> for SessionCreated {
    fn from(dto: GameSessionDto) -> Self {
        Self {
            session_id: dto.session_id,
            total_questions: dto.total_questions,
            started_at_epoch_seconds: dto.started_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct OptionDto {
    song_id: i64,
    name: String,
}

#[derive(Debug, Deserialize)]
struct QuestionDto {
    song_id: i64,
    preview_url: String,
    blurred_cover_url: String,
    #[serde(default)]
    clear_cover_url: String,
    correct_option_index: usize,
    options: Vec<OptionDto>,
    #[serde(default = "default_time_limit")]
    time_limit: u32,
    #[serde(default)]
    song_color: String,
    #[serde(default)]
    artists: String,
}

impl From<QuestionDto> for Question {
    fn from(dto: QuestionDto) -> Self {
        Self {
            song_id: dto.song_id,
            audio_url: dto.preview_url,
            blurred_cover_url: dto.blurred_cover_url,
            clear_cover_url: dto.clear_cover_url,
            accent_color: dto.song_color,
            artists: dto.artists,
            options: dto
                .options
                .into_iter()
                .map(|o| AnswerOption {
                    id: o.song_id,
                    label: o.name,
                })
                .collect(),
            correct_option_index: dto.correct_option_index,
            time_limit_seconds: dto.time_limit,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct GameResponseDto {
    current_question: usize,
    total_questions: usize,
    question: QuestionDto,
    score: u32,
}

impl From<GameResponseDto> for GameStateResponse {
    fn from(dto: GameResponseDto) -> Self {
        Self {
            current_index: dto.current_question,
            total_questions: dto.total_questions,
            question: dto.question.into(),
            score: dto.score,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct AnswerBody {
    session_id: SessionId,
    question_index: usize,
    selected_option_index: i64,
}

impl From<&AnswerRequest> for AnswerBody {
    fn from(request: &AnswerRequest) -> Self {
        Self {
            session_id: request.session_id,
            question_index: request.question_index,
            selected_option_index: request.choice.wire_index(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnswerResponseDto {
    correct: bool,
    correct_option_index: usize,
    score: u32,
    #[serde(default)]
    next_question_index: Option<usize>,
    #[serde(default)]
    game_complete: bool,
    #[serde(default)]
    points_earned: u32,
}

impl From<AnswerResponseDto> for AnswerResponse {
    fn from(dto: AnswerResponseDto) -> Self {
        Self {
            correct: dto.correct,
            correct_option_index: dto.correct_option_index,
            score: dto.score,
            points_earned: dto.points_earned,
            next_question_index: dto.next_question_index,
            game_complete: dto.game_complete,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummaryDto {
    session_id: SessionId,
    score: u32,
    total_questions: usize,
    accuracy: f64,
}

impl From<SummaryDto> for RemoteSummary {
    fn from(dto: SummaryDto) -> Self {
        Self {
            session_id: dto.session_id,
            score: dto.score,
            total_questions: dto.total_questions,
            accuracy: dto.accuracy,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlaylistDto {
    id: String,
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    genres: Option<Vec<String>>,
    #[serde(default)]
    start_year: Option<i32>,
    #[serde(default)]
    end_year: Option<i32>,
    #[serde(default)]
    cover_image: Option<String>,
}

impl From<PlaylistDto> for Playlist {
    fn from(dto: PlaylistDto) -> Self {
        Self {
            id: dto.id,
            name: dto.name,
            description: dto.description,
            genres: dto.genres,
            start_year: dto.start_year,
            end_year: dto.end_year,
            cover_image: dto.cover_image,
        }
    }
}

/// Error body of the service: `{"detail": ...}`. Validation failures carry a
/// list instead of a string.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    detail: serde_json::Value,
}

impl ErrorBody {
    pub(crate) fn into_message(self) -> String {
        match self.detail {
            serde_json::Value::String(message) => message,
            other => other.to_string(),
        }
    }
}
