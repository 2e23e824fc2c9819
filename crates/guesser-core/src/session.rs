//! Session identity, settings and the records exchanged with the service.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::question::Question;

/// Identifier the game service assigns to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub Uuid);

impl SessionId {
    /// Creates a random identifier.
    #[must_use]
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Parameters of a new game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSettings {
    /// Number of questions to play.
    pub song_count: u32,
    /// Number of candidate answers per question.
    pub option_count: u32,
    /// Restrict songs to these genres.
    pub genres: Option<Vec<String>>,
    /// Predefined playlist whose filters take precedence.
    pub playlist_id: Option<String>,
    /// Earliest release year.
    pub start_year: Option<i32>,
    /// Latest release year.
    pub end_year: Option<i32>,
}

impl GameSettings {
    /// Settings with the given counts and no filters.
    #[must_use]
    pub fn new(song_count: u32, option_count: u32) -> Self {
        Self {
            song_count,
            option_count,
            genres: None,
            playlist_id: None,
            start_year: None,
            end_year: None,
        }
    }

    /// Restricts songs to `genres`; an empty list clears the filter.
    #[must_use]
    pub fn with_genres(mut self, genres: Vec<String>) -> Self {
        self.genres = if genres.is_empty() { None } else { Some(genres) };
        self
    }

    /// Uses a predefined playlist.
    #[must_use]
    pub fn with_playlist(mut self, playlist_id: impl Into<String>) -> Self {
        self.playlist_id = Some(playlist_id.into());
        self
    }

    /// Restricts release years to the inclusive range.
    #[must_use]
    pub fn with_years(mut self, start_year: Option<i32>, end_year: Option<i32>) -> Self {
        self.start_year = start_year;
        self.end_year = end_year;
        self
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(5, 6)
    }
}

/// Response to a create-session request.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionCreated {
    pub session_id: SessionId,
    pub total_questions: usize,
    /// Fractional Unix timestamp; `0` until the session is started.
    pub started_at_epoch_seconds: f64,
}

/// Current question and score as reported by the service.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStateResponse {
    pub current_index: usize,
    pub total_questions: usize,
    pub question: Question,
    pub score: u32,
}

/// The service's own view of a finished game.
///
/// Kept for diagnostics only; the player-facing summary is derived from the
/// local answer history.
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteSummary {
    pub session_id: SessionId,
    pub score: u32,
    pub total_questions: usize,
    pub accuracy: f64,
}

/// The locally tracked state of one play-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Identifier assigned by the service.
    pub session_id: SessionId,
    /// Question count the service declared at creation.
    pub total_questions: usize,
    /// Index of the question currently displayed.
    pub current_index: usize,
    /// Latest authoritative score.
    pub score: u32,
    /// Number of questions answered correctly so far.
    pub correct_count: usize,
    /// When this client created the session.
    pub created_at: DateTime<Utc>,
    /// When the service started the session, if known.
    pub started_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Builds the session record from the service's creation response.
    #[must_use]
    pub fn from_created(created: &SessionCreated, created_at: DateTime<Utc>) -> Self {
        Self {
            session_id: created.session_id,
            total_questions: created.total_questions,
            current_index: 0,
            score: 0,
            correct_count: 0,
            created_at,
            started_at: crate::clock::from_epoch_seconds(created.started_at_epoch_seconds),
        }
    }
}
