//! Questions as presented to the player.

use std::time::Duration;

use serde::Serialize;

/// Accent color used when the service does not provide one.
pub const DEFAULT_ACCENT_COLOR: &str = "4f46e5";

/// One candidate answer. Its position in [`Question::options`] is the only
/// thing that can map to "correct".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerOption {
    /// Song identifier of the candidate.
    pub id: i64,
    /// Title shown to the player.
    pub label: String,
}

/// A timed question: one audio clip and its candidate answers.
///
/// Immutable once received from the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    /// Identifier of the song being played.
    pub song_id: i64,
    /// Preview clip location.
    pub audio_url: String,
    /// Cover art shown while the question is open.
    pub blurred_cover_url: String,
    /// Cover art revealed after the answer.
    pub clear_cover_url: String,
    /// Hex color (without `#`) used for theming; may be empty.
    pub accent_color: String,
    /// Performing artists of the correct song.
    pub artists: String,
    /// Candidate answers in display order.
    pub options: Vec<AnswerOption>,
    /// Index of the correct candidate.
    pub correct_option_index: usize,
    /// Seconds the player has to answer.
    pub time_limit_seconds: u32,
}

impl Question {
    /// Returns the option at `index`, if any.
    #[must_use]
    pub fn option(&self, index: usize) -> Option<&AnswerOption> {
        self.options.get(index)
    }

    /// Returns the correct option as declared by the question itself.
    #[must_use]
    pub fn correct_option(&self) -> Option<&AnswerOption> {
        self.options.get(self.correct_option_index)
    }

    /// Time allowed to answer.
    #[must_use]
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(u64::from(self.time_limit_seconds))
    }

    /// Accent color, falling back to [`DEFAULT_ACCENT_COLOR`].
    #[must_use]
    pub fn accent_color_or_default(&self) -> &str {
        if self.accent_color.is_empty() {
            DEFAULT_ACCENT_COLOR
        } else {
            &self.accent_color
        }
    }
}
