//! Canned questions and timestamps.

use chrono::{DateTime, TimeZone, Utc};
use guesser_core::question::{AnswerOption, Question};

/// Timestamp used across tests.
///
/// # Panics
///
/// Never in practice; the date is a valid constant.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
}

/// A 30-second question for song `song_id` with `option_count` options, the
/// correct one at `correct_index`.
#[must_use]
pub fn sample_question(song_id: i64, correct_index: usize, option_count: usize) -> Question {
    let options = (0..option_count)
        .map(|i| {
            let id = if i == correct_index {
                song_id
            } else {
                song_id * 100 + i64::try_from(i).unwrap_or_default()
            };
            AnswerOption {
                id,
                label: format!("Song {id}"),
            }
        })
        .collect();
    Question {
        song_id,
        audio_url: format!("https://cdn.example/preview/{song_id}.mp3"),
        blurred_cover_url: format!("https://cdn.example/cover/{song_id}-medium.jpg"),
        clear_cover_url: format!("https://cdn.example/cover/{song_id}-big.jpg"),
        accent_color: String::new(),
        artists: format!("Artist {song_id}"),
        options,
        correct_option_index: correct_index,
        time_limit_seconds: 30,
    }
}

/// `count` four-option questions whose correct answers rotate through the
/// option indexes.
#[must_use]
pub fn sample_questions(count: usize) -> Vec<Question> {
    (0..count)
        .map(|i| sample_question(i64::try_from(i).unwrap_or_default() + 1, i % 4, 4))
        .collect()
}
