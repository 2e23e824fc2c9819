//! End-of-game summary derived from the local answer history.

use serde::Serialize;

use crate::answer::AnsweredRecord;

/// Totals shown once a game is over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameSummary {
    pub score: u32,
    pub total_questions: usize,
    pub correct_answers: usize,
    /// Percentage of correct answers, `0` for an empty history.
    pub accuracy: f64,
}

impl GameSummary {
    /// Derives the summary from what the player actually answered.
    ///
    /// `total_questions` is the history length, not the count the service
    /// declared, so an early-terminated game reports what was played.
    #[must_use]
    pub fn from_history(score: u32, history: &[AnsweredRecord]) -> Self {
        let total_questions = history.len();
        let correct_answers = history.iter().filter(|r| r.correct).count();
        #[allow(clippy::cast_precision_loss)]
        let accuracy = if total_questions == 0 {
            0.0
        } else {
            correct_answers as f64 / total_questions as f64 * 100.0
        };
        Self {
            score,
            total_questions,
            correct_answers,
            accuracy,
        }
    }

    /// Rank earned for this accuracy.
    #[must_use]
    pub fn rank(&self) -> Rank {
        Rank::for_accuracy(self.accuracy)
    }

    /// Encouragement line for this accuracy.
    #[must_use]
    pub fn message(&self) -> &'static str {
        let accuracy = finite_or_zero(self.accuracy);
        if accuracy >= 80.0 {
            "Amazing! You're a music genius!"
        } else if accuracy >= 60.0 {
            "Great job! You know your music well!"
        } else if accuracy >= 40.0 {
            "Not bad! Keep practicing to improve your score."
        } else {
            "You might want to listen to more music!"
        }
    }
}

/// Player rank tiers by accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rank {
    MusicMaestro,
    MelodyMaster,
    RhythmRookie,
    BeatBeginner,
    TuneTrainee,
}

impl Rank {
    /// Tier for an accuracy percentage; non-finite values count as zero.
    #[must_use]
    pub fn for_accuracy(accuracy: f64) -> Self {
        match finite_or_zero(accuracy) {
            a if a >= 90.0 => Self::MusicMaestro,
            a if a >= 70.0 => Self::MelodyMaster,
            a if a >= 50.0 => Self::RhythmRookie,
            a if a >= 30.0 => Self::BeatBeginner,
            _ => Self::TuneTrainee,
        }
    }

    /// Display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::MusicMaestro => "Music Maestro",
            Self::MelodyMaster => "Melody Master",
            Self::RhythmRookie => "Rhythm Rookie",
            Self::BeatBeginner => "Beat Beginner",
            Self::TuneTrainee => "Tune Trainee",
        }
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}
