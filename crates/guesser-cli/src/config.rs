//! Environment configuration.

use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use guesser_core::session::GameSettings;

use crate::error::AppError;

const DEFAULT_SONG_COUNT: u32 = 10;
const DEFAULT_OPTION_COUNT: u32 = 4;
const DEFAULT_PREVIEW_SECONDS: f64 = 30.0;
const DEFAULT_VOLUME: f32 = 0.7;

/// Settings read from `GUESSER_*` environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct CliConfig {
    /// Game service root, e.g. `http://localhost:8000/api`.
    pub api_url: String,
    pub settings: GameSettings,
    /// Length reported for every preview clip.
    pub preview_seconds: f64,
    pub volume: f32,
}

impl CliConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `GUESSER_API_URL` is missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if `GUESSER_API_URL` is missing or any
    /// variable fails to parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_url = var("GUESSER_API_URL").ok_or_else(|| {
            AppError::Config("GUESSER_API_URL environment variable must be set".to_owned())
        })?;

        let song_count = parse(
            var("GUESSER_SONG_COUNT"),
            "GUESSER_SONG_COUNT",
            DEFAULT_SONG_COUNT,
        )?;
        if song_count == 0 {
            return Err(AppError::Config("GUESSER_SONG_COUNT must be at least 1".to_owned()));
        }
        let option_count = parse(
            var("GUESSER_OPTION_COUNT"),
            "GUESSER_OPTION_COUNT",
            DEFAULT_OPTION_COUNT,
        )?;
        if option_count < 2 {
            return Err(AppError::Config("GUESSER_OPTION_COUNT must be at least 2".to_owned()));
        }

        let genres = var("GUESSER_GENRES")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|genre| !genre.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        let start_year = parse_optional(var("GUESSER_START_YEAR"), "GUESSER_START_YEAR")?;
        let end_year = parse_optional(var("GUESSER_END_YEAR"), "GUESSER_END_YEAR")?;
        if let (Some(start), Some(end)) = (start_year, end_year) {
            if start > end {
                return Err(AppError::Config(format!(
                    "GUESSER_START_YEAR ({start}) is after GUESSER_END_YEAR ({end})"
                )));
            }
        }

        let mut settings = GameSettings::new(song_count, option_count)
            .with_genres(genres)
            .with_years(start_year, end_year);
        if let Some(playlist_id) = var("GUESSER_PLAYLIST_ID") {
            settings = settings.with_playlist(playlist_id);
        }

        let preview_seconds = parse(
            var("GUESSER_PREVIEW_SECONDS"),
            "GUESSER_PREVIEW_SECONDS",
            DEFAULT_PREVIEW_SECONDS,
        )?;
        if !preview_seconds.is_finite() || preview_seconds <= 0.0 {
            return Err(AppError::Config(
                "GUESSER_PREVIEW_SECONDS must be a positive number".to_owned(),
            ));
        }
        let volume = parse(var("GUESSER_VOLUME"), "GUESSER_VOLUME", DEFAULT_VOLUME)?;
        if !(0.0..=1.0).contains(&volume) {
            return Err(AppError::Config("GUESSER_VOLUME must be between 0 and 1".to_owned()));
        }

        Ok(Self {
            api_url,
            settings,
            preview_seconds,
            volume,
        })
    }

    /// Clip length as a duration.
    #[must_use]
    pub fn preview_length(&self) -> Duration {
        Duration::from_secs_f64(self.preview_seconds)
    }
}

fn parse<T>(value: Option<String>, name: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    parse_optional(value, name).map(|parsed| parsed.unwrap_or(default))
}

fn parse_optional<T>(value: Option<String>, name: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .map(|raw| {
            raw.parse()
                .map_err(|e| AppError::Config(format!("{name} must be valid: {e}")))
        })
        .transpose()
}
