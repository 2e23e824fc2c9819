//! Song catalog listings offered by the service before a game starts.

use serde::Serialize;

/// A curated playlist the service can build a game from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub description: String,
    pub genres: Option<Vec<String>>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    pub cover_image: Option<String>,
}

impl Playlist {
    /// Year span as `"1980-1989"`, `"1980-"` or `"-1989"`, if any bound is set.
    #[must_use]
    pub fn year_span(&self) -> Option<String> {
        match (self.start_year, self.end_year) {
            (None, None) => None,
            (start, end) => Some(format!(
                "{}-{}",
                start.map(|y| y.to_string()).unwrap_or_default(),
                end.map(|y| y.to_string()).unwrap_or_default()
            )),
        }
    }
}
