//! Genre and playlist listing, for picking `GUESSER_GENRES` and
//! `GUESSER_PLAYLIST_ID` values.

use std::fmt::Write as _;

use guesser_client::HttpSessionClient;
use guesser_core::catalog::Playlist;

use crate::error::AppError;

/// Catalog listing as printed by `guesser catalog`.
#[must_use]
pub fn render_catalog(genres: &[String], playlists: &[Playlist]) -> String {
    let mut text = String::from("Genres (GUESSER_GENRES, comma-separated):\n");
    if genres.is_empty() {
        text.push_str("  (none available)\n");
    } else {
        let _ = writeln!(text, "  {}", genres.join(", "));
    }

    text.push_str("Playlists (GUESSER_PLAYLIST_ID):");
    if playlists.is_empty() {
        text.push_str("\n  (none available)");
    }
    for playlist in playlists {
        let _ = write!(text, "\n  {}  {}", playlist.id, playlist.name);
        if let Some(span) = playlist.year_span() {
            let _ = write!(text, " [{span}]");
        }
        if !playlist.description.is_empty() {
            let _ = write!(text, ": {}", playlist.description);
        }
    }
    text
}

/// Fetches and prints the catalog.
///
/// # Errors
///
/// Returns `AppError::Client` if either listing fails.
pub async fn print_catalog(client: &HttpSessionClient) -> Result<(), AppError> {
    let genres = client.genres().await?;
    let playlists = client.playlists().await?;
    tracing::info!(
        genres = genres.len(),
        playlists = playlists.len(),
        "catalog fetched"
    );
    println!("{}", render_catalog(&genres, &playlists));
    Ok(())
}
