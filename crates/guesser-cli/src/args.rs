//! Command-line arguments.

use clap::{Parser, Subcommand};

/// Name-that-song quiz in the terminal. Settings come from `GUESSER_*`
/// environment variables.
#[derive(Debug, Parser)]
#[command(name = "guesser", version, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Cli {
    /// The requested command; playing is the default.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Play)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Play a game
    Play,
    /// List the genres and playlists the service offers
    Catalog,
}
