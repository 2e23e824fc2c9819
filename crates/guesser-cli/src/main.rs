//! Music Guesser terminal entry point.

use std::error::Error;
use std::sync::Arc;

use clap::Parser;
use guesser_cli::args::{Cli, Command};
use guesser_cli::catalog;
use guesser_cli::config::CliConfig;
use guesser_cli::device::HeadlessAudioDevice;
use guesser_cli::terminal;
use guesser_client::HttpSessionClient;
use guesser_core::clock::SystemClock;
use guesser_session::{GameOrchestrator, OrchestratorConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so they never interleave with the game on stdout.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = CliConfig::from_env()?;
    tracing::info!(api_url = %config.api_url, "Starting Music Guesser");

    let client = HttpSessionClient::new(config.api_url.clone())?;
    if cli.command() == Command::Catalog {
        catalog::print_catalog(&client).await?;
        return Ok(());
    }

    let device = HeadlessAudioDevice::new(config.preview_length())?;
    let game = GameOrchestrator::new(
        Arc::new(client),
        Arc::new(device),
        Arc::new(SystemClock),
        OrchestratorConfig {
            default_volume: config.volume,
            ..OrchestratorConfig::default()
        },
    )?;

    terminal::run(game, config.settings).await?;

    tracing::info!("Goodbye");
    Ok(())
}
