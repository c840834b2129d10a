use std::path::PathBuf;

use clap::Parser;

mod cli;
mod display;
mod error;
mod models;
mod monitor;
mod render;
mod services;
mod status;
#[cfg(test)]
mod tests;
mod utils;

use cli::{Cli, Commands, build_env_filter};
use error::MonitorResult;
use render::console::ConsoleRenderer;
use render::make_renderer;
use services::octoprint::OctoprintClient;
use utils::config::{default_config_path, load_config};
use utils::tui::run_tui;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(cli.verbose))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = dispatch(cli).await {
        tracing::error!(error = %e, "Exiting");
        std::process::exit(1);
    }
}

async fn dispatch(cli: Cli) -> MonitorResult<()> {
    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_monitor(config_path).await,
        Commands::Check => check_once(config_path).await,
        Commands::Config => run_tui(config_path),
    }
}

/// Load config, connect, and poll until killed
async fn run_monitor(config_path: PathBuf) -> MonitorResult<()> {
    let config = load_config(&config_path)?;
    let client = OctoprintClient::new(&config)?;
    let renderer = make_renderer(&config)?;

    monitor::run(client, renderer, config.refresh_interval()).await
}

/// Fetch and print the state a single time on the console
async fn check_once(config_path: PathBuf) -> MonitorResult<()> {
    let config = load_config(&config_path)?;
    let client = OctoprintClient::new(&config)?;
    let mut console = ConsoleRenderer::new();

    monitor::run_once(&client, &mut console).await
}
