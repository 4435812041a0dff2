//! statusci
//!
//! Watches build statuses of CI servers and renders them as a tree.
//!
//! Architecture:
//! - Configuration: TOML file plus environment overrides
//! - Providers: one adapter per CI kind, fetching and classifying responses
//! - Services: resolution of a source into a normalized status
//! - Scheduler: one cancellable polling task per source and child

mod commands;
mod config;
mod error;
mod provider;
mod render;
mod scheduler;
mod service;
mod source;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{Commands, handle_command};
use crate::config::MonitorConfig;

#[derive(Parser)]
#[command(name = "statusci")]
#[command(about = "CI build status monitor", long_about = None)]
struct Cli {
    /// Path of the configuration file
    #[arg(long, env = "STATUSCI_CONFIG", default_value = "statusci.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr, stdout carries the rendered statuses
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "statusci=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = MonitorConfig::load(&cli.config)?;
    config.validate()?;
    info!(
        "Loaded configuration: {} server(s), {} source(s), refresh every {}s",
        config.servers.len(),
        config.sources.len(),
        config.settings.refresh_interval_secs
    );

    handle_command(cli.command, config).await
}
