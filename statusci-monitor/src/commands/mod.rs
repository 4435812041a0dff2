//! Commands module
//!
//! Defines the CLI commands and their handlers.

mod check;
mod watch;

use std::sync::Arc;

use anyhow::Result;
use clap::Subcommand;

use crate::config::MonitorConfig;
use crate::provider::{HttpClients, JenkinsAdapter, TravisAdapter};
use crate::render::RenderOptions;
use crate::service::{StatusResolver, SystemClock};
use crate::source::ProviderKind;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Poll every configured source and redraw the tree on change
    Watch,
    /// Resolve every configured source once and print the result
    Check {
        /// Print the status trees as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Routes the command to its handler
pub async fn handle_command(command: Commands, config: MonitorConfig) -> Result<()> {
    match command {
        Commands::Watch => watch::run(config).await,
        Commands::Check { json } => check::run(config, json).await,
    }
}

/// Builds a resolver with every provider adapter registered
fn build_resolver(config: &MonitorConfig) -> Result<Arc<StatusResolver>> {
    let context = config.build_context()?;
    let clients = HttpClients::new(config.request_timeout())?;

    let resolver = StatusResolver::new(Arc::new(context), Arc::new(SystemClock))
        .with_adapter(ProviderKind::Jenkins, Arc::new(JenkinsAdapter::new(clients.clone())))
        .with_adapter(ProviderKind::Travis, Arc::new(TravisAdapter::new(clients)));

    Ok(Arc::new(resolver))
}

fn render_options(config: &MonitorConfig, resolver: &StatusResolver) -> RenderOptions {
    RenderOptions {
        now_millis: resolver.now_millis(),
        age_interval_millis: config.age_interval_millis(),
    }
}
