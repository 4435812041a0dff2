//! One-shot resolution of every configured source

use anyhow::{Context, Result};
use colored::*;
use tracing::info;

use super::{build_resolver, render_options};
use crate::config::MonitorConfig;
use crate::render::render_tree;
use crate::scheduler::resolve_tree;

pub async fn run(config: MonitorConfig, json: bool) -> Result<()> {
    let resolver = build_resolver(&config)?;

    info!("Resolving {} source(s)", config.sources.len());
    let mut statuses = Vec::with_capacity(config.sources.len());
    for source in &config.sources {
        statuses.push(resolve_tree(&resolver, source.clone()).await);
    }

    if json {
        let output = serde_json::to_string_pretty(&statuses).context("Failed to serialize statuses")?;
        println!("{}", output);
        return Ok(());
    }

    if statuses.is_empty() {
        println!("{}", "No sources configured.".yellow());
        return Ok(());
    }

    let options = render_options(&config, &resolver);
    for status in &statuses {
        print!("{}", render_tree(status, &options));
    }

    Ok(())
}
