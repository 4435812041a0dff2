//! Continuous polling with live redraw

use anyhow::Result;
use colored::*;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{build_resolver, render_options};
use crate::config::MonitorConfig;
use crate::render::render_tree;
use crate::scheduler::{StatusPoller, WatchHandle};
use crate::service::StatusResolver;

/// ANSI clear screen and cursor home
const CLEAR: &str = "\x1B[2J\x1B[H";

pub async fn run(config: MonitorConfig) -> Result<()> {
    if config.sources.is_empty() {
        println!("{}", "No sources configured.".yellow());
        return Ok(());
    }

    let resolver = build_resolver(&config)?;
    let poller = StatusPoller::new(resolver.clone(), config.poll_settings());
    let mut revisions = poller.revisions();

    let token = CancellationToken::new();
    let handles = poller.watch_all(config.sources.clone(), &token);
    info!("Watching {} source(s)", handles.len());

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        draw(&handles, &config, &resolver);

        tokio::select! {
            _ = &mut shutdown => {
                info!("Interrupted, stopping watches");
                break;
            }
            changed = revisions.changed() => {
                if changed.is_err() {
                    warn!("Poller stopped unexpectedly");
                    break;
                }
            }
        }
    }

    for handle in &handles {
        debug!("Cancelling {}", handle.source());
        handle.cancel();
    }
    token.cancel();
    Ok(())
}

fn draw(handles: &[WatchHandle], config: &MonitorConfig, resolver: &StatusResolver) {
    let options = render_options(config, resolver);
    let mut frame = String::from(CLEAR);
    for handle in handles {
        frame.push_str(&render_tree(&handle.snapshot(), &options));
    }
    print!("{}", frame);
}
