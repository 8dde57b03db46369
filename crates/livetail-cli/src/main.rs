//! livetail entry point — the composition root.
//!
//! Wires the SSE connector into a stream controller, then polls the
//! controller's snapshot and prints newly arrived entries as plain
//! lines. Ctrl-C stops the stream and exits.

mod parser;

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use livetail_core::{LogLevel, LogStreamController, ReconnectPolicy, StreamOptions};
use livetail_sse::{DEFAULT_BASE_URL, SseConfig, SseConnector};

use parser::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logging on stderr; stdout carries the log lines
    let default_filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let base_url = cli
        .base_url
        .or_else(|| std::env::var("LIVETAIL_BASE_URL").ok())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    let connector = Arc::new(SseConnector::new(&SseConfig::new(base_url))?);

    let options = StreamOptions {
        reconnect: if cli.retries > 0 {
            ReconnectPolicy::with_backoff(cli.retries, Duration::from_millis(500))
        } else {
            ReconnectPolicy::disabled()
        },
        ..StreamOptions::default()
    };
    let controller = LogStreamController::with_options(cli.session_id, connector, options);
    controller.start().await;

    let selection: HashSet<LogLevel> = cli.levels.iter().copied().collect();
    let mut printed: HashSet<String> = HashSet::new();
    let mut ticker = tokio::time::interval(Duration::from_millis(cli.interval_ms.max(10)));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted; stopping stream");
                controller.stop().await;
                break;
            }
            _ = ticker.tick() => {
                let snapshot = controller.snapshot();
                for entry in snapshot.visible_entries(&selection) {
                    if printed.insert(entry.id.clone()) {
                        println!("{} [{}] {}", entry.timestamp, entry.level, entry.message);
                    }
                }

                // Forget ids that were evicted from the history
                let live: HashSet<&String> = snapshot.entries.iter().map(|e| &e.id).collect();
                printed.retain(|id| live.contains(id));

                if !snapshot.is_streaming {
                    info!("stream ended");
                    break;
                }
            }
        }
    }

    Ok(())
}
