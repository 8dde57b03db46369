//! CLI definition for the terminal log stream consumer.

use clap::Parser;
use livetail_core::LogLevel;

/// Command-line interface for following a live log stream session.
#[derive(Parser)]
#[command(name = "livetail")]
#[command(about = "Follow a live log stream session in the terminal")]
#[command(version)]
pub struct Cli {
    /// Session identifier of the stream to follow
    pub session_id: String,

    /// Base URL of the log stream backend
    /// (falls back to LIVETAIL_BASE_URL, then the local default)
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Show only these levels (repeatable); omit for all levels
    #[arg(short = 'l', long = "level")]
    pub levels: Vec<LogLevel>,

    /// Reconnect attempts after the stream drops (exponential backoff)
    #[arg(long = "retries", default_value_t = 0)]
    pub retries: u8,

    /// Snapshot poll interval in milliseconds
    #[arg(long = "interval-ms", default_value_t = 200)]
    pub interval_ms: u64,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}
