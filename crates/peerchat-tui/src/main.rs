//! peerchat terminal client entry point.

use std::{path::PathBuf, time::Duration};

use clap::Parser;
use peerchat_app::SessionConfig;
use peerchat_tui::{Runtime, RuntimeConfig, logging};

/// peerchat terminal client
#[derive(Parser, Debug)]
#[command(name = "peerchat")]
#[command(about = "Terminal chat client for peer-to-peer rooms")]
#[command(version)]
struct Args {
    /// Display name (defaults to a random `peer-xxxx`)
    #[arg(short, long)]
    username: Option<String>,

    /// Room to join at startup
    #[arg(short, long, default_value = "lobby")]
    room: String,

    /// Number of simulated peers chatting in the starting room
    #[arg(long, default_value = "2")]
    peers: usize,

    /// Peer list refresh interval in milliseconds
    #[arg(long, default_value = "1000")]
    tick_ms: u64,

    /// File to write logs to
    #[arg(long, default_value = "peerchat.log")]
    log_file: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn random_username() -> String {
    format!("peer-{:04x}", rand::random::<u16>())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    logging::init(&args.log_file, &args.log_level)?;

    let config = RuntimeConfig {
        username: args.username.unwrap_or_else(random_username),
        room: args.room,
        simulated_peers: args.peers,
        session: SessionConfig {
            tick_interval: Duration::from_millis(args.tick_ms),
            ..SessionConfig::default()
        },
    };

    tracing::info!(user = %config.username, room = %config.room, "peerchat starting");

    Ok(Runtime::new(config).run().await?)
}
