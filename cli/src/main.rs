//! Command-line front end: feeds JSON-encoded game events from stdin into
//! the match controller until the match concludes or the process is
//! interrupted.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use sparrow_core::config::{self, AppConfig};
use sparrow_core::{EventBus, GameSignal, MatchController, StrengthClient, TrackedParticipant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::filter::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Game-event to strength-hub bridge", long_about = None)]
struct Args {
    /// Account id of the participant to track.
    #[arg(long)]
    account_id: u64,

    /// Nickname of the participant to track.
    #[arg(long)]
    nickname: String,

    /// Seat the participant occupies this match (0-based).
    #[arg(long)]
    seat: u8,

    /// Override the configured hub base URL.
    #[arg(long)]
    hub_host: Option<String>,

    /// Override the configured hub client id ("all" broadcasts).
    #[arg(long)]
    client_id: Option<String>,

    /// Override the configured binding-table path.
    #[arg(long)]
    players: Option<PathBuf>,
}

/// Initialize logging, writing to SPARROW_LOG_PATH if set, otherwise stderr.
fn init_logging() {
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .from_env_lossy();

    if let Ok(path) = std::env::var("SPARROW_LOG_PATH") {
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging();

    let args = Args::parse();

    let mut config = AppConfig::load();
    if let Some(host) = args.hub_host {
        config.hub_host = host;
    }
    if let Some(id) = args.client_id {
        config.client_id = id;
    }
    if let Some(path) = args.players {
        config.players_file = Some(path);
    }
    config.save();

    let players_path = config
        .players_path()
        .ok_or_else(|| eyre!("no config directory available for the binding table"))?;
    let table = config::load_players(&players_path)?;
    info!(path = %players_path.display(), players = table.len(), "binding table loaded");

    let port = Arc::new(StrengthClient::new(&config.hub_host, &config.client_id));
    let bus = EventBus::new(64);
    let participant = TrackedParticipant {
        account_id: args.account_id,
        nickname: args.nickname,
        seat: args.seat,
    };

    let controller = MatchController::start(&table, participant, port, &bus)?;
    info!(hub = %config.hub_host, client = %config.client_id, "controller started");

    let feed = tokio::spawn(feed_stdin(bus));

    tokio::select! {
        _ = controller.wait_closed() => {
            info!("match concluded, exiting");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted, tearing down");
            controller.teardown();
            controller.wait_closed().await;
        }
    }

    feed.abort();
    Ok(())
}

/// Publish one event per stdin line until the feed closes.
async fn feed_stdin(bus: EventBus) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<GameSignal>(line) {
                    Ok(signal) => bus.publish(signal),
                    Err(e) => warn!(error = %e, "unparseable event line"),
                }
            }
            Ok(None) => {
                info!("event feed closed");
                break;
            }
            Err(e) => {
                error!(error = %e, "event feed read failed");
                break;
            }
        }
    }
}
