use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use routecast::bot::Bot;
use routecast::config::RouteCastConfig;
use routecast::telegram::TelegramClient;
use routecast::{ConversationMachine, logging, weather};

/// Telegram bot that forecasts the weather along a travel route
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// Path to a TOML config file (default: <config dir>/routecast/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level override (error, warn, info, debug, trace)
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = RouteCastConfig::load_from_path(cli.config)
        .with_context(|| "Failed to load configuration")?;

    logging::init(&config.logging, cli.log_level.as_deref())?;
    info!("RouteCast v{} starting", routecast::VERSION);

    let provider = weather::build_provider(&config)?;
    let client = TelegramClient::new(&config.telegram)
        .with_context(|| "Failed to create Telegram client")?;

    let session_idle_ttl =
        Duration::from_secs(u64::from(config.telegram.session_idle_hours) * 60 * 60);

    Bot::new(client, ConversationMachine::new(provider), session_idle_ttl)
        .run()
        .await
}
