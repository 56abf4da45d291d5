//! # EU News Digest
//!
//! Fetches the day's top European news from a news API, renders it as a
//! digest, and delivers it over Telegram and/or email. When the news API
//! yields nothing, a chat-completion model writes a short overview instead.
//!
//! ## Usage
//!
//! ```sh
//! NEWS_API_KEY=... TELEGRAM_BOT_TOKEN=... TELEGRAM_CHAT_ID=... eu_news_digest
//! eu_news_digest --channel telegram,email
//! eu_news_digest chat-id
//! ```
//!
//! ## Architecture
//!
//! One pass per invocation, meant to be triggered by an external scheduler:
//! 1. **Fetch**: newest English-language European articles ([`sources`])
//! 2. **Fallback**: AI overview when nothing was fetched ([`api`])
//! 3. **Format**: plain text, Telegram HTML, email HTML ([`outputs`])
//! 4. **Deliver**: Telegram Bot API and SMTP ([`delivery`])
//!
//! Exit status is 0 when every configured channel received the digest, 1
//! otherwise.

use clap::Parser;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod chat_id;
mod cli;
mod config;
mod delivery;
mod error;
mod models;
mod outputs;
mod pipeline;
mod sources;
mod utils;

use cli::{Cli, Command};
use config::{AppConfig, TelegramConfig};

#[tokio::main]
async fn main() -> ExitCode {
    // Local development: pick up a .env file if there is one.
    let dotenv = dotenvy::dotenv();

    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    if let Ok(path) = dotenv {
        debug!(path = %path.display(), "Loaded .env file");
    }

    let args = Cli::parse();
    match args.command {
        Some(Command::ChatId) => discover_chat_id(&args).await,
        Some(Command::Send) | None => send_digest(&args).await,
    }
}

async fn send_digest(args: &Cli) -> ExitCode {
    let start_time = Instant::now();
    info!("Starting daily Europe news digest");

    let config = match AppConfig::from_cli(args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };
    debug!(?config, "Resolved configuration");

    match pipeline::run(&config).await {
        Ok(summary) => {
            let elapsed = start_time.elapsed();
            info!(
                digest = summary.digest,
                articles = summary.articles,
                channels = ?summary.delivered,
                chat_id = config.telegram.chat_id.as_deref().unwrap_or("-"),
                ?elapsed,
                "Daily news digest delivered"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, elapsed = ?start_time.elapsed(), "Failed to send daily news");
            ExitCode::FAILURE
        }
    }
}

async fn discover_chat_id(args: &Cli) -> ExitCode {
    let config = match TelegramConfig::from_cli(args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    match chat_id::discover(&config).await {
        Ok(discovery) => {
            println!("{}", chat_id::report(&discovery));
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(error = %e, "Could not look up chats; check the bot token");
            ExitCode::FAILURE
        }
    }
}
