//! The daily run: fetch → fallback decision → format → deliver.
//!
//! 1. Delivery senders are built first, so missing delivery credentials
//!    fail the run before any network call.
//! 2. The news fetch never fails; an empty result triggers the fallback
//!    overview, whose failure is logged and dropped.
//! 3. The digest is rendered per channel and delivered in the configured
//!    order. The first delivery error aborts the run.

use crate::api::{AskAsync, ChatCompletionClient, generate_overview};
use crate::cli::Channel;
use crate::config::AppConfig;
use crate::delivery::email::EmailSender;
use crate::delivery::telegram::TelegramSender;
use crate::error::{ConfigError, DigestError};
use crate::models::Digest;
use crate::outputs::{OutputMode, render_email, render_telegram};
use crate::sources::worldnews::NewsClient;
use chrono::{Local, NaiveDate};
use tracing::{info, instrument, warn};

/// What a completed run did, for the final log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub digest: &'static str,
    pub articles: usize,
    pub delivered: Vec<Channel>,
}

/// Run the digest for today's local date with the configured chat API.
pub async fn run(config: &AppConfig) -> Result<RunSummary, DigestError> {
    let chat = ChatCompletionClient::new(&config.chat);
    run_with(config, Local::now().date_naive(), &chat).await
}

/// Run the digest for `date`, asking `chat` for a fallback overview when
/// no articles are fetched.
#[instrument(level = "info", skip_all, fields(%date, channels = ?config.channels))]
pub async fn run_with<A: AskAsync>(
    config: &AppConfig,
    date: NaiveDate,
    chat: &A,
) -> Result<RunSummary, DigestError> {
    let telegram = if config.channels.contains(&Channel::Telegram) {
        Some(TelegramSender::new(&config.telegram)?)
    } else {
        None
    };
    let email = if config.channels.contains(&Channel::Email) {
        let smtp = config
            .smtp
            .as_ref()
            .ok_or(ConfigError::Missing("SMTP_USERNAME"))?;
        Some(EmailSender::new(smtp)?)
    } else {
        None
    };

    let news = NewsClient::new(&config.news).map_err(DigestError::Client)?;
    let articles = news.fetch_top_news(config.limit).await;
    let article_count = articles.len();

    let fallback = if articles.is_empty() {
        info!("No articles fetched; attempting fallback overview");
        match generate_overview(chat).await {
            Ok(overview) => Some(overview),
            Err(e) => {
                warn!(error = %e, "Fallback overview unavailable; sending the no-news notice");
                None
            }
        }
    } else {
        None
    };

    let digest = Digest::from_parts(articles, fallback);
    info!(kind = digest.kind(), articles = article_count, "Digest assembled");

    let mut delivered = Vec::with_capacity(config.channels.len());
    for channel in &config.channels {
        match channel {
            Channel::Telegram => {
                if let Some(sender) = &telegram {
                    let format = config.telegram.format;
                    let text = render_telegram(&digest, date, format);
                    sender
                        .send(&text, OutputMode::from(format).telegram_parse_mode())
                        .await?;
                }
            }
            Channel::Email => {
                if let Some(sender) = &email {
                    sender.send(&render_email(&digest, date)).await?;
                }
            }
        }
        delivered.push(*channel);
    }

    Ok(RunSummary {
        digest: digest.kind(),
        articles: article_count,
        delivered,
    })
}
