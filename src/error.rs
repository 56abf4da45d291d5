//! Error types for every fallible boundary of the pipeline.
//!
//! Errors fall into three groups:
//! - **Degrade-to-empty**: [`NewsError`] and [`ChatError`] never abort a run.
//!   The fetcher turns a `NewsError` into an empty list; the orchestrator turns
//!   a `ChatError` into "no fallback text".
//! - **Fail-fast configuration**: [`ConfigError`] and the `Missing*` variants of
//!   [`TelegramError`] are raised before any network call.
//! - **Hard delivery failures**: the remaining [`TelegramError`] variants and
//!   [`EmailError`] propagate to the orchestrator as a [`DigestError`].

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required setting {0} is not set (pass the flag or set the environment variable)")]
    Missing(&'static str),

    #[error("{name} is not a valid http(s) base URL: {value}")]
    InvalidUrl { name: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum NewsError {
    #[error("news request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("news response could not be decoded: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Failures of the fallback overview generator.
///
/// The `Display` text of each variant is the fixed, human-readable message
/// reported for that failure; the underlying cause is kept as the source.
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Unable to generate news overview - no API key available.")]
    MissingApiKey,

    #[error("Unable to generate news overview due to API error.")]
    Request(#[source] reqwest::Error),

    #[error("Unable to generate news overview due to parsing error.")]
    Parse(#[source] serde_json::Error),

    #[error("Unable to generate news overview at this time.")]
    EmptyCompletion,

    #[error("Unable to generate news overview due to unexpected error.")]
    Unexpected(String),
}

#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Telegram bot token is not configured")]
    MissingToken,

    #[error("Telegram chat id is not configured")]
    MissingChatId,

    #[error("Telegram request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Telegram response could not be decoded (HTTP {status}): {source}")]
    Decode {
        status: u16,
        #[source]
        source: serde_json::Error,
    },

    #[error("Telegram API error {}: {description}", code_label(.code))]
    Api {
        code: Option<i64>,
        description: String,
    },
}

fn code_label(code: &Option<i64>) -> String {
    code.map_or_else(|| "Unknown".to_string(), |c| c.to_string())
}

#[derive(Debug, Error)]
pub enum EmailError {
    #[error("invalid {field} address {value:?}: {source}")]
    Address {
        field: &'static str,
        value: String,
        #[source]
        source: lettre::address::AddressError,
    },

    #[error("failed to build email message: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// A failure that aborts the whole run.
#[derive(Debug, Error)]
pub enum DigestError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to set up HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error(transparent)]
    Telegram(#[from] TelegramError),

    #[error(transparent)]
    Email(#[from] EmailError),
}
