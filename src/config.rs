//! Run configuration resolved once at startup.
//!
//! The parsed [`Cli`] is turned into an immutable [`AppConfig`] which is then
//! passed by reference into each component. Components never read the
//! environment themselves.

use crate::cli::{Channel, Cli, TelegramFormat};
use crate::error::ConfigError;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Timeout for news, chat-completion and `sendMessage` requests, and SMTP.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the read-only `getMe` / `getUpdates` discovery calls.
pub const DISCOVERY_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct NewsConfig {
    pub api_key: String,
    pub base_url: Url,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct ChatConfig {
    /// Missing keys are reported by the generator, not at startup.
    pub api_key: Option<String>,
    pub base_url: Url,
    pub model: String,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct TelegramConfig {
    /// Validated by the sender, before any network call.
    pub bot_token: Option<String>,
    pub chat_id: Option<String>,
    pub base_url: Url,
    pub format: TelegramFormat,
    pub timeout: Duration,
}

#[derive(Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub to_email: String,
    pub timeout: Duration,
}

/// Everything a digest run needs.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub news: NewsConfig,
    pub chat: ChatConfig,
    pub telegram: TelegramConfig,
    /// Present only when the email channel is selected.
    pub smtp: Option<SmtpConfig>,
    pub channels: Vec<Channel>,
    pub limit: usize,
}

impl AppConfig {
    /// Resolve the digest configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Missing`] when `NEWS_API_KEY` is unset, or when
    /// the email channel is selected without SMTP credentials or recipient,
    /// and [`ConfigError::InvalidUrl`] for a malformed base URL.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let news = NewsConfig {
            api_key: required(cli.news_api_key.as_deref(), "NEWS_API_KEY")?,
            base_url: parse_base_url("NEWS_API_BASE_URL", &cli.news_api_base_url)?,
            timeout: REQUEST_TIMEOUT,
        };

        let chat = ChatConfig {
            api_key: optional(cli.chat_api_key.as_deref()),
            base_url: parse_base_url("CHAT_API_BASE_URL", &cli.chat_api_base_url)?,
            model: cli.chat_model.clone(),
            timeout: REQUEST_TIMEOUT,
        };

        let telegram = TelegramConfig::from_cli(cli)?;

        let mut channels = Vec::with_capacity(cli.channels.len());
        for channel in &cli.channels {
            if !channels.contains(channel) {
                channels.push(*channel);
            }
        }

        let smtp = if channels.contains(&Channel::Email) {
            Some(SmtpConfig::from_cli(cli)?)
        } else {
            None
        };

        Ok(Self {
            news,
            chat,
            telegram,
            smtp,
            channels,
            limit: cli.limit as usize,
        })
    }
}

impl TelegramConfig {
    /// Resolve the Telegram settings alone (used by the chat-id utility too).
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        Ok(Self {
            bot_token: optional(cli.telegram_bot_token.as_deref()),
            chat_id: optional(cli.telegram_chat_id.as_deref()),
            base_url: parse_base_url("TELEGRAM_API_BASE_URL", &cli.telegram_api_base_url)?,
            format: cli.telegram_format,
            timeout: REQUEST_TIMEOUT,
        })
    }
}

impl SmtpConfig {
    fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let username = required(cli.smtp_username.as_deref(), "SMTP_USERNAME")?;
        let password = required(cli.smtp_password.as_deref(), "SMTP_PASSWORD")?;
        let to_email = required(cli.to_email.as_deref(), "TO_EMAIL")?;
        let from_email = optional(cli.from_email.as_deref()).unwrap_or_else(|| username.clone());

        Ok(Self {
            host: cli.smtp_host.trim().to_string(),
            port: cli.smtp_port,
            username,
            password,
            from_email,
            to_email,
            timeout: REQUEST_TIMEOUT,
        })
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(value: Option<&str>, name: &'static str) -> Result<String, ConfigError> {
    optional(value).ok_or(ConfigError::Missing(name))
}

fn parse_base_url(name: &'static str, value: &str) -> Result<Url, ConfigError> {
    let invalid = || ConfigError::InvalidUrl {
        name,
        value: value.to_string(),
    };
    let url = Url::parse(value.trim()).map_err(|_| invalid())?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(invalid());
    }
    Ok(url)
}

fn redacted(secret: &Option<String>) -> &'static str {
    if secret.is_some() { "<set>" } else { "<unset>" }
}

impl fmt::Debug for NewsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsConfig")
            .field("api_key", &"<set>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("api_key", &redacted(&self.api_key))
            .field("base_url", &self.base_url.as_str())
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &redacted(&self.bot_token))
            .field("chat_id", &self.chat_id)
            .field("base_url", &self.base_url.as_str())
            .field("format", &self.format)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl fmt::Debug for SmtpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"<set>")
            .field("from_email", &self.from_email)
            .field("to_email", &self.to_email)
            .field("timeout", &self.timeout)
            .finish()
    }
}
