//! Command-line interface definitions for the European news digest.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! All arguments can be provided via command-line flags or environment variables
//! (a `.env` file in the working directory is loaded first).

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for the digest.
///
/// # Examples
///
/// ```sh
/// # Send today's digest to Telegram (credentials from the environment)
/// eu_news_digest
///
/// # Send to both Telegram and email
/// eu_news_digest --channel telegram --channel email
///
/// # Find the chat id to use for TELEGRAM_CHAT_ID
/// eu_news_digest chat-id
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// News provider API key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub news_api_key: Option<String>,

    /// News provider base URL
    #[arg(long, env = "NEWS_API_BASE_URL", default_value = "https://api.worldnewsapi.com")]
    pub news_api_base_url: String,

    /// Maximum number of articles in the digest
    #[arg(long, env = "NEWS_LIMIT", default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..))]
    pub limit: u32,

    /// Chat-completion API key used for the fallback overview
    #[arg(long, env = "CHAT_API_KEY", hide_env_values = true)]
    pub chat_api_key: Option<String>,

    /// Chat-completion API base URL
    #[arg(long, env = "CHAT_API_BASE_URL", default_value = "https://api.openai.com/v1")]
    pub chat_api_base_url: String,

    /// Chat-completion model
    #[arg(long, env = "CHAT_MODEL", default_value = "gpt-3.5-turbo")]
    pub chat_model: String,

    /// Telegram bot token
    #[arg(long, env = "TELEGRAM_BOT_TOKEN", hide_env_values = true, global = true)]
    pub telegram_bot_token: Option<String>,

    /// Telegram chat id the digest is sent to
    #[arg(long, env = "TELEGRAM_CHAT_ID")]
    pub telegram_chat_id: Option<String>,

    /// Telegram Bot API base URL
    #[arg(
        long,
        env = "TELEGRAM_API_BASE_URL",
        default_value = "https://api.telegram.org",
        global = true
    )]
    pub telegram_api_base_url: String,

    /// How the Telegram message is rendered
    #[arg(long, env = "TELEGRAM_FORMAT", value_enum, default_value_t = TelegramFormat::Plain)]
    pub telegram_format: TelegramFormat,

    /// SMTP server host
    #[arg(long, env = "SMTP_HOST", default_value = "smtp.gmail.com")]
    pub smtp_host: String,

    /// SMTP server port (STARTTLS)
    #[arg(long, env = "SMTP_PORT", default_value_t = 587)]
    pub smtp_port: u16,

    /// SMTP username
    #[arg(long, env = "SMTP_USERNAME")]
    pub smtp_username: Option<String>,

    /// SMTP password
    #[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
    pub smtp_password: Option<String>,

    /// Sender address (defaults to the SMTP username)
    #[arg(long, env = "FROM_EMAIL")]
    pub from_email: Option<String>,

    /// Recipient address
    #[arg(long, env = "TO_EMAIL")]
    pub to_email: Option<String>,

    /// Delivery channels, in delivery order
    #[arg(
        long = "channel",
        env = "DIGEST_CHANNELS",
        value_enum,
        value_delimiter = ',',
        default_value = "telegram"
    )]
    pub channels: Vec<Channel>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Send the daily digest (the default when no subcommand is given)
    Send,
    /// Print the bot identity and the chat ids that recently messaged it
    ChatId,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Telegram,
    Email,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelegramFormat {
    /// Telegram's HTML subset (links, bold, italics)
    Html,
    /// Plain text without a parse mode
    Plain,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["eu_news_digest", "--news-api-key", "k"]);

        assert_eq!(cli.command, None);
        assert_eq!(cli.news_api_key.as_deref(), Some("k"));
        assert_eq!(cli.limit, 10);
        assert_eq!(cli.smtp_port, 587);
        assert_eq!(cli.telegram_format, TelegramFormat::Plain);
        assert_eq!(cli.channels, vec![Channel::Telegram]);
    }

    #[test]
    fn test_cli_channels_comma_separated() {
        let cli = Cli::parse_from(["eu_news_digest", "--channel", "email,telegram"]);
        assert_eq!(cli.channels, vec![Channel::Email, Channel::Telegram]);
    }

    #[test]
    fn test_cli_rejects_zero_limit() {
        let res = Cli::try_parse_from(["eu_news_digest", "--limit", "0"]);
        assert!(res.is_err());
    }

    #[test]
    fn test_cli_chat_id_subcommand() {
        let cli = Cli::parse_from(["eu_news_digest", "--telegram-bot-token", "1:a", "chat-id"]);
        assert_eq!(cli.command, Some(Command::ChatId));
        assert_eq!(cli.telegram_bot_token.as_deref(), Some("1:a"));
    }

    #[test]
    fn test_cli_chat_id_accepts_telegram_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "eu_news_digest",
            "chat-id",
            "--telegram-bot-token",
            "1:a",
            "--telegram-api-base-url",
            "http://localhost:8081",
        ]);
        assert_eq!(cli.command, Some(Command::ChatId));
        assert_eq!(cli.telegram_bot_token.as_deref(), Some("1:a"));
        assert_eq!(cli.telegram_api_base_url, "http://localhost:8081");
    }
}
