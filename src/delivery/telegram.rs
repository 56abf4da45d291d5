//! Telegram Bot API client.
//!
//! Only three methods are used: `sendMessage` for the digest, and the
//! read-only `getMe` / `getUpdates` for the chat-id discovery utility.
//! Every call is `{base}/bot{token}/{method}` and answers with the envelope
//! `{ ok, result?, description?, error_code? }`.
//!
//! Request URLs embed the bot token, so transport errors are stripped of
//! their URL before they are logged or returned.

use crate::config::TelegramConfig;
use crate::error::TelegramError;
use crate::models::{BotUser, SendMessageRequest, TelegramResponse, Update};
use crate::utils::endpoint;
use reqwest::{Client, RequestBuilder};
use serde::de::{DeserializeOwned, IgnoredAny};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use url::Url;

/// Low-level access to the Bot API for one bot token.
pub struct TelegramApi {
    http: Client,
    base_url: Url,
    token: String,
}

impl TelegramApi {
    /// Build a client for the configured bot.
    ///
    /// # Errors
    ///
    /// [`TelegramError::MissingToken`] when no token is configured.
    pub fn new(config: &TelegramConfig, timeout: Duration) -> Result<Self, TelegramError> {
        let token = config
            .bot_token
            .clone()
            .ok_or(TelegramError::MissingToken)?;
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TelegramError::Request(e.without_url()))?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            token,
        })
    }

    fn method_url(&self, method: &str) -> Url {
        let bot = format!("bot{}", self.token);
        endpoint(&self.base_url, &[bot.as_str(), method])
    }

    /// Send a request and unwrap the Bot API envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        request: RequestBuilder,
    ) -> Result<Option<T>, TelegramError> {
        let response = request
            .send()
            .await
            .map_err(|e| TelegramError::Request(e.without_url()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TelegramError::Request(e.without_url()))?;

        let envelope: TelegramResponse<T> =
            serde_json::from_str(&body).map_err(|source| TelegramError::Decode {
                status: status.as_u16(),
                source,
            })?;

        if !envelope.ok {
            let err = TelegramError::Api {
                code: envelope.error_code,
                description: envelope
                    .description
                    .unwrap_or_else(|| "Unknown error".to_string()),
            };
            error!(method, http_status = status.as_u16(), error = %err, "Telegram rejected the request");
            return Err(err);
        }

        debug!(method, http_status = status.as_u16(), "Telegram call succeeded");
        Ok(envelope.result)
    }

    /// `sendMessage` to `chat_id`.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<&str>,
    ) -> Result<(), TelegramError> {
        let body = SendMessageRequest {
            chat_id,
            text,
            parse_mode,
        };
        let request = self.http.post(self.method_url("sendMessage")).json(&body);
        self.call::<IgnoredAny>("sendMessage", request).await?;
        Ok(())
    }

    /// `getMe`: the identity of the bot behind the token.
    pub async fn get_me(&self) -> Result<BotUser, TelegramError> {
        let request = self.http.get(self.method_url("getMe"));
        self.call::<BotUser>("getMe", request)
            .await?
            .ok_or_else(|| TelegramError::Api {
                code: None,
                description: "getMe returned no result".to_string(),
            })
    }

    /// `getUpdates`: recent inbound messages, oldest first.
    pub async fn get_updates(&self) -> Result<Vec<Update>, TelegramError> {
        let request = self.http.get(self.method_url("getUpdates"));
        Ok(self
            .call::<Vec<Update>>("getUpdates", request)
            .await?
            .unwrap_or_default())
    }
}

impl fmt::Debug for TelegramApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramApi")
            .field("base_url", &self.base_url.as_str())
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Sends the digest to the configured chat.
#[derive(Debug)]
pub struct TelegramSender {
    api: TelegramApi,
    chat_id: String,
}

impl TelegramSender {
    /// Validate the Telegram settings and build the sender.
    ///
    /// Fails fast, without any network call, when the bot token or chat id
    /// is missing.
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        let api = TelegramApi::new(config, config.timeout)?;
        let chat_id = config
            .chat_id
            .clone()
            .ok_or(TelegramError::MissingChatId)?;
        Ok(Self { api, chat_id })
    }

    /// Post `text` to the chat with the given parse mode.
    ///
    /// A response with `ok: false` is an error carrying the provider's
    /// error code and description.
    #[instrument(level = "info", skip_all, fields(chat_id = %self.chat_id, chars = text.chars().count(), parse_mode = ?parse_mode))]
    pub async fn send(&self, text: &str, parse_mode: Option<&str>) -> Result<(), TelegramError> {
        info!("Sending Telegram message");
        match self.api.send_message(&self.chat_id, text, parse_mode).await {
            Ok(()) => {
                info!("Telegram message sent");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Error sending Telegram message");
                Err(e)
            }
        }
    }
}
