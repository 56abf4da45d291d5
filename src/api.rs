//! Chat-completion interaction for the fallback overview.
//!
//! When the news provider yields no articles, the orchestrator asks a
//! chat-completion API for a short overview of today's European news.
//!
//! # Architecture
//!
//! - [`AskAsync`]: Core trait defining a single prompt → completion exchange
//! - [`ChatCompletionClient`]: OpenAI-compatible `POST /chat/completions` implementation
//! - [`generate_overview`]: Sends the fixed overview prompt through any [`AskAsync`]
//!
//! There is no retry: one attempt per run, bounded by the request timeout.
//! Every failure maps to a distinct [`ChatError`] whose `Display` is the
//! fixed human-readable message for that case.

use crate::config::ChatConfig;
use crate::error::ChatError;
use crate::models::{ChatMessage, ChatRequest, ChatResponse};
use crate::utils::{endpoint, truncate_for_log};
use reqwest::Client;
use std::fmt;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

const SYSTEM_PROMPT: &str = "You are a helpful news assistant that provides concise, \
accurate summaries of European news.";

/// Prompt sent when no articles could be fetched.
pub const OVERVIEW_PROMPT: &str = "Please provide a brief overview of the most important \
European news stories from today.
Focus on major political, economic, and social developments in Europe.
Keep it concise (3-5 key points) and informative.
Format it as a brief news summary suitable for a daily digest.";

const MAX_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.7;

/// Trait for async chat-completion interaction.
///
/// Implementors send a user prompt to a model and return the completion
/// text.
pub trait AskAsync {
    /// Send `prompt` and return the non-empty completion text.
    async fn ask(&self, prompt: &str) -> Result<String, ChatError>;
}

/// Client for an OpenAI-compatible chat-completion endpoint.
///
/// The HTTP client is built inside [`AskAsync::ask`]; a build failure is
/// [`ChatError::Unexpected`].
pub struct ChatCompletionClient<'a> {
    config: &'a ChatConfig,
}

impl<'a> ChatCompletionClient<'a> {
    /// A missing API key is not an error here; it is reported by
    /// [`AskAsync::ask`] without touching the network.
    pub fn new(config: &'a ChatConfig) -> Self {
        Self { config }
    }
}

impl fmt::Debug for ChatCompletionClient<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatCompletionClient")
            .field("model", &self.config.model)
            .field("base_url", &self.config.base_url.as_str())
            .finish()
    }
}

impl AskAsync for ChatCompletionClient<'_> {
    #[instrument(level = "info", skip_all, fields(model = %self.config.model))]
    async fn ask(&self, prompt: &str) -> Result<String, ChatError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(ChatError::MissingApiKey)?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let http = Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| ChatError::Unexpected(e.to_string()))?;

        let url = endpoint(&self.config.base_url, &["chat", "completions"]);
        let t0 = Instant::now();
        let response = http
            .post(url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(ChatError::Request)?;

        let body = response.text().await.map_err(ChatError::Request)?;
        info!(
            elapsed_ms = t0.elapsed().as_millis(),
            bytes = body.len(),
            "Chat API responded"
        );

        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            warn!(
                body_preview = %truncate_for_log(&body, 300),
                "Chat API returned a malformed body"
            );
            ChatError::Parse(e)
        })?;

        parsed
            .first_content()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(ChatError::EmptyCompletion)
    }
}

/// Generate a European news overview to stand in for missing articles.
///
/// Returns the completion text, or the [`ChatError`] describing which of
/// the distinct failure cases occurred. Nothing here panics; callers decide
/// whether to surface the error's fixed message or drop it.
#[instrument(level = "info", skip_all)]
pub async fn generate_overview<A: AskAsync>(client: &A) -> Result<String, ChatError> {
    info!("Generating news overview using chat API");
    match client.ask(OVERVIEW_PROMPT).await {
        Ok(overview) => {
            info!(chars = overview.chars().count(), "Generated news overview");
            Ok(overview)
        }
        Err(e @ ChatError::MissingApiKey) => {
            warn!(error = %e, "No chat API key available for fallback");
            Err(e)
        }
        Err(e) => {
            let cause = std::error::Error::source(&e).map(ToString::to_string);
            error!(error = %e, cause = ?cause, "Chat API overview failed");
            Err(e)
        }
    }
}
