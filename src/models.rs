//! Data models for fetched articles, the digest, and provider payloads.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Article`]: A normalized article produced by the news fetcher
//! - [`Digest`]: The content of a single run (articles, fallback text, or nothing)
//! - Wire types for the news provider, chat-completion provider and Telegram Bot API
//!
//! Wire types are deliberately lenient: every field the providers may omit is
//! optional, and the normalization into [`Article`] applies the fallback defaults.

use serde::{Deserialize, Serialize};

/// Placeholder used when the provider sends no title.
pub const NO_TITLE: &str = "No title";

/// Placeholder used when the provider sends neither `text` nor `summary`.
pub const NO_DESCRIPTION: &str = "No description available";

/// A news article as delivered to the formatter.
///
/// Articles have no identity beyond their position in the fetched list and
/// are never mutated after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    /// The article headline, or [`NO_TITLE`].
    pub title: String,
    /// The article body or summary, or [`NO_DESCRIPTION`].
    pub description: String,
    /// Link to the article; empty when the provider sent none.
    pub url: String,
    /// Publication timestamp as sent by the provider; empty when missing.
    pub published_at: String,
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        let title = non_blank(raw.title).unwrap_or_else(|| NO_TITLE.to_string());
        let description = non_blank(raw.text)
            .or_else(|| non_blank(raw.summary))
            .unwrap_or_else(|| NO_DESCRIPTION.to_string());

        Self {
            title,
            description,
            url: raw.url.unwrap_or_default().trim().to_string(),
            published_at: raw.publish_date.unwrap_or_default(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// The content of one daily run.
///
/// Exactly one case is active per run: a non-empty list of articles, an
/// AI-generated fallback overview, or nothing at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Digest {
    /// Articles fetched from the news provider (never empty).
    Articles(Vec<Article>),
    /// Fallback overview generated because no articles were fetched.
    Fallback(String),
    /// Neither articles nor a fallback overview are available.
    Empty,
}

impl Digest {
    /// Pick the active case from the fetch result and the optional fallback text.
    ///
    /// Articles always win; a blank fallback text counts as no fallback.
    pub fn from_parts(articles: Vec<Article>, fallback: Option<String>) -> Self {
        if !articles.is_empty() {
            return Digest::Articles(articles);
        }
        match fallback {
            Some(text) if !text.trim().is_empty() => Digest::Fallback(text),
            _ => Digest::Empty,
        }
    }

    /// Short label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Digest::Articles(_) => "articles",
            Digest::Fallback(_) => "fallback",
            Digest::Empty => "empty",
        }
    }
}

/// Top-level body of the news provider's `top-news` response.
#[derive(Debug, Deserialize)]
pub struct NewsResponse {
    #[serde(default)]
    pub news: Vec<RawArticle>,
}

/// A single article as returned by the news provider.
#[derive(Debug, Default, Deserialize)]
pub struct RawArticle {
    pub title: Option<String>,
    pub text: Option<String>,
    pub summary: Option<String>,
    pub url: Option<String>,
    pub publish_date: Option<String>,
}

/// Request body for the chat-completion endpoint.
#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

/// Response body of the chat-completion endpoint, reduced to what we read.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    pub content: Option<String>,
}

impl ChatResponse {
    /// Content of the first choice, if any.
    pub fn first_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
    }
}

/// Request body for `sendMessage`.
#[derive(Debug, Serialize)]
pub struct SendMessageRequest<'a> {
    pub chat_id: &'a str,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'a str>,
}

/// Envelope shared by every Telegram Bot API response.
#[derive(Debug, Deserialize)]
pub struct TelegramResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

/// Bot identity returned by `getMe`.
#[derive(Debug, Clone, Deserialize)]
pub struct BotUser {
    pub id: i64,
    pub first_name: Option<String>,
    pub username: Option<String>,
}

/// One inbound update returned by `getUpdates`.
#[derive(Debug, Deserialize)]
pub struct Update {
    pub message: Option<UpdateMessage>,
    pub edited_message: Option<UpdateMessage>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMessage {
    pub chat: Option<Chat>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub title: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_article_defaults_when_everything_missing() {
        let article = Article::from(RawArticle::default());
        assert_eq!(article.title, NO_TITLE);
        assert_eq!(article.description, NO_DESCRIPTION);
        assert_eq!(article.url, "");
        assert_eq!(article.published_at, "");
    }

    #[test]
    fn test_article_description_falls_back_to_summary() {
        let raw: RawArticle = serde_json::from_str(
            r#"{"title": "Vote in Brussels", "text": null, "summary": "MEPs vote today", "url": "https://example.eu/a"}"#,
        )
        .unwrap();
        let article = Article::from(raw);
        assert_eq!(article.description, "MEPs vote today");
        assert_eq!(article.url, "https://example.eu/a");
    }

    #[test]
    fn test_article_prefers_text_over_summary() {
        let raw = RawArticle {
            text: Some("Full text".to_string()),
            summary: Some("Summary".to_string()),
            ..Default::default()
        };
        assert_eq!(Article::from(raw).description, "Full text");
    }

    #[test]
    fn test_blank_title_uses_placeholder() {
        let raw = RawArticle {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(Article::from(raw).title, NO_TITLE);
    }

    #[test]
    fn test_digest_from_parts() {
        let article = Article::from(RawArticle::default());
        assert_eq!(
            Digest::from_parts(vec![article.clone()], Some("ignored".into())),
            Digest::Articles(vec![article])
        );
        assert_eq!(
            Digest::from_parts(vec![], Some("Overview".into())),
            Digest::Fallback("Overview".into())
        );
        assert_eq!(Digest::from_parts(vec![], Some("  ".into())), Digest::Empty);
        assert_eq!(Digest::from_parts(vec![], None), Digest::Empty);
    }

    #[test]
    fn test_chat_response_first_content() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "Hello"}}]}"#,
        )
        .unwrap();
        assert_eq!(resp.first_content().as_deref(), Some("Hello"));

        let empty: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(empty.first_content(), None);
    }

    #[test]
    fn test_send_message_request_omits_missing_parse_mode() {
        let body = SendMessageRequest {
            chat_id: "42",
            text: "hi",
            parse_mode: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("parse_mode").is_none());
        assert_eq!(json["chat_id"], "42");
    }

    #[test]
    fn test_telegram_error_envelope() {
        let resp: TelegramResponse<serde_json::Value> = serde_json::from_str(
            r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#,
        )
        .unwrap();
        assert!(!resp.ok);
        assert_eq!(resp.error_code, Some(401));
        assert_eq!(resp.description.as_deref(), Some("Unauthorized"));
    }
}
