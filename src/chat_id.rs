//! Operator utility: find the chat id to configure as `TELEGRAM_CHAT_ID`.
//!
//! Verifies the bot token with `getMe`, then lists the chats that recently
//! messaged the bot (from `getUpdates`). The token always comes from the
//! configuration.

use crate::config::{DISCOVERY_TIMEOUT, TelegramConfig};
use crate::delivery::telegram::TelegramApi;
use crate::error::TelegramError;
use crate::models::{BotUser, Update};
use std::fmt::Write;
use tracing::{info, instrument};

/// A chat that sent the bot a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredChat {
    pub id: i64,
    pub name: String,
}

#[derive(Debug)]
pub struct ChatDiscovery {
    pub bot: BotUser,
    pub chats: Vec<DiscoveredChat>,
}

/// Query the bot identity and its recent chats.
#[instrument(level = "info", skip_all)]
pub async fn discover(config: &TelegramConfig) -> Result<ChatDiscovery, TelegramError> {
    let api = TelegramApi::new(config, DISCOVERY_TIMEOUT)?;
    let bot = api.get_me().await?;
    info!(bot_id = bot.id, "Bot token verified");
    let updates = api.get_updates().await?;
    let chats = collect_chats(&updates);
    info!(updates = updates.len(), chats = chats.len(), "Fetched recent updates");
    Ok(ChatDiscovery { bot, chats })
}

/// Distinct chats in first-seen order, from messages or edited messages.
pub fn collect_chats(updates: &[Update]) -> Vec<DiscoveredChat> {
    let mut chats: Vec<DiscoveredChat> = Vec::new();
    for update in updates {
        let Some(chat) = update
            .message
            .as_ref()
            .or(update.edited_message.as_ref())
            .and_then(|m| m.chat.as_ref())
        else {
            continue;
        };
        let Some(id) = chat.id else { continue };
        if chats.iter().any(|c| c.id == id) {
            continue;
        }
        let name = chat
            .first_name
            .clone()
            .or_else(|| chat.title.clone())
            .unwrap_or_else(|| "Unknown".to_string());
        chats.push(DiscoveredChat { id, name });
    }
    chats
}

/// Human-readable report printed by the `chat-id` subcommand.
pub fn report(discovery: &ChatDiscovery) -> String {
    let rule = "=".repeat(60);
    let bot = &discovery.bot;
    let mut out = String::new();

    let _ = writeln!(out, "{rule}\nBot information\n{rule}");
    let _ = writeln!(out, "Bot Name: {}", bot.first_name.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Bot Username: @{}", bot.username.as_deref().unwrap_or("-"));
    let _ = writeln!(out, "Bot ID: {}\n", bot.id);

    let _ = writeln!(out, "{rule}\nRecent chats\n{rule}");
    match discovery.chats.first() {
        None => {
            let _ = writeln!(out, "No messages found. Please:");
            let _ = writeln!(out, "1. Open Telegram and go to your bot");
            let _ = writeln!(out, "2. Click 'Start' or send any message");
            let _ = write!(out, "3. Run this command again");
        }
        Some(first) => {
            let _ = writeln!(out, "Found {} chat(s):\n", discovery.chats.len());
            for chat in &discovery.chats {
                let _ = writeln!(out, "  {} ({})", chat.id, chat.name);
            }
            let _ = write!(out, "\n{rule}\nUse this Chat ID: {}\n{rule}", first.id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::TelegramFormat;
    use serde_json::json;
    use std::time::Duration;
    use url::Url;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn updates(value: serde_json::Value) -> Vec<Update> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_collect_chats_dedupes_and_keeps_order() {
        let updates = updates(json!([
            { "update_id": 1, "message": { "chat": { "id": 7, "first_name": "Ana" } } },
            { "update_id": 2, "edited_message": { "chat": { "id": -100, "title": "Newsroom" } } },
            { "update_id": 3, "message": { "chat": { "id": 7, "first_name": "Ana" } } },
            { "update_id": 4, "message": { "chat": { "id": 8 } } },
            { "update_id": 5, "callback_query": {} }
        ]));

        let chats = collect_chats(&updates);
        assert_eq!(
            chats,
            vec![
                DiscoveredChat { id: 7, name: "Ana".into() },
                DiscoveredChat { id: -100, name: "Newsroom".into() },
                DiscoveredChat { id: 8, name: "Unknown".into() },
            ]
        );
    }

    #[test]
    fn test_report_without_chats_gives_instructions() {
        let discovery = ChatDiscovery {
            bot: BotUser {
                id: 1,
                first_name: Some("Digest".into()),
                username: Some("digest_bot".into()),
            },
            chats: vec![],
        };
        let out = report(&discovery);
        assert!(out.contains("Bot Username: @digest_bot"));
        assert!(out.contains("No messages found"));
        assert!(!out.contains("Use this Chat ID"));
    }

    #[tokio::test]
    async fn test_discover_suggests_first_chat() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/bot1:tok/getMe"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": { "id": 5, "first_name": "Digest", "username": "digest_bot" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/bot1:tok/getUpdates"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "ok": true,
                "result": [
                    { "update_id": 1, "message": { "chat": { "id": 42, "first_name": "Ana" } } },
                    { "update_id": 2, "message": { "chat": { "id": 43, "title": "Desk" } } }
                ]
            })))
            .mount(&server)
            .await;

        let config = TelegramConfig {
            bot_token: Some("1:tok".into()),
            chat_id: None,
            base_url: Url::parse(&server.uri()).unwrap(),
            format: TelegramFormat::Plain,
            timeout: Duration::from_secs(5),
        };
        let discovery = discover(&config).await.unwrap();
        assert_eq!(discovery.chats.len(), 2);
        assert!(report(&discovery).contains("Use this Chat ID: 42"));
    }

    #[tokio::test]
    async fn test_discover_rejected_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "ok": false, "error_code": 401, "description": "Unauthorized"
            })))
            .mount(&server)
            .await;

        let config = TelegramConfig {
            bot_token: Some("1:bad".into()),
            chat_id: None,
            base_url: Url::parse(&server.uri()).unwrap(),
            format: TelegramFormat::Plain,
            timeout: Duration::from_secs(5),
        };
        let err = discover(&config).await.unwrap_err();
        assert!(matches!(err, TelegramError::Api { code: Some(401), .. }));
    }
}
