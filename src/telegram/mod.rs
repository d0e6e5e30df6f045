//! Telegram Bot API client: long-polling for updates and delivering replies.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::RouteCastError;
use crate::config::TelegramConfig;
use crate::conversation::{ChatId, Reply, ReplySink, TextReply};

pub mod types;

pub use types::{ApiResponse, Incoming, InlineKeyboardMarkup, Update};

/// Maximum message length for Telegram's sendMessage API
const TELEGRAM_MAX_MESSAGE_LENGTH: usize = 4096;

pub struct TelegramClient {
    client: reqwest::Client,
    api_base_url: String,
    bot_token: String,
    poll_timeout_seconds: u32,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> crate::Result<Self> {
        let bot_token = config
            .bot_token
            .clone()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| RouteCastError::config("Telegram bot token is missing"))?;

        // the HTTP timeout must outlast the long poll
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(config.poll_timeout_seconds) + 15))
            .user_agent(concat!("RouteCast/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            bot_token,
            poll_timeout_seconds: config.poll_timeout_seconds,
        })
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.api_base_url, self.bot_token)
    }

    /// Decode the Bot API envelope, turning `ok: false` into a transport error
    async fn unwrap_response<T: DeserializeOwned>(
        response: reqwest::Response,
        method: &str,
    ) -> crate::Result<T> {
        let status = response.status();
        let body: ApiResponse<T> = response.json().await.map_err(|e| {
            RouteCastError::transport(format!("{method}: unreadable response ({status}): {e}"))
        })?;

        match body {
            ApiResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            ApiResponse { description, .. } => Err(RouteCastError::transport(format!(
                "{method} failed ({status}): {}",
                description.unwrap_or_else(|| "no description".to_string())
            ))),
        }
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(&self, offset: i64) -> crate::Result<Vec<Update>> {
        let body = serde_json::json!({
            "offset": offset,
            "timeout": self.poll_timeout_seconds,
            "allowed_updates": ["message", "callback_query"]
        });

        let response = self
            .client
            .post(self.api_url("getUpdates"))
            .json(&body)
            .send()
            .await?;
        Self::unwrap_response(response, "getUpdates").await
    }

    /// Send a text reply, splitting long texts. Markdown is tried first with a
    /// plain text fallback. The keyboard goes on the last chunk.
    pub async fn send_message(&self, chat: ChatId, reply: &TextReply) -> crate::Result<()> {
        let chunks = split_message(&reply.text, TELEGRAM_MAX_MESSAGE_LENGTH);
        let last = chunks.len().saturating_sub(1);

        for (index, chunk) in chunks.iter().enumerate() {
            let keyboard = if index == last {
                reply.keyboard.as_ref().map(InlineKeyboardMarkup::from)
            } else {
                None
            };
            self.send_message_chunk(chat, chunk, reply.markdown, keyboard.as_ref())
                .await?;
        }
        Ok(())
    }

    async fn send_message_chunk(
        &self,
        chat: ChatId,
        text: &str,
        markdown: bool,
        keyboard: Option<&InlineKeyboardMarkup>,
    ) -> crate::Result<()> {
        let mut body = serde_json::json!({
            "chat_id": chat.0,
            "text": text,
        });
        if let Some(keyboard) = keyboard {
            body["reply_markup"] = serde_json::to_value(keyboard)
                .map_err(|e| RouteCastError::transport(format!("Invalid keyboard: {e}")))?;
        }

        if markdown {
            let mut markdown_body = body.clone();
            markdown_body["parse_mode"] = "Markdown".into();
            let response = self
                .client
                .post(self.api_url("sendMessage"))
                .json(&markdown_body)
                .send()
                .await?;
            if response.status().is_success() {
                return Ok(());
            }
            warn!(
                status = ?response.status(),
                "Telegram sendMessage with Markdown failed; retrying without parse_mode"
            );
        }

        let response = self
            .client
            .post(self.api_url("sendMessage"))
            .json(&body)
            .send()
            .await?;
        Self::unwrap_response::<serde_json::Value>(response, "sendMessage").await?;
        Ok(())
    }

    /// Upload a PNG from memory
    pub async fn send_photo(
        &self,
        chat: ChatId,
        png: Vec<u8>,
        file_name: &str,
        caption: &str,
    ) -> crate::Result<()> {
        let part = Part::bytes(png)
            .file_name(file_name.to_string())
            .mime_str("image/png")?;

        let form = Form::new()
            .text("chat_id", chat.to_string())
            .text("caption", caption.to_string())
            .part("photo", part);

        let response = self
            .client
            .post(self.api_url("sendPhoto"))
            .multipart(form)
            .send()
            .await?;
        Self::unwrap_response::<serde_json::Value>(response, "sendPhoto").await?;

        info!("Telegram photo sent to {chat}: {file_name}");
        Ok(())
    }

    /// Stop the client-side spinner on a pressed button
    pub async fn answer_callback_query(&self, callback_id: &str) -> crate::Result<()> {
        let body = serde_json::json!({ "callback_query_id": callback_id });
        let response = self
            .client
            .post(self.api_url("answerCallbackQuery"))
            .json(&body)
            .send()
            .await?;
        Self::unwrap_response::<bool>(response, "answerCallbackQuery").await?;
        Ok(())
    }

    pub async fn send(&self, chat: ChatId, reply: Reply) -> crate::Result<()> {
        match reply {
            Reply::Text(text) => self.send_message(chat, &text).await,
            Reply::Photo {
                png,
                file_name,
                caption,
            } => self.send_photo(chat, png, &file_name, &caption).await,
        }
    }
}

/// Reply sink bound to one chat
pub struct ChatSink<'a> {
    client: &'a TelegramClient,
    chat: ChatId,
}

impl<'a> ChatSink<'a> {
    pub fn new(client: &'a TelegramClient, chat: ChatId) -> Self {
        Self { client, chat }
    }
}

#[async_trait]
impl ReplySink for ChatSink<'_> {
    async fn send(&self, reply: Reply) -> crate::Result<()> {
        debug!("Replying to {}: {}", self.chat, reply.body());
        self.client.send(self.chat, reply).await
    }
}

/// Split text into chunks of at most `max_len` bytes, preferring line breaks,
/// then spaces, and never cutting inside a character
fn split_message(text: &str, max_len: usize) -> Vec<String> {
    if text.len() <= max_len {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut remaining = text;

    while !remaining.is_empty() {
        if remaining.len() <= max_len {
            chunks.push(remaining.to_string());
            break;
        }

        let mut boundary = max_len;
        while !remaining.is_char_boundary(boundary) {
            boundary -= 1;
        }
        let chunk = &remaining[..boundary];
        let split_at = chunk
            .rfind('\n')
            .or_else(|| chunk.rfind(' '))
            .filter(|&at| at > 0)
            .unwrap_or(boundary);

        chunks.push(remaining[..split_at].to_string());
        remaining = remaining[split_at..].trim_start();
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TelegramClient {
        let config = TelegramConfig {
            bot_token: Some("123:ABC".to_string()),
            ..TelegramConfig::default()
        };
        TelegramClient::new(&config).unwrap()
    }

    #[test]
    fn test_api_url() {
        assert_eq!(
            client().api_url("getUpdates"),
            "https://api.telegram.org/bot123:ABC/getUpdates"
        );
    }

    #[test]
    fn test_missing_token_is_config_error() {
        let result = TelegramClient::new(&TelegramConfig::default());
        assert!(matches!(result, Err(RouteCastError::Config { .. })));
    }

    #[test]
    fn test_split_message_short() {
        assert_eq!(split_message("привет", 4096), vec!["привет"]);
    }

    #[test]
    fn test_split_message_on_newline() {
        let text = format!("{}\n{}", "а".repeat(30), "б".repeat(30));
        let chunks = split_message(&text, 80);
        assert_eq!(chunks, vec!["а".repeat(30), "б".repeat(30)]);
    }

    #[test]
    fn test_split_message_respects_char_boundaries() {
        // 2-byte characters with an odd limit and no break points
        let text = "ж".repeat(10);
        let chunks = split_message(&text, 7);
        assert!(chunks.iter().all(|chunk| chunk.len() <= 7));
        assert_eq!(chunks.concat(), text);
    }

    #[tokio::test]
    async fn test_unreachable_api_is_transport_error() {
        let config = TelegramConfig {
            bot_token: Some("123:ABC".to_string()),
            api_base_url: "http://127.0.0.1:9".to_string(),
            poll_timeout_seconds: 1,
            ..TelegramConfig::default()
        };
        let client = TelegramClient::new(&config).unwrap();
        let result = client.answer_callback_query("cb").await;
        assert!(matches!(result, Err(RouteCastError::Transport { .. })));
    }
}
