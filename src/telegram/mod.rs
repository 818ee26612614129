pub mod client;
pub mod mock;

use anyhow::{Result, bail};
use async_trait::async_trait;
use serde::Deserialize;

pub use client::TelegramClient;

/// Something that can deliver a text message to a chat.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()>;
}

/// Something that yields incoming bot updates by long polling.
#[async_trait]
pub trait UpdateSource: Send + Sync {
    /// Updates with id `>= offset`, waiting up to `timeout_secs` for one to arrive.
    async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>>;
}

/// Envelope around every Bot API reply.
#[derive(Debug, Deserialize)]
pub struct ApiReply<T> {
    pub ok: bool,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub error_code: Option<i64>,
    pub result: Option<T>,
}

impl<T> ApiReply<T> {
    /// The `result` of an `ok` reply, or the API's description as an error.
    pub fn into_result(self, method: &str) -> Result<T> {
        if !self.ok {
            let code = self.error_code.map(|c| format!(" ({c})")).unwrap_or_default();
            let description = self.description.unwrap_or_else(|| "no description".to_string());
            bail!("telegram {method} failed{code}: {description}");
        }
        match self.result {
            Some(result) => Ok(result),
            None => bail!("telegram {method} returned ok without a result"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

impl Update {
    /// `(chat id, text)` when the update is a text message.
    pub fn text_message(&self) -> Option<(String, &str)> {
        let message = self.message.as_ref()?;
        let text = message.text.as_deref()?;
        Some((message.chat.id.to_string(), text))
    }
}
