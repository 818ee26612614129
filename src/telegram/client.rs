use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{ApiReply, Message, Messenger, Update, UpdateSource};

/// Telegram accepts between 2 and 10 items per media group.
const MEDIA_GROUP_LIMITS: (usize, usize) = (2, 10);

/// Bot API client bound to one bot token and a default chat.
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: String,
    chat_id: String,
    test_chat_id: Option<String>,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str, chat_id: &str, test_chat_id: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            chat_id: chat_id.to_string(),
            test_chat_id,
        }
    }

    /// Use `http` for requests instead of a default client.
    pub fn with_http(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Send to the default chat.
    pub async fn notify(&self, text: &str) -> Result<()> {
        self.send_message(&self.chat_id, text).await
    }

    /// Send to the test chat.
    pub async fn send_test_message(&self, text: &str) -> Result<()> {
        let Some(chat_id) = self.test_chat_id.as_deref() else {
            bail!("TELEGRAM_CHAT_TEST_ID is not configured");
        };
        self.send_message(chat_id, text).await
    }

    /// Send a photo to the default chat. `photo` is either an `http(s)` URL,
    /// which Telegram fetches itself, or a local file to upload.
    pub async fn send_photo(&self, photo: &str, caption: &str) -> Result<Message> {
        let caption = escape_html(caption);

        let request = if is_remote(photo) {
            self.http.post(self.url("sendPhoto")).form(&[
                ("chat_id", self.chat_id.as_str()),
                ("caption", caption.as_str()),
                ("parse_mode", "html"),
                ("photo", photo),
            ])
        } else {
            let form = Form::new()
                .text("chat_id", self.chat_id.clone())
                .text("caption", caption)
                .text("parse_mode", "html")
                .part("photo", file_part(Path::new(photo)).await?);
            self.http.post(self.url("sendPhoto")).multipart(form)
        };

        let reply = request.send().await.context("sendPhoto request failed")?;
        read_reply(reply, "sendPhoto").await
    }

    /// Send several local photos as one album. The caption is attached to
    /// the first photo only.
    pub async fn send_media_group(
        &self,
        photos: &[PathBuf],
        caption: &str,
    ) -> Result<Vec<Message>> {
        let (min, max) = MEDIA_GROUP_LIMITS;
        if photos.len() < min || photos.len() > max {
            bail!(
                "a media group needs {min} to {max} photos, got {}",
                photos.len()
            );
        }

        let media = media_group_payload(photos.len(), &escape_html(caption));
        let mut form = Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("media", media.to_string());
        for (index, path) in photos.iter().enumerate() {
            form = form.part(format!("photo{index}"), file_part(path).await?);
        }

        let reply = self
            .http
            .post(self.url("sendMediaGroup"))
            .multipart(form)
            .send()
            .await
            .context("sendMediaGroup request failed")?;
        read_reply(reply, "sendMediaGroup").await
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }
}

#[async_trait]
impl UpdateSource for TelegramClient {
    async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let mut query = vec![
            ("timeout", timeout_secs.to_string()),
            ("allowed_updates", r#"["message"]"#.to_string()),
        ];
        if let Some(offset) = offset {
            query.push(("offset", offset.to_string()));
        }

        let reply = self
            .http
            .get(self.url("getUpdates"))
            .query(&query)
            .send()
            .await
            .context("getUpdates request failed")?;
        read_reply(reply, "getUpdates").await
    }
}

#[async_trait]
impl Messenger for TelegramClient {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        debug!(chat_id, chars = text.chars().count(), "sendMessage");
        let text = escape_html(text);
        let reply = self
            .http
            .get(self.url("sendMessage"))
            .query(&[
                ("chat_id", chat_id),
                ("parse_mode", "html"),
                ("disable_web_page_preview", "true"),
                ("text", text.as_str()),
            ])
            .send()
            .await
            .context("sendMessage request failed")?;
        read_reply::<Message>(reply, "sendMessage").await?;
        Ok(())
    }
}

async fn read_reply<T: DeserializeOwned>(resp: reqwest::Response, method: &str) -> Result<T> {
    let reply: ApiReply<T> = resp
        .json()
        .await
        .with_context(|| format!("telegram {method} returned an unreadable reply"))?;
    reply.into_result(method)
}

async fn file_part(path: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read photo {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    Ok(Part::bytes(bytes).file_name(name))
}

fn is_remote(photo: &str) -> bool {
    photo.starts_with("http://") || photo.starts_with("https://")
}

/// `media` field for `sendMediaGroup`: one `attach://photo<i>` entry per file.
fn media_group_payload(count: usize, caption: &str) -> serde_json::Value {
    let items: Vec<serde_json::Value> = (0..count)
        .map(|index| {
            json!({
                "type": "photo",
                "media": format!("attach://photo{index}"),
                "caption": if index == 0 { caption } else { "" },
                "parse_mode": "html",
            })
        })
        .collect();
    serde_json::Value::Array(items)
}

/// Messages are plain text sent with `parse_mode=html`; escape the three
/// characters the parser treats as markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
