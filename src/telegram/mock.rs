use anyhow::{Result, bail};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use super::Messenger;

/// A messenger for tests. Records `(chat id, text)` for every message.
#[derive(Default)]
pub struct RecordingMessenger {
    sent: Mutex<Vec<(String, String)>>,
    failing: AtomicBool,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// A messenger whose sends all fail.
    pub fn failing() -> Self {
        let messenger = Self::default();
        messenger.failing.store(true, Ordering::SeqCst);
        messenger
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Texts only.
    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|(_, text)| text).collect()
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(&self, chat_id: &str, text: &str) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("chat not reachable");
        }
        self.sent
            .lock()
            .unwrap()
            .push((chat_id.to_string(), text.to_string()));
        Ok(())
    }
}
