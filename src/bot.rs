//! Long-poll listener: fetch updates one batch at a time and run each text
//! message through the command registry, in order.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;
use tracing::{info, warn};

use crate::commands::{CommandContext, CommandRegistry, CommandResult};
use crate::config::ServerMap;
use crate::servers::ServerManager;
use crate::telegram::{Messenger, Update, UpdateSource};

/// Pause after a failed poll before polling again.
const POLL_ERROR_PAUSE: Duration = Duration::from_secs(5);

pub struct Listener {
    registry: CommandRegistry,
    manager: ServerManager,
    servers: ServerMap,
    allowed_chats: Vec<String>,
    poll_timeout_secs: u64,
}

impl Listener {
    pub fn new(manager: ServerManager, servers: ServerMap, poll_timeout_secs: u64) -> Self {
        Self {
            registry: CommandRegistry::new(),
            manager,
            servers,
            allowed_chats: Vec::new(),
            poll_timeout_secs,
        }
    }

    /// Only accept commands from these chats. Empty accepts every chat.
    pub fn with_allowed_chats(mut self, chats: Vec<String>) -> Self {
        self.allowed_chats = chats;
        self
    }

    /// Handle one update. Non-text updates and chats outside the allow
    /// list are ignored.
    pub async fn handle(&self, update: &Update, messenger: &dyn Messenger) -> CommandResult {
        let Some((chat_id, text)) = update.text_message() else {
            return CommandResult::NotACommand;
        };
        info!(update_id = update.update_id, %chat_id, text, "received message");

        if !self.allowed_chats.is_empty() && !self.allowed_chats.contains(&chat_id) {
            warn!(%chat_id, "ignoring message from chat outside the allow list");
            return CommandResult::NotACommand;
        }

        let ctx = CommandContext {
            manager: &self.manager,
            messenger,
            servers: &self.servers,
            chat_id: &chat_id,
        };
        self.registry.dispatch(text, &ctx).await
    }

    /// Fetch and handle one batch. Returns the offset for the next poll.
    pub async fn poll_once<C>(&self, client: &C, offset: Option<i64>) -> Result<Option<i64>>
    where
        C: UpdateSource + Messenger,
    {
        let updates = client.get_updates(offset, self.poll_timeout_secs).await?;
        let mut next = offset;
        for update in &updates {
            self.handle(update, client).await;
            next = Some(next.map_or(update.update_id + 1, |n| n.max(update.update_id + 1)));
        }
        Ok(next)
    }

    /// Poll until Ctrl+C.
    pub async fn run<C>(&self, client: &C) -> Result<()>
    where
        C: UpdateSource + Messenger,
    {
        self.run_until(client, tokio::signal::ctrl_c()).await
    }

    /// Poll until `shutdown` completes. Shutdown is watched during polls
    /// and during the pause after a failed poll.
    pub async fn run_until<C, F>(&self, client: &C, shutdown: F) -> Result<()>
    where
        C: UpdateSource + Messenger,
        F: Future,
    {
        info!(servers = %self.servers, "listener started");
        tokio::pin!(shutdown);
        let mut offset = None;

        loop {
            let result = tokio::select! {
                result = self.poll_once(client, offset) => result,
                _ = &mut shutdown => break,
            };
            match result {
                Ok(next) => offset = next,
                Err(e) => {
                    warn!(error = %format!("{e:#}"), "polling failed");
                    tokio::select! {
                        _ = tokio::time::sleep(POLL_ERROR_PAUSE) => {}
                        _ = &mut shutdown => break,
                    }
                }
            }
        }

        info!("interrupted, stopping listener");
        Ok(())
    }
}
