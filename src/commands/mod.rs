//! Chat commands prefixed with `/`.
//!
//! Commands implement the [`Command`] trait and are registered in a
//! [`CommandRegistry`]. The registry handles dispatch, argument splitting,
//! the fixed error replies, and help generation. Extra commands can be added
//! at runtime via `registry.register(Arc::new(MyCommand))`.

mod all;
mod help;
mod power;
mod state;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::ServerMap;
use crate::consts::{HELP_HEADER, MSG_INVALID_SERVER, MSG_UNKNOWN_COMMAND, usage_message};
use crate::servers::ServerManager;
use crate::telegram::Messenger;

pub use help::HELP_COMMAND;

/// Everything a command needs while it runs.
pub struct CommandContext<'a> {
    pub manager: &'a ServerManager,
    pub messenger: &'a dyn Messenger,
    pub servers: &'a ServerMap,
    /// Chat the command came from; replies go back there.
    pub chat_id: &'a str,
}

impl CommandContext<'_> {
    pub async fn reply(&self, text: &str) -> Result<()> {
        self.messenger.send_message(self.chat_id, text).await
    }

    /// Resolve the single server-number argument of `command`, replying with
    /// the usage or invalid-server message when it can't be resolved.
    pub async fn single_target(&self, command: &str, args: &[&str]) -> Result<Option<&str>> {
        let [alias] = args else {
            self.reply(&usage_message(command)).await?;
            return Ok(None);
        };
        match self.servers.resolve(alias) {
            Some(instance) => Ok(Some(instance)),
            None => {
                self.reply(MSG_INVALID_SERVER).await?;
                Ok(None)
            }
        }
    }
}

/// What the listener should do after dispatch.
#[derive(Debug, PartialEq, Eq)]
pub enum CommandResult {
    /// Not a command; ignored.
    NotACommand,
    /// Command handled (including unknown commands and failures, which
    /// have already been reported to the chat).
    Handled,
}

/// A chat command. Implement this trait to add new commands.
#[async_trait]
pub trait Command: Send + Sync {
    /// Primary name, e.g. `"/start"`.
    fn name(&self) -> &str;

    /// Name with its arguments as shown in help, e.g. `"/start [서버번호]"`.
    fn usage(&self) -> &str {
        self.name()
    }

    /// One-line description for the help text.
    fn description(&self) -> &str;

    /// Run the command with its whitespace-split arguments.
    async fn execute(&self, args: &[&str], ctx: &CommandContext<'_>) -> Result<()>;
}

/// Holds registered commands in help order.
pub struct CommandRegistry {
    commands: Vec<Arc<dyn Command>>,
}

impl CommandRegistry {
    /// Create a registry with all built-in commands.
    pub fn new() -> Self {
        let commands: Vec<Arc<dyn Command>> = vec![
            Arc::new(help::HelpCommand),
            Arc::new(all::AllStopCommand),
            Arc::new(all::AllStartCommand),
            Arc::new(power::StartCommand),
            Arc::new(power::StopCommand),
            Arc::new(state::StateCommand),
        ];
        Self { commands }
    }

    /// Register an additional command.
    pub fn register(&mut self, command: Arc<dyn Command>) {
        self.commands.push(command);
    }

    /// Run the command named by the first word of `input`.
    ///
    /// Failures never escape: they are logged and reported to the chat.
    pub async fn dispatch(&self, input: &str, ctx: &CommandContext<'_>) -> CommandResult {
        let input = input.trim();
        if !input.starts_with('/') {
            return CommandResult::NotACommand;
        }

        let mut words = input.split_whitespace();
        let name = command_name(words.next().unwrap_or_default());
        let args: Vec<&str> = words.collect();

        let Some(command) = self.commands.iter().find(|c| c.name() == name) else {
            info!(command = %name, chat_id = ctx.chat_id, "unknown command");
            if let Err(e) = ctx.reply(MSG_UNKNOWN_COMMAND).await {
                error!(error = %format!("{e:#}"), "failed to send reply");
            }
            return CommandResult::Handled;
        };

        info!(command = %name, ?args, chat_id = ctx.chat_id, "running command");

        // Help needs the registry itself so registered extras are listed too.
        let result = if command.name() == HELP_COMMAND {
            ctx.reply(&self.help_text()).await
        } else {
            command.execute(&args, ctx).await
        };

        if let Err(e) = result {
            let message = format!("[시스템 오류]\n{e:#}");
            error!(command = %name, error = %format!("{e:#}"), "command failed");
            if let Err(e) = ctx.reply(&message).await {
                error!(error = %format!("{e:#}"), "failed to send reply");
            }
        }
        CommandResult::Handled
    }

    /// Help text listing every registered command.
    pub fn help_text(&self) -> String {
        let lines: Vec<String> = self
            .commands
            .iter()
            .map(|c| format!("{} - {}", c.usage(), c.description()))
            .collect();
        format!("{HELP_HEADER}\n\n{}", lines.join("\n"))
    }

    /// All registered command names.
    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Lower-cased command word without a `@botname` suffix.
fn command_name(word: &str) -> String {
    let word = word.split_once('@').map_or(word, |(name, _)| name);
    word.to_lowercase()
}
