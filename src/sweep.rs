//! One-shot actions over every configured server, for cron-style use.

use tracing::{error, info};

use crate::config::ServerMap;
use crate::consts::tagged;
use crate::ncp::{PowerAction, ServerStatus};
use crate::servers::ServerManager;
use crate::telegram::Messenger;

/// What to do to each server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Sweep {
    /// Start or stop; every outcome is reported.
    Power(PowerAction),
    /// Check the status; only mismatches and failures are reported.
    Verify(ServerStatus),
}

/// Where sweep results are reported.
pub struct Notifier<'a> {
    pub messenger: &'a dyn Messenger,
    pub chat_id: &'a str,
}

/// Run `sweep` on every server in order. Returns one line per server for
/// the terminal; the same lines (except `ok`) are sent to the chat.
///
/// A failed chat delivery is logged and does not stop the sweep.
pub async fn run(
    manager: &ServerManager,
    servers: &ServerMap,
    notifier: &Notifier<'_>,
    sweep: &Sweep,
) -> Vec<String> {
    let mut lines = Vec::with_capacity(servers.len());

    for (alias, instance) in servers.iter() {
        info!(alias, instance, ?sweep, "sweeping server");

        let report = match sweep {
            Sweep::Power(action) => Some(manager.power(instance, *action).await),
            Sweep::Verify(expected) => manager.verify(instance, expected).await,
        };

        match report {
            Some(message) => {
                let line = tagged(instance, &message);
                if let Err(e) = notifier.messenger.send_message(notifier.chat_id, &line).await {
                    error!(instance, error = %format!("{e:#}"), "failed to notify chat");
                }
                lines.push(line);
            }
            None => lines.push(tagged(instance, "ok")),
        }
    }

    lines
}
