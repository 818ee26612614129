pub mod client;
pub mod mock;
pub mod response;
pub mod signature;

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

pub use client::NcpClient;

/// Power operation on a server instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerAction {
    Start,
    Stop,
}

impl PowerAction {
    /// vserver API action name.
    pub fn api_action(self) -> &'static str {
        match self {
            PowerAction::Start => "startServerInstances",
            PowerAction::Stop => "stopServerInstances",
        }
    }

    /// Key the action's result is nested under in the response body.
    pub fn response_key(self) -> &'static str {
        match self {
            PowerAction::Start => "startServerInstancesResponse",
            PowerAction::Stop => "stopServerInstancesResponse",
        }
    }
}

/// Instance status as named by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerStatus {
    Running,
    Booting,
    Stopped,
    /// Any other vendor state (`init`, `creating`, `shutting down`, ...).
    Other(String),
}

impl ServerStatus {
    pub fn from_name(name: &str) -> Self {
        match name {
            "running" => ServerStatus::Running,
            "booting" => ServerStatus::Booting,
            "stopped" => ServerStatus::Stopped,
            other => ServerStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ServerStatus::Running => "running",
            ServerStatus::Booting => "booting",
            ServerStatus::Stopped => "stopped",
            ServerStatus::Other(name) => name,
        }
    }
}

impl fmt::Display for ServerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Path and query for a power action on one instance.
pub fn power_path(instance: &str, action: PowerAction) -> String {
    format!(
        "/vserver/v2/{}?responseFormatType=json&serverInstanceNoList.1={instance}",
        action.api_action()
    )
}

/// Path and query for an instance detail lookup.
pub fn detail_path(instance: &str) -> String {
    format!(
        "/vserver/v2/getServerInstanceDetail?responseFormatType=json&serverInstanceNo={instance}"
    )
}

/// The remote VM control API. Implementations return the raw JSON body;
/// classification happens in [`response`].
///
/// `Err` means the call itself failed (network, non-JSON body). Vendor
/// error shapes arrive as `Ok` bodies.
#[async_trait]
pub trait ServerApi: Send + Sync {
    async fn power(&self, instance: &str, action: PowerAction) -> Result<Value>;
    async fn detail(&self, instance: &str) -> Result<Value>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_paths() {
        assert_eq!(
            power_path("25741251", PowerAction::Start),
            concat!(
                "/vserver/v2/startServerInstances",
                "?responseFormatType=json&serverInstanceNoList.1=25741251"
            )
        );
        assert_eq!(
            power_path("26055342", PowerAction::Stop),
            concat!(
                "/vserver/v2/stopServerInstances",
                "?responseFormatType=json&serverInstanceNoList.1=26055342"
            )
        );
    }

    #[test]
    fn detail_path_uses_single_instance_param() {
        assert_eq!(
            detail_path("25741251"),
            "/vserver/v2/getServerInstanceDetail?responseFormatType=json&serverInstanceNo=25741251"
        );
    }

    #[test]
    fn response_keys() {
        assert_eq!(
            PowerAction::Start.response_key(),
            "startServerInstancesResponse"
        );
        assert_eq!(PowerAction::Stop.response_key(), "stopServerInstancesResponse");
    }

    #[test]
    fn status_round_trips_names() {
        for name in ["running", "booting", "stopped", "shutting down"] {
            assert_eq!(ServerStatus::from_name(name).as_str(), name);
        }
        assert_eq!(
            ServerStatus::from_name("init"),
            ServerStatus::Other("init".to_string())
        );
    }
}
