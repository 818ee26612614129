use anyhow::{Result, bail};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Mutex;

use super::{PowerAction, ServerApi};

/// A scripted API for tests. Unscripted calls succeed with a minimal body;
/// every call is recorded as `"<action> <instance>"`.
#[derive(Default)]
pub struct MockServerApi {
    replies: Mutex<HashMap<String, Result<Value, String>>>,
    calls: Mutex<Vec<String>>,
}

impl MockServerApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `body` to power `action` on `instance`.
    pub fn on_power(self, instance: &str, action: PowerAction, body: Value) -> Self {
        self.script(call_key(action.api_action(), instance), Ok(body))
    }

    /// Reply with `body` to a detail lookup on `instance`.
    pub fn on_detail(self, instance: &str, body: Value) -> Self {
        self.script(call_key("getServerInstanceDetail", instance), Ok(body))
    }

    /// Report the given status for `instance`.
    pub fn with_status(self, instance: &str, status: &str) -> Self {
        self.on_detail(instance, detail_body(instance, status))
    }

    /// Fail every call touching `instance` as if the network were down.
    pub fn unreachable(self, instance: &str, reason: &str) -> Self {
        let keys = [
            call_key("startServerInstances", instance),
            call_key("stopServerInstances", instance),
            call_key("getServerInstanceDetail", instance),
        ];
        keys.into_iter()
            .fold(self, |api, key| api.script(key, Err(reason.to_string())))
    }

    /// Calls made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn script(self, key: String, reply: Result<Value, String>) -> Self {
        self.replies.lock().unwrap().insert(key, reply);
        self
    }

    fn reply(&self, key: String, default: Value) -> Result<Value> {
        self.calls.lock().unwrap().push(key.clone());
        match self.replies.lock().unwrap().get(&key) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(reason)) => bail!("{reason}"),
            None => Ok(default),
        }
    }
}

#[async_trait]
impl ServerApi for MockServerApi {
    async fn power(&self, instance: &str, action: PowerAction) -> Result<Value> {
        let default = json!({
            (action.response_key()): {"returnCode": "0", "returnMessage": "success"}
        });
        self.reply(call_key(action.api_action(), instance), default)
    }

    async fn detail(&self, instance: &str) -> Result<Value> {
        self.reply(
            call_key("getServerInstanceDetail", instance),
            detail_body(instance, "running"),
        )
    }
}

/// A successful `getServerInstanceDetail` body.
pub fn detail_body(instance: &str, status: &str) -> Value {
    json!({
        "getServerInstanceDetailResponse": {
            "returnCode": "0",
            "returnMessage": "success",
            "totalRows": 1,
            "serverInstanceList": [{
                "serverInstanceNo": instance,
                "serverInstanceStatusName": status
            }]
        }
    })
}

fn call_key(action: &str, instance: &str) -> String {
    format!("{action} {instance}")
}
