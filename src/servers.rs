//! Turns vserver API results into the text reported to users.
//!
//! Every method returns the message body only; callers prefix it with the
//! instance it concerns (see [`tagged`](crate::consts::tagged)).

use tracing::{info, warn};

use crate::consts::MSG_STATE_UNAVAILABLE;
use crate::ncp::response::{ApiError, classify, instance_status};
use crate::ncp::{PowerAction, ServerApi, ServerStatus};

pub struct ServerManager {
    api: Box<dyn ServerApi>,
}

impl ServerManager {
    pub fn new(api: Box<dyn ServerApi>) -> Self {
        Self { api }
    }

    /// Start or stop an instance and describe the outcome.
    pub async fn power(&self, instance: &str, action: PowerAction) -> String {
        let method = action.response_key();
        info!(instance, method, "power action");

        let body = match self.api.power(instance, action).await {
            Ok(body) => body,
            Err(e) => {
                warn!(instance, method, error = %format!("{e:#}"), "power request failed");
                return format!("[네트워크 오류]\n{e:#}");
            }
        };

        match classify(&body, method) {
            Ok(_) => format!("[성공]\nmethod: {method}"),
            Err(err) => {
                warn!(instance, method, error = ?err, "power action rejected");
                match err.class() {
                    Some(n) => format!(
                        "[서버 오류 발생{n}]\nmethod: {method}\nmessage: {}",
                        err.message()
                    ),
                    None => format!("[시스템 오류]\n{}", err.message()),
                }
            }
        }
    }

    /// Describe the current status of an instance.
    pub async fn state(&self, instance: &str) -> String {
        let body = match self.api.detail(instance).await {
            Ok(body) => body,
            Err(e) => {
                warn!(instance, error = %format!("{e:#}"), "status request failed");
                return format!("[서버 상태 조회 오류]\n{e:#}");
            }
        };

        match instance_status(&body) {
            Ok(status) => format!("[서버 상태]\n서버 번호: {instance}\n현재 상태: {status}"),
            Err(err) => {
                warn!(instance, error = ?err, "status unavailable");
                MSG_STATE_UNAVAILABLE.to_string()
            }
        }
    }

    /// Compare an instance's status with `expected`. `None` when they match,
    /// otherwise a message describing the mismatch or the failure.
    pub async fn verify(&self, instance: &str, expected: &ServerStatus) -> Option<String> {
        let body = match self.api.detail(instance).await {
            Ok(body) => body,
            Err(e) => return Some(format!("[네트워크 오류]\n{e:#}")),
        };

        match instance_status(&body) {
            Ok(actual) if &actual == expected => None,
            Ok(actual) => Some(format!(
                "[서버 상태 체크 필요]\n상태 : {expected}\n현재상태 : {actual}"
            )),
            Err(err) => Some(describe_error(&err)),
        }
    }
}

fn describe_error(err: &ApiError) -> String {
    match err.class() {
        Some(n) => format!("[서버 오류 발생{n}]\nmessage : {}", err.message()),
        None => format!("[시스템 오류]\n{}", err.message()),
    }
}
