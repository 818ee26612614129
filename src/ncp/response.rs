//! Classification of vserver API response bodies.
//!
//! The gateway reports failures inside a JSON body rather than through the
//! HTTP status, in one of three shapes. Which key is present decides the
//! class; nothing else about the body is inspected.

use serde_json::Value;

use super::ServerStatus;

/// A failure reported by the API. Errors are information, not failures:
/// they are formatted into chat text, never propagated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// `responseError` from the API gateway (signature, permission, throttling).
    Gateway(String),
    /// `error` from the auth layer, `message` joined with `details`.
    Auth(String),
    /// The action ran but returned a non-zero `returnCode`.
    Action(String),
    /// The body matched none of the known shapes.
    Malformed(String),
}

impl ApiError {
    /// Numbered class used in chat messages (`[서버 오류 발생<n>]`).
    /// `None` for bodies that could not be classified.
    pub fn class(&self) -> Option<u8> {
        match self {
            ApiError::Gateway(_) => Some(1),
            ApiError::Auth(_) => Some(2),
            ApiError::Action(_) => Some(3),
            ApiError::Malformed(_) => None,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::Gateway(m)
            | ApiError::Auth(m)
            | ApiError::Action(m)
            | ApiError::Malformed(m) => m,
        }
    }
}

/// Check a body for the action whose result lives under `response_key`.
/// Returns the action's payload on success.
pub fn classify<'a>(body: &'a Value, response_key: &str) -> Result<&'a Value, ApiError> {
    if let Some(err) = body.get("responseError") {
        return Err(ApiError::Gateway(text(err, "returnMessage")));
    }

    if let Some(err) = body.get("error") {
        let message = text(err, "message");
        let details = text(err, "details");
        let joined = if details.is_empty() {
            message
        } else {
            format!("{message} {details}")
        };
        return Err(ApiError::Auth(joined));
    }

    let payload = body
        .get(response_key)
        .ok_or_else(|| ApiError::Malformed(format!("missing {response_key}")))?;

    if return_code(payload) != "0" {
        return Err(ApiError::Action(text(payload, "returnMessage")));
    }

    Ok(payload)
}

/// Status of the first instance in a `getServerInstanceDetail` body.
pub fn instance_status(body: &Value) -> Result<ServerStatus, ApiError> {
    let payload = classify(body, "getServerInstanceDetailResponse")?;
    payload
        .get("serverInstanceList")
        .and_then(|list| list.get(0))
        .and_then(|instance| instance.get("serverInstanceStatusName"))
        .and_then(Value::as_str)
        .map(ServerStatus::from_name)
        .ok_or_else(|| ApiError::Malformed("no server instance in response".to_string()))
}

fn text(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

// The API sends returnCode as a string, but be lenient about numbers.
fn return_code(payload: &Value) -> String {
    match payload.get("returnCode") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}
