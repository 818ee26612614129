//! API gateway request signing (signature v2).

use base64::{Engine, engine::general_purpose::STANDARD};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Current time in milliseconds since the Unix epoch.
pub fn timestamp_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Sign a request for the API gateway.
///
/// The canonical string is `"<METHOD> <path+query>\n<timestamp>\n<access key>"`,
/// MAC'd with HMAC-SHA256 under the secret key and returned as padded base64.
/// `timestamp` must be the exact value sent in the timestamp header.
pub fn make_signature(
    method: &str,
    path_and_query: &str,
    timestamp: u64,
    access_key: &str,
    secret_key: &str,
) -> String {
    let message = format!("{method} {path_and_query}\n{timestamp}\n{access_key}");

    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(message.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}
