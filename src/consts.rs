//! Project-wide constants.

/// NAVER Cloud API gateway.
pub const DEFAULT_NCP_API_URL: &str = "https://ncloud.apigw.ntruss.com";

/// Telegram Bot API root. The bot token is appended as `/bot<token>`.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Server aliases used when `SERVERS` is not set.
pub const DEFAULT_SERVERS: &str = "1=25741251,2=26055342";

/// Long-poll timeout for `getUpdates`, in seconds.
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

pub const HEADER_TIMESTAMP: &str = "x-ncp-apigw-timestamp";
pub const HEADER_ACCESS_KEY: &str = "x-ncp-iam-access-key";
pub const HEADER_SIGNATURE: &str = "x-ncp-apigw-signature-v2";

// --- Chat replies ---

pub const HELP_HEADER: &str = "[도움말] 사용 가능한 명령어 목록입니다:";
pub const MSG_UNKNOWN_COMMAND: &str = "[에러] 등록되지 않은 명령어입니다\n/도움말 을 확인해주세요";
pub const MSG_INVALID_SERVER: &str = "[에러] 유효하지 않은 서버 번호입니다.";
pub const MSG_STATE_UNAVAILABLE: &str = "[오류] 서버 상태를 가져올 수 없습니다.";
pub const MSG_HOLIDAY_EXIT: &str = "공휴일 종료";

/// Reply for `/start`, `/stop` or `/state` without exactly one server number.
pub fn usage_message(command: &str) -> String {
    format!("[에러] 명령어를 올바르게 입력해주세요\n\n{command} 서버번호")
}

/// Prefix a message with the server it concerns, e.g. `[25741251]`.
pub fn tagged(target: &str, message: &str) -> String {
    format!("[{target}]{message}")
}
