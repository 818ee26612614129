//! Startup banner for the listener.

use crate::config::ServerMap;

/// Listener configuration for display in the startup banner.
pub struct BannerInfo<'a> {
    pub api_url: &'a str,
    pub servers: &'a ServerMap,
    pub allowed_chats: &'a [String],
    pub poll_timeout_secs: u64,
}

/// Render the banner. Secrets never appear in it.
pub fn render_banner(info: &BannerInfo) -> String {
    let chats = if info.allowed_chats.is_empty() {
        "any".to_string()
    } else {
        info.allowed_chats.join(", ")
    };

    format!(
        r#"
   ╔═══════════════════════════════════════╗
   ║             N C P B O T               ║
   ║     servers on call, from the chat    ║
   ╚═══════════════════════════════════════╝

   version   {}
   api       {}
   servers   {}
   chats     {}
   poll      {}s
"#,
        env!("CARGO_PKG_VERSION"),
        info.api_url,
        info.servers,
        chats,
        info.poll_timeout_secs,
    )
}

pub fn print_banner(info: &BannerInfo) {
    println!("{}", render_banner(info));
}
