pub mod banner;
pub mod bot;
pub mod commands;
pub mod config;
pub mod consts;
pub mod holiday;
pub mod ncp;
pub mod servers;
pub mod sweep;
pub mod telegram;

#[cfg(test)]
mod test_http;
