use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use ncpbot::banner::{BannerInfo, print_banner};
use ncpbot::bot::Listener;
use ncpbot::config::Config;
use ncpbot::consts::MSG_HOLIDAY_EXIT;
use ncpbot::holiday::HolidayCalendar;
use ncpbot::ncp::{NcpClient, PowerAction, ServerStatus};
use ncpbot::servers::ServerManager;
use ncpbot::sweep::{self, Notifier, Sweep};
use ncpbot::telegram::TelegramClient;

#[derive(Parser)]
#[command(
    name = "ncpbot",
    version,
    about = "Start, stop and check NAVER Cloud servers from the shell or a Telegram chat."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Run `set`/`get` even when today is a public holiday
    #[arg(long, global = true, default_value_t = false)]
    ignore_holidays: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Start or stop every configured server
    Set {
        /// `on` or `off`
        #[arg(value_parser = parse_power_state)]
        state: PowerAction,
    },
    /// Check that every configured server is in the expected state
    Get {
        /// `running` or `stopped`
        #[arg(value_parser = parse_expected_status)]
        status: ServerStatus,
    },
    /// Answer chat commands until interrupted
    Listen,
    /// Send a message or photos to the configured chat
    Notify {
        /// Message text, or the caption when photos are given
        text: Option<String>,

        /// Photo file or http(s) URL; repeat to send an album of files
        #[arg(long = "photo")]
        photos: Vec<String>,

        /// Send the text to the test chat instead (text only)
        #[arg(long, default_value_t = false, conflicts_with = "photos")]
        test: bool,
    },
}

fn parse_power_state(s: &str) -> Result<PowerAction, String> {
    match s {
        "on" => Ok(PowerAction::Start),
        "off" => Ok(PowerAction::Stop),
        _ => Err("Invalid state. Use 'on' or 'off'.".to_string()),
    }
}

fn parse_expected_status(s: &str) -> Result<ServerStatus, String> {
    match s {
        "running" => Ok(ServerStatus::Running),
        "stopped" => Ok(ServerStatus::Stopped),
        _ => Err("Invalid state. Use 'running' or 'stopped'.".to_string()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let telegram = TelegramClient::new(
        &config.telegram_api_url,
        &config.telegram_bot_token,
        &config.telegram_chat_id,
        config.telegram_chat_test_id.clone(),
    );
    let manager = ServerManager::new(Box::new(NcpClient::new(
        &config.ncp_api_url,
        &config.access_key,
        &config.secret_key,
    )));

    let sweep = match cli.command {
        Command::Set { state } => Sweep::Power(state),
        Command::Get { status } => Sweep::Verify(status),
        Command::Listen => {
            print_banner(&BannerInfo {
                api_url: &config.ncp_api_url,
                servers: &config.servers,
                allowed_chats: &config.allowed_chat_ids,
                poll_timeout_secs: config.poll_timeout_secs,
            });
            let listener = Listener::new(manager, config.servers, config.poll_timeout_secs)
                .with_allowed_chats(config.allowed_chat_ids);
            return listener.run(&telegram).await;
        }
        Command::Notify { text, photos, test } => {
            return notify(&telegram, text.as_deref(), &photos, test).await;
        }
    };

    let calendar = HolidayCalendar::korean(config.extra_holidays);
    if !cli.ignore_holidays && calendar.is_today_holiday() {
        println!("{MSG_HOLIDAY_EXIT}");
        return Ok(());
    }

    let notifier = Notifier {
        messenger: &telegram,
        chat_id: &config.telegram_chat_id,
    };
    for line in sweep::run(&manager, &config.servers, &notifier, &sweep).await {
        println!("{line}");
    }
    Ok(())
}

async fn notify(
    telegram: &TelegramClient,
    text: Option<&str>,
    photos: &[String],
    test: bool,
) -> anyhow::Result<()> {
    match (photos, text) {
        ([], None) => bail!("nothing to send: give a message or --photo"),
        ([], Some(text)) if test => telegram.send_test_message(text).await,
        ([], Some(text)) => telegram.notify(text).await,
        ([photo], caption) => {
            let sent = telegram.send_photo(photo, caption.unwrap_or_default()).await?;
            info!(message_id = sent.message_id, "photo sent");
            Ok(())
        }
        (photos, caption) => {
            let paths: Vec<PathBuf> = photos.iter().map(PathBuf::from).collect();
            let sent = telegram
                .send_media_group(&paths, caption.unwrap_or_default())
                .await?;
            info!(count = sent.len(), "album sent");
            Ok(())
        }
    }
}
