//! Page Watch Agent entry point
//!
//! Runs the keep-alive server next to the poll loop, or fingerprints a page
//! once for inspection.

use clap::{Args, Parser, Subcommand};
use page_watch::client::TelegramClient;
use page_watch::config::*;
use page_watch::engine::{PageMonitor, SignatureExtractor};
use page_watch::handler;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "page-watch")]
#[command(about = "Page Watch Agent - single-page change alerts over Telegram")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Monitor the page and serve the keep-alive endpoint
    Run(RunArgs),

    /// Fingerprint a page once and print it
    Check {
        /// Page URL
        #[arg(short, long, env = "MONITOR_URL", default_value = DEFAULT_URL)]
        url: String,

        /// Fetch timeout in seconds
        #[arg(long, env = "FETCH_TIMEOUT_SECONDS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
        fetch_timeout_secs: u64,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Telegram bot token
    #[arg(long, env = "BOT_TOKEN", hide_env_values = true)]
    bot_token: String,

    /// Telegram chat to alert
    #[arg(long, env = "CHAT_ID")]
    chat_id: String,

    /// Page URL
    #[arg(short, long, env = "MONITOR_URL", default_value = DEFAULT_URL)]
    url: String,

    /// Name used in alert texts
    #[arg(long, env = "MONITOR_LABEL", default_value = DEFAULT_LABEL)]
    label: String,

    /// File holding the last fingerprint
    #[arg(long, env = "STATE_FILE", default_value = DEFAULT_STATE_FILE)]
    state_file: PathBuf,

    /// Seconds between checks
    #[arg(long, env = "CHECK_EVERY_SECONDS", default_value_t = DEFAULT_INTERVAL_SECS)]
    interval_secs: u64,

    /// Fetch timeout in seconds
    #[arg(long, env = "FETCH_TIMEOUT_SECONDS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    fetch_timeout_secs: u64,

    /// Telegram Bot API base URL
    #[arg(long, env = "TELEGRAM_API_BASE", default_value = DEFAULT_TELEGRAM_API)]
    telegram_api: String,

    /// Host to bind the keep-alive server to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,
}

impl RunArgs {
    fn into_configs(self) -> (MonitorConfig, TelegramConfig, ServerConfig) {
        let monitor = MonitorConfig {
            url: self.url,
            label: self.label,
            state_file: self.state_file,
            interval: Duration::from_secs(self.interval_secs),
            fetch_timeout: Duration::from_secs(self.fetch_timeout_secs),
        };
        let telegram =
            TelegramConfig::new(self.bot_token, self.chat_id).with_api_base(self.telegram_api);
        let server = ServerConfig {
            host: self.host,
            port: self.port,
        };
        (monitor, telegram, server)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => {
            let (monitor_config, telegram_config, server_config) = args.into_configs();

            let addr = server_config.socket_addr()?;
            let listener = tokio::net::TcpListener::bind(addr).await?;
            tracing::info!("Keep-alive server listening on {}", addr);

            tokio::spawn(async move {
                if let Err(e) = handler::serve(listener).await {
                    tracing::error!(error = %e, "Keep-alive server stopped");
                }
            });

            tracing::info!(
                url = %monitor_config.url,
                state_file = %monitor_config.state_file.display(),
                telegram = ?telegram_config,
                "Starting Page Watch Agent"
            );

            let extractor = SignatureExtractor::new(monitor_config.fetch_timeout)?;
            let notifier = TelegramClient::new(telegram_config);
            let monitor = PageMonitor::new(monitor_config, Box::new(extractor), Box::new(notifier));

            monitor.run().await?;
        }

        Commands::Check {
            url,
            fetch_timeout_secs,
        } => {
            let extractor = SignatureExtractor::new(Duration::from_secs(fetch_timeout_secs))?;

            match extractor.fetch(&url).await {
                Ok(fingerprint) => {
                    println!(
                        "{}",
                        serde_json::json!({
                            "url": url,
                            "fingerprint": fingerprint,
                            "checked_at": chrono::Utc::now(),
                        })
                    );
                }
                Err(e) => {
                    eprintln!("Fetch failed: {}", e);
                    std::process::exit(1);
                }
            }
        }
    }

    Ok(())
}
