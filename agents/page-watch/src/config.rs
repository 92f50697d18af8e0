//! Runtime configuration
//!
//! Loaded once by the binary and handed to constructors.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_URL: &str = "https://www.firstcry.com/hot-wheels/0/0/113";
pub const DEFAULT_LABEL: &str = "FirstCry Hot Wheels";
pub const DEFAULT_STATE_FILE: &str = "last_hash.txt";
pub const DEFAULT_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_NOTIFY_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_TELEGRAM_API: &str = "https://api.telegram.org";
pub const DEFAULT_PORT: u16 = 8080;

/// What to watch and how often
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Page to fingerprint
    pub url: String,
    /// Human name used in alert texts
    pub label: String,
    /// Where the last fingerprint lives
    pub state_file: PathBuf,
    /// Sleep between ticks
    pub interval: Duration,
    /// Bound on a single page fetch
    pub fetch_timeout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            label: DEFAULT_LABEL.to_string(),
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

/// Telegram Bot API credentials and endpoint
#[derive(Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    pub api_base: String,
    pub timeout: Duration,
}

impl TelegramConfig {
    pub fn new(bot_token: impl Into<String>, chat_id: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            chat_id: chat_id.into(),
            ..Default::default()
        }
    }

    /// Point at a different API host (tests, proxies)
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base.trim_end_matches('/'),
            self.bot_token
        )
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_base: DEFAULT_TELEGRAM_API.to_string(),
            timeout: Duration::from_secs(DEFAULT_NOTIFY_TIMEOUT_SECS),
        }
    }
}

// Token stays out of logs
impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("bot_token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Liveness server bind address
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitor_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.url, DEFAULT_URL);
        assert_eq!(config.interval, Duration::from_secs(30));
        assert_eq!(config.fetch_timeout, Duration::from_secs(20));
        assert_eq!(config.state_file, PathBuf::from("last_hash.txt"));
    }

    #[test]
    fn test_send_message_url() {
        let config = TelegramConfig::new("123:abc", "42").with_api_base("http://localhost:9000/");
        assert_eq!(
            config.send_message_url(),
            "http://localhost:9000/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = TelegramConfig::new("123:very-secret", "42");
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("<redacted>"));
        assert!(rendered.contains("42"));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::default();
        assert_eq!(config.socket_addr().unwrap().port(), 8080);

        let bad = ServerConfig {
            host: "not a host".to_string(),
            port: 1,
        };
        assert!(bad.socket_addr().is_err());
    }
}
