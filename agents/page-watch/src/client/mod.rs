//! Telegram notifier
//!
//! Sends alert texts to one chat through the Bot API `sendMessage` call.
//! Delivery is best-effort: the poll loop never sees a notification error.

use crate::config::TelegramConfig;
use crate::error::NotifyError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Destination for alert texts
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text`; failures are logged and dropped
    async fn send(&self, text: &str);
}

/// Telegram Bot API client
pub struct TelegramClient {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramClient {
    /// Create new client
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Post one message to the configured chat
    pub async fn send_message(&self, text: &str) -> Result<(), NotifyError> {
        let url = self.config.send_message_url();

        let form = SendMessageForm {
            chat_id: &self.config.chat_id,
            text,
        };

        let response = self
            .client
            .post(&url)
            .form(&form)
            .timeout(self.config.timeout)
            .send()
            .await
            // The request URL carries the bot token
            .map_err(|e| NotifyError::Network(e.without_url().to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiReply>(&error_text)
                .ok()
                .and_then(|reply| reply.description)
                .unwrap_or(error_text);
            Err(NotifyError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

#[async_trait::async_trait]
impl Notifier for TelegramClient {
    async fn send(&self, text: &str) {
        match self.send_message(text).await {
            Ok(()) => tracing::debug!(chat_id = %self.config.chat_id, "Notification sent"),
            Err(e) => tracing::error!(error = %e, "Telegram error"),
        }
    }
}

#[derive(Debug, Serialize)]
struct SendMessageForm<'a> {
    chat_id: &'a str,
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TelegramClient {
        TelegramClient::new(TelegramConfig::new("123:secret", "4242").with_api_base(server.uri()))
    }

    #[tokio::test]
    async fn test_send_message_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:secret/sendMessage"))
            .and(body_string_contains("chat_id=4242"))
            .and(body_string_contains("text=page+changed"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"ok":true,"result":{}}"#))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server).send_message("page changed").await.unwrap();
    }

    #[tokio::test]
    async fn test_api_error_uses_description() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string(
                r#"{"ok":false,"error_code":400,"description":"Bad Request: chat not found"}"#,
            ))
            .mount(&server)
            .await;

        let err = client_for(&server).send_message("hi").await.unwrap_err();
        match err {
            NotifyError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Bad Request: chat not found");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_api_error_falls_back_to_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server).send_message("hi").await.unwrap_err();
        assert_eq!(err.to_string(), "API error 502: bad gateway");
    }

    #[tokio::test]
    async fn test_network_error_hides_token() {
        // Nothing listens on port 9 of localhost
        let client = TelegramClient::new(
            TelegramConfig::new("123:secret", "4242").with_api_base("http://127.0.0.1:9"),
        )
        .with_timeout(Duration::from_millis(500));

        let err = client.send_message("hi").await.unwrap_err();
        assert!(matches!(err, NotifyError::Network(_)));
        assert!(!err.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_notifier_swallows_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        // Must return normally
        client_for(&server).send("hi").await;
    }
}
