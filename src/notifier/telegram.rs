use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use super::sink::{LogFacade, LogSink};
use super::{Notifier, NotifyError};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

const PARSE_MODE: &str = "Markdown";

/// Body of a `sendMessage` call. Field order is the wire order.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub chat_id: i64,
    pub parse_mode: String,
    pub disable_web_page_preview: bool,
    pub disable_notification: bool,
    pub text: String,
}

// Error object the Bot API returns alongside a non-200 status.
#[derive(Deserialize)]
struct ApiError {
    description: Option<String>,
}

/// Sends alerts to one fixed chat.
pub struct Telegram {
    token: String,
    chat_id: i64,
    api_url: String,
    client: reqwest::Client,
    sink: Arc<dyn LogSink>,
}

impl Telegram {
    pub fn new(token: impl Into<String>, chat_id: i64) -> Self {
        Self::with_sink(token, chat_id, Arc::new(LogFacade))
    }

    pub fn with_sink(token: impl Into<String>, chat_id: i64, sink: Arc<dyn LogSink>) -> Self {
        // never log the token
        sink.debug(&format!("created telegram messenger: chat_id {}", chat_id));
        Telegram {
            token: token.into(),
            chat_id,
            api_url: DEFAULT_API_URL.to_string(),
            client: reqwest::Client::new(),
            sink,
        }
    }

    /// Points the messenger at another Bot API server, e.g. a self-hosted one.
    pub fn with_api_url(mut self, api_url: impl AsRef<str>) -> Self {
        self.api_url = api_url.as_ref().trim_end_matches('/').to_string();
        self
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    pub fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_url, self.token)
    }

    pub fn compose(&self, title: &str, hostname: &str, body: &str) -> Message {
        self.sink.debug(&format!(
            "composed telegram message: title {:?}, body {:?}",
            title, body
        ));
        Message {
            chat_id: self.chat_id,
            parse_mode: PARSE_MODE.to_string(),
            disable_web_page_preview: true,
            disable_notification: false,
            text: format!("*{}*\n\n*Host: {}*\n{}\n", title, hostname, body),
        }
    }

    pub async fn send_message(
        &self,
        title: &str,
        hostname: &str,
        body: &str,
    ) -> Result<(), NotifyError> {
        let message = self.compose(title, hostname, body);
        let payload = serde_json::to_vec(&message)?;

        let response = self
            .client
            .post(self.endpoint())
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            // the url carries the token
            .map_err(|e| NotifyError::Transport(e.without_url()))?;

        let status = response.status();
        self.sink
            .debug(&format!("request complete: code {}", status.as_u16()));

        // Drain the body so the connection is released; a failure here does
        // not change the outcome.
        let content = match response.bytes().await {
            Ok(content) => Some(content),
            Err(err) => {
                self.sink
                    .warn(&format!("failed to read response body: {}", err.without_url()));
                None
            }
        };

        if status != StatusCode::OK {
            let description = content.as_deref().and_then(api_description);
            return Err(NotifyError::Delivery {
                status,
                description,
            });
        }

        self.sink.info(&format!("sent message: {}", title));
        Ok(())
    }
}

fn api_description(content: &[u8]) -> Option<String> {
    serde_json::from_slice::<ApiError>(content)
        .ok()
        .and_then(|e| e.description)
}

impl fmt::Debug for Telegram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Telegram")
            .field("token", &"<redacted>")
            .field("chat_id", &self.chat_id)
            .field("api_url", &self.api_url)
            .finish()
    }
}

#[async_trait]
impl Notifier for Telegram {
    async fn send(&self, title: &str, hostname: &str, body: &str) -> Result<(), NotifyError> {
        self.send_message(title, hostname, body).await
    }
}
