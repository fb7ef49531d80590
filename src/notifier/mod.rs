use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::{Config, TELEGRAM};

pub mod sink;
pub mod telegram;

pub use sink::{LogFacade, LogSink, NullSink};
pub use telegram::{Message, Telegram};

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, title: &str, hostname: &str, body: &str) -> Result<(), NotifyError>;
}

/// Why a single send failed. None of these are retried.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("failed to encode message")]
    Encoding(#[from] serde_json::Error),

    #[error("failed to send request")]
    Transport(#[source] reqwest::Error),

    #[error("failed to send successful request. Status was {:?}{}", status_text(.status), described(.description))]
    Delivery {
        status: StatusCode,
        description: Option<String>,
    },
}

impl NotifyError {
    /// Status of the rejected response, for delivery failures only.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            NotifyError::Delivery { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn status_text(status: &StatusCode) -> String {
    status.to_string()
}

fn described(description: &Option<String>) -> String {
    match description {
        Some(d) => format!(": {}", d),
        None => String::new(),
    }
}

/// Builds the messenger named in the config.
pub fn from_config(config: &Config) -> Result<Box<dyn Notifier>> {
    let messenger = config
        .messenger
        .as_ref()
        .ok_or_else(|| anyhow!("no messenger config"))?;

    match messenger.r#type.as_str() {
        TELEGRAM => {
            let mut telegram = Telegram::new(&messenger.token, messenger.chat_id);
            if let Some(url) = messenger.api_url.as_ref() {
                telegram = telegram.with_api_url(url);
            }
            Ok(Box::new(telegram))
        }
        other => Err(anyhow!("unsupported messenger type \"{}\"", other)),
    }
}
