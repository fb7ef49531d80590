//! Sends alert notifications to a Telegram chat.

pub mod cli;
pub mod config;
pub mod notifier;
