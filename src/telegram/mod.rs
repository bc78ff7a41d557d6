pub mod client;
pub mod poller;
pub mod types;

pub use client::{BotApi, MockBotApi, TelegramClient};
pub use types::*;

use thiserror::Error;

/// Errors from the Bot API transport.
#[derive(Debug, Error)]
pub enum TelegramError {
    #[error("Connection to Telegram failed: {0}")]
    Connection(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("HTTP client error: {0}")]
    Http(String),

    #[error("Telegram returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Telegram rejected the request: {0}")]
    Api(String),

    #[error("Response parsing failed: {0}")]
    ResponseParsing(String),

    #[error("File {0} has no download path")]
    MissingFilePath(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
