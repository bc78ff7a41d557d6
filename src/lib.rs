pub mod bot;
pub mod config;
pub mod extraction;
pub mod telegram;

use std::sync::Arc;

use thiserror::Error;
use tracing_subscriber::EnvFilter;

use crate::bot::MessageHandler;
use crate::config::BotConfig;
use crate::telegram::client::TelegramClient;
use crate::telegram::poller;

/// Errors that prevent the bot from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}

/// Wire the collaborators and run the poll loop until the process is killed.
///
/// The tracing subscriber is constructed here, once; nothing else in the
/// crate touches logging configuration.
pub async fn run() -> Result<(), StartupError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();

    let cfg = BotConfig::from_env()?;
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let client = TelegramClient::new(&cfg.token);
    let pipeline = Arc::new(extraction::build_pipeline());
    let handler = MessageHandler::new(pipeline);

    poller::run_polling(&client, &handler).await;
    Ok(())
}
