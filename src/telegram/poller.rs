//! getUpdates long-poll loop.

use std::time::Duration;

use super::client::TelegramClient;
use super::types::Update;
use crate::bot::MessageHandler;
use crate::config;

/// Poll for updates until the process dies, dispatching each update to the
/// handler in arrival order.
///
/// A failed poll is logged and retried after a short pause. Individual
/// updates are never retried: once an offset is advanced past an update,
/// Telegram drops it.
pub async fn run_polling(client: &TelegramClient, handler: &MessageHandler) {
    let mut offset = 0i64;
    tracing::info!(
        timeout_secs = config::POLL_TIMEOUT_SECS,
        "Polling for updates"
    );

    loop {
        let updates = match client.get_updates(offset, config::POLL_TIMEOUT_SECS).await {
            Ok(batch) => batch,
            Err(err) => {
                tracing::error!(error = %err, "getUpdates failed");
                tokio::time::sleep(Duration::from_secs(config::POLL_RETRY_SECS)).await;
                continue;
            }
        };

        if let Some(next) = next_offset(&updates) {
            offset = next;
        }

        for update in updates {
            handler.handle_update(client, update).await;
        }
    }
}

/// Offset acknowledging every update in the batch.
fn next_offset(updates: &[Update]) -> Option<i64> {
    updates.iter().map(|u| u.update_id + 1).max()
}
