//! HTTP client for the Telegram Bot API.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Serialize;

use super::types::{ApiEnvelope, FileInfo, Update};
use super::TelegramError;

const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Operations the message handler needs from the platform.
///
/// The handler depends on this trait rather than on `TelegramClient`, so
/// tests run against a recording mock.
#[async_trait]
pub trait BotApi {
    /// Send a plain-text message to a chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError>;

    /// Resolve a file_id and download its content to `dest`.
    async fn download_document(&self, file_id: &str, dest: &Path) -> Result<(), TelegramError>;
}

pub struct TelegramClient {
    /// `{base}/bot{token}` — Bot API methods hang off this.
    method_base: String,
    /// `{base}/file/bot{token}` — file content downloads hang off this.
    file_base: String,
    client: reqwest::Client,
}

impl TelegramClient {
    pub fn new(token: &str) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, token)
    }

    /// Point the client at a different API host (tests).
    pub fn with_api_base(base: &str, token: &str) -> Self {
        // Connect timeout only: getUpdates long-polls, so a total request
        // timeout would cut every idle poll short.
        let client = reqwest::Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        let base = base.trim_end_matches('/');
        Self {
            method_base: format!("{base}/bot{token}"),
            file_base: format!("{base}/file/bot{token}"),
            client,
        }
    }

    /// Long-poll for updates with `update_id >= offset`.
    pub async fn get_updates(
        &self,
        offset: i64,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, TelegramError> {
        let url = format!("{}/getUpdates", self.method_base);
        let body = GetUpdatesRequest {
            offset,
            timeout: timeout_secs,
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_transport)?;

        read_envelope(response).await
    }
}

#[async_trait]
impl BotApi for TelegramClient {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        let url = format!("{}/sendMessage", self.method_base);
        let body = SendMessageRequest { chat_id, text };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(map_transport)?;

        // sendMessage echoes the sent message back; only acceptance matters.
        let _: serde_json::Value = read_envelope(response).await?;
        Ok(())
    }

    async fn download_document(&self, file_id: &str, dest: &Path) -> Result<(), TelegramError> {
        let url = format!("{}/getFile", self.method_base);
        let response = self
            .client
            .post(&url)
            .json(&GetFileRequest { file_id })
            .send()
            .await
            .map_err(map_transport)?;

        let info: FileInfo = read_envelope(response).await?;
        let file_path = info
            .file_path
            .ok_or_else(|| TelegramError::MissingFilePath(file_id.to_string()))?;

        let file_url = format!("{}/{}", self.file_base, file_path);
        let response = self
            .client
            .get(&file_url)
            .send()
            .await
            .map_err(map_transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TelegramError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| TelegramError::Http(e.to_string()))?;
        tokio::fs::write(dest, &bytes).await?;

        tracing::debug!(
            file_id,
            bytes = bytes.len(),
            dest = %dest.display(),
            "Document downloaded"
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct GetUpdatesRequest {
    offset: i64,
    timeout: u64,
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Serialize)]
struct GetFileRequest<'a> {
    file_id: &'a str,
}

fn map_transport(e: reqwest::Error) -> TelegramError {
    if e.is_connect() {
        TelegramError::Connection(e.to_string())
    } else if e.is_timeout() {
        TelegramError::Timeout(e.to_string())
    } else {
        TelegramError::Http(e.to_string())
    }
}

/// Unwrap a Bot API response: non-2xx statuses, `ok: false` envelopes, and
/// parse failures each map to their own error.
async fn read_envelope<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, TelegramError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(TelegramError::Status {
            status: status.as_u16(),
            body,
        });
    }

    let envelope: ApiEnvelope<T> = response
        .json()
        .await
        .map_err(|e| TelegramError::ResponseParsing(e.to_string()))?;

    if !envelope.ok {
        return Err(TelegramError::Api(
            envelope
                .description
                .unwrap_or_else(|| "no description".to_string()),
        ));
    }

    envelope
        .result
        .ok_or_else(|| TelegramError::ResponseParsing("ok response with no result".to_string()))
}

/// Recording mock for handler tests — collects outbound messages and serves
/// a fixed byte payload for downloads.
pub struct MockBotApi {
    /// Messages sent, in order: (chat_id, text).
    pub sent: Mutex<Vec<(i64, String)>>,
    /// Bytes written to `dest` when a download is requested.
    pub document_bytes: Vec<u8>,
    /// Where the last download landed.
    pub downloaded_to: Mutex<Option<PathBuf>>,
    /// Fail downloads instead of writing.
    pub fail_download: bool,
}

impl MockBotApi {
    pub fn new(document_bytes: Vec<u8>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            document_bytes,
            downloaded_to: Mutex::new(None),
            fail_download: false,
        }
    }

    pub fn failing_download() -> Self {
        Self {
            fail_download: true,
            ..Self::new(Vec::new())
        }
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn download_dest(&self) -> Option<PathBuf> {
        self.downloaded_to.lock().unwrap().clone()
    }
}

#[async_trait]
impl BotApi for MockBotApi {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<(), TelegramError> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }

    async fn download_document(&self, file_id: &str, dest: &Path) -> Result<(), TelegramError> {
        *self.downloaded_to.lock().unwrap() = Some(dest.to_path_buf());
        if self.fail_download {
            return Err(TelegramError::MissingFilePath(file_id.to_string()));
        }
        std::fs::write(dest, &self.document_bytes)?;
        Ok(())
    }
}
