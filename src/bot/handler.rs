//! Inbound update routing and the document flow.

use std::path::Path;
use std::sync::Arc;

use crate::bot::chunker::chunk_text;
use crate::bot::messages;
use crate::config::MAX_MESSAGE_LEN;
use crate::extraction::{ExtractionOutcome, ExtractionPipeline};
use crate::telegram::client::BotApi;
use crate::telegram::types::{Document, Update};

/// Routes updates to the command replies and the document flow.
pub struct MessageHandler {
    pipeline: Arc<ExtractionPipeline>,
}

impl MessageHandler {
    pub fn new(pipeline: Arc<ExtractionPipeline>) -> Self {
        Self { pipeline }
    }

    /// Handle one update. Never propagates: failures are logged and, where
    /// the user should know, reported as a canned reply.
    pub async fn handle_update(&self, api: &(dyn BotApi + Send + Sync), update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let chat_id = message.chat.id;

        if let Some(document) = &message.document {
            self.handle_document(api, chat_id, document).await;
            return;
        }

        match message.text.as_deref().and_then(command_token) {
            Some("/start") => self.reply(api, chat_id, messages::WELCOME).await,
            Some("/help") => self.reply(api, chat_id, messages::HELP).await,
            _ => {}
        }
    }

    async fn handle_document(
        &self,
        api: &(dyn BotApi + Send + Sync),
        chat_id: i64,
        document: &Document,
    ) {
        if document.mime_type.as_deref() != Some("application/pdf") {
            tracing::info!(chat_id, mime = ?document.mime_type, "Rejecting non-PDF document");
            self.reply(api, chat_id, messages::NOT_A_PDF).await;
            return;
        }

        // Scratch storage scoped to this message; removed when the guard
        // drops, whichever way this function exits.
        let scratch = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(err) => {
                tracing::error!(chat_id, error = %err, "Failed to create scratch directory");
                self.reply(api, chat_id, messages::PROCESSING_FAILED).await;
                return;
            }
        };
        let pdf_path = scratch.path().join(scratch_file_name(document));

        if let Err(err) = api.download_document(&document.file_id, &pdf_path).await {
            tracing::error!(chat_id, error = %err, "Document download failed");
            return;
        }

        let pipeline = Arc::clone(&self.pipeline);
        let task_path = pdf_path.clone();
        let result = tokio::task::spawn_blocking(move || pipeline.extract(&task_path)).await;

        match result {
            Ok(Ok(ExtractionOutcome::Extracted(extracted))) => {
                tracing::info!(
                    chat_id,
                    method = ?extracted.method,
                    pages = extracted.page_count,
                    chars = extracted.text.chars().count(),
                    "Extraction complete"
                );
                for chunk in chunk_text(&extracted.text, MAX_MESSAGE_LEN) {
                    if let Err(err) = api.send_message(chat_id, chunk).await {
                        tracing::error!(chat_id, error = %err, "Failed to send text chunk");
                        return;
                    }
                }
            }
            Ok(Ok(ExtractionOutcome::NoText)) => {
                tracing::info!(chat_id, "No text found in document");
                self.reply(api, chat_id, messages::NO_TEXT_FOUND).await;
            }
            Ok(Err(err)) => {
                tracing::error!(chat_id, error = %err, "Extraction failed");
                self.reply(api, chat_id, messages::PROCESSING_FAILED).await;
            }
            Err(err) => {
                // A panic inside the PDF parser lands here, not in the
                // process: report it like any other extraction failure.
                tracing::error!(chat_id, error = %err, "Extraction task panicked");
                self.reply(api, chat_id, messages::PROCESSING_FAILED).await;
            }
        }
    }

    async fn reply(&self, api: &(dyn BotApi + Send + Sync), chat_id: i64, text: &str) {
        if let Err(err) = api.send_message(chat_id, text).await {
            tracing::error!(chat_id, error = %err, "Failed to send reply");
        }
    }
}

/// First whitespace-delimited token of a command message, with any
/// `@botname` suffix stripped (group-chat addressing).
fn command_token(text: &str) -> Option<&str> {
    let token = text.split_whitespace().next()?;
    if !token.starts_with('/') {
        return None;
    }
    token.split('@').next()
}

/// The attachment's own name, reduced to its final path component.
fn scratch_file_name(document: &Document) -> &str {
    document
        .file_name
        .as_deref()
        .and_then(|name| Path::new(name).file_name())
        .and_then(|name| name.to_str())
        .unwrap_or("document.pdf")
}
