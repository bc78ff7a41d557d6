//! Bot API wire types — only the fields this bot routes on.

use serde::Deserialize;

/// One entry from a getUpdates batch.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

/// An inbound chat message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub document: Option<Document>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// A file attachment as the platform describes it.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub file_id: String,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

/// getFile result; `file_path` is relative to the file download base.
#[derive(Debug, Clone, Deserialize)]
pub struct FileInfo {
    pub file_id: String,
    #[serde(default)]
    pub file_path: Option<String>,
}

/// Envelope every Bot API response is wrapped in.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::Deserialize<'de>"))]
pub(crate) struct ApiEnvelope<T> {
    pub ok: bool,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_document_update() {
        let json = r#"{
            "ok": true,
            "result": [{
                "update_id": 873201,
                "message": {
                    "message_id": 52,
                    "from": {"id": 99, "is_bot": false, "first_name": "Ana"},
                    "chat": {"id": 99, "type": "private"},
                    "date": 1726000000,
                    "document": {
                        "file_id": "BQACAgIAAxkBAAIB",
                        "file_unique_id": "AgADmQ",
                        "file_name": "report.pdf",
                        "mime_type": "application/pdf",
                        "file_size": 48213
                    }
                }
            }]
        }"#;

        let envelope: ApiEnvelope<Vec<Update>> = serde_json::from_str(json).unwrap();
        assert!(envelope.ok);
        let updates = envelope.result.unwrap();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].update_id, 873201);

        let message = updates[0].message.as_ref().unwrap();
        assert_eq!(message.chat.id, 99);
        assert!(message.text.is_none());

        let document = message.document.as_ref().unwrap();
        assert_eq!(document.mime_type.as_deref(), Some("application/pdf"));
        assert_eq!(document.file_name.as_deref(), Some("report.pdf"));
    }

    #[test]
    fn deserialize_text_update() {
        let json = r#"{
            "update_id": 873202,
            "message": {
                "message_id": 53,
                "chat": {"id": 99, "type": "private"},
                "date": 1726000001,
                "text": "/start"
            }
        }"#;

        let update: Update = serde_json::from_str(json).unwrap();
        let message = update.message.unwrap();
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert!(message.document.is_none());
    }

    #[test]
    fn deserialize_update_without_message() {
        // Other update kinds (edited messages, callbacks) arrive with no
        // `message` field and must not fail parsing.
        let json = r#"{"update_id": 873203, "edited_message": {"message_id": 1}}"#;
        let update: Update = serde_json::from_str(json).unwrap();
        assert!(update.message.is_none());
    }

    #[test]
    fn deserialize_error_envelope() {
        let json = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
        let envelope: ApiEnvelope<Vec<Update>> = serde_json::from_str(json).unwrap();
        assert!(!envelope.ok);
        assert!(envelope.result.is_none());
        assert_eq!(envelope.description.as_deref(), Some("Unauthorized"));
    }

    #[test]
    fn deserialize_file_info() {
        let json = r#"{"file_id": "BQAC", "file_unique_id": "AgAD", "file_size": 123, "file_path": "documents/file_7.pdf"}"#;
        let info: FileInfo = serde_json::from_str(json).unwrap();
        assert_eq!(info.file_path.as_deref(), Some("documents/file_7.pdf"));
    }
}
