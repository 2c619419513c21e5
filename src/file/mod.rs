//! File ingestion: turns a selected file into an attachment record.

use std::path::Path;

use base64::{engine::general_purpose::STANDARD as base64_engine, Engine};
use tracing::debug;

use crate::error::ChatError;

/// Non `text/*` MIME types whose payload is still treated as text.
pub const TEXT_MIME_TYPES: [&str; 4] = [
    "application/json",
    "application/javascript",
    "application/xml",
    "application/csv",
];

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// Returns whether a MIME type denotes text-like content.
///
/// ```
/// use gemini_chat::file::is_text_mime;
///
/// assert!(is_text_mime("text/plain"));
/// assert!(is_text_mime("application/json"));
/// assert!(!is_text_mime("image/png"));
/// ```
pub fn is_text_mime(mime_type: &str) -> bool {
    mime_type.starts_with("text/") || TEXT_MIME_TYPES.iter().any(|t| *t == mime_type)
}

/// Encodes bytes as a `data:<mime>;base64,<payload>` URI.
pub fn data_uri(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, base64_engine.encode(bytes))
}

/// The payload of an attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentContent {
    /// Decoded text of a text-like file
    Text(String),
    /// Raw bytes of any other file
    Binary(Vec<u8>),
}

/// A file selected by the user, ready to accompany one send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedFile {
    /// File name as selected
    pub name: String,
    /// MIME type of the file
    pub mime_type: String,
    /// Data URI of the raw bytes, used for previews and binary requests
    pub url: String,
    /// Decoded text or raw bytes
    pub content: AttachmentContent,
    /// Whether the MIME type is text-like
    pub is_text: bool,
}

impl AttachedFile {
    /// Builds an attachment from bytes already in memory.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Read`] when `bytes` is empty.
    pub fn from_bytes(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self, ChatError> {
        let name = name.into();
        if bytes.is_empty() {
            return Err(ChatError::Read(format!("Failed to read file {}: no data", name)));
        }

        let mut mime_type = mime_type.into();
        if mime_type.is_empty() {
            mime_type = FALLBACK_MIME_TYPE.to_string();
        }

        let is_text = is_text_mime(&mime_type);
        let url = data_uri(&mime_type, &bytes);
        let content = if is_text {
            AttachmentContent::Text(String::from_utf8_lossy(&bytes).into_owned())
        } else {
            AttachmentContent::Binary(bytes)
        };

        debug!(%name, %mime_type, is_text, "ingested attachment");
        Ok(Self {
            name,
            mime_type,
            url,
            content,
            is_text,
        })
    }

    /// The decoded text, for text-like attachments.
    pub fn text(&self) -> Option<&str> {
        match &self.content {
            AttachmentContent::Text(text) => Some(text.as_str()),
            AttachmentContent::Binary(_) => None,
        }
    }
}

/// Reads a file from disk into an attachment, guessing its MIME type from the extension.
///
/// # Errors
///
/// Returns [`ChatError::Read`] if the file cannot be read or is empty.
pub async fn ingest<P: AsRef<Path>>(path: P) -> Result<AttachedFile, ChatError> {
    let path = path.as_ref();
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unnamed")
        .to_string();
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string();

    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ChatError::Read(format!("Failed to read file {}: {}", path.display(), e)))?;

    AttachedFile::from_bytes(name, mime_type, bytes)
}
