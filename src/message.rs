//! Conversation messages and their typed content parts.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::file::AttachedFile;

/// The producer of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The person typing into the chat
    User,
    /// The generative model
    Model,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Model => write!(f, "model"),
        }
    }
}

/// One typed unit of content inside a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MessagePart {
    /// Plain (possibly markdown) text
    Text {
        /// The text itself
        content: String,
    },
    /// An image encoded as a data URI
    Image {
        /// Data URI of the image
        url: String,
        /// Alternative text, usually the prompt that produced the image
        #[serde(default, skip_serializing_if = "Option::is_none")]
        alt: Option<String>,
    },
    /// A file the user attached
    File {
        /// File name as selected by the user
        name: String,
        /// MIME type of the file
        #[serde(rename = "mimeType")]
        mime_type: String,
        /// Data URI of the file bytes
        url: String,
    },
}

impl MessagePart {
    /// Creates a text part.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Returns the content of a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { content } => Some(content.as_str()),
            _ => None,
        }
    }
}

impl From<&AttachedFile> for MessagePart {
    fn from(file: &AttachedFile) -> Self {
        Self::File {
            name: file.name.clone(),
            mime_type: file.mime_type.clone(),
            url: file.url.clone(),
        }
    }
}

/// A role-tagged, ordered sequence of parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Who produced the message
    pub role: Role,
    /// Content parts in display order
    pub parts: Vec<MessagePart>,
}

impl Message {
    /// Creates a message with the given role and parts.
    pub fn new(role: Role, parts: Vec<MessagePart>) -> Self {
        Self { role, parts }
    }

    /// Creates a model message holding a single text part.
    pub fn model_text(content: impl Into<String>) -> Self {
        Self::new(Role::Model, vec![MessagePart::text(content)])
    }

    /// Builds the user message for a send: the prompt first, then the attachment.
    ///
    /// Returns `None` when neither is present, since empty messages never
    /// enter the conversation log.
    pub fn from_user_input(prompt: &str, attachment: Option<&AttachedFile>) -> Option<Self> {
        let mut parts = Vec::with_capacity(2);
        if !prompt.is_empty() {
            parts.push(MessagePart::text(prompt));
        }
        if let Some(file) = attachment {
            parts.push(MessagePart::from(file));
        }
        if parts.is_empty() {
            return None;
        }
        Some(Self::new(Role::User, parts))
    }

    /// Concatenated text of all text parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(MessagePart::as_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
