//! Common part model used in both requests and responses.

use serde::{Deserialize, Serialize};

/// A single segment of request or response content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    /// A text part containing a string value
    Text {
        /// The text content of the part
        text: String,
        /// Set on the model's reasoning summaries, which are not part of the answer
        #[serde(default, skip_serializing_if = "std::ops::Not::not")]
        thought: bool,
    },
    /// A part containing inline data
    InlineData {
        /// The inline data content of the part
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    /// Any part kind this client does not model (function calls, ...)
    Other(serde_json::Value),
}

impl Part {
    /// Creates a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            thought: false,
        }
    }

    /// Creates an inline data part from base64 data and its MIME type.
    pub fn inline_data(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::InlineData {
            inline_data: InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            },
        }
    }

    /// Returns the text of a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns the text of a text part that belongs to the answer, skipping thoughts.
    pub fn as_answer_text(&self) -> Option<&str> {
        match self {
            Self::Text {
                text,
                thought: false,
            } => Some(text.as_str()),
            _ => None,
        }
    }
}

/// A part containing inline data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    /// The MIME type of the inline data
    pub mime_type: String,
    /// The base64 encoded data
    pub data: String,
}
