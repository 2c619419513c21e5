//! Request models for the Gemini AI API.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use super::{GenerationConfig, Part};
use crate::message::Role;

/// A request to the Gemini AI API.
#[derive(Debug, Clone, PartialEq, Serialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(doc)]
pub struct Request {
    /// Model identifier the request is addressed to (part of the URL, not the body)
    #[serde(skip)]
    #[builder(setter(into))]
    pub model: String,
    /// The contents of the request.
    pub contents: Vec<Content>,
    /// Optional generation settings
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub generation_config: Option<GenerationConfig>,
}

/// A content object containing an ordered list of parts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Content {
    /// The producer of the content, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    /// The parts that make up the content.
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    /// Creates role-less content from the given parts.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self { role: None, parts }
    }
}

impl Request {
    /// Creates a single-turn request holding the given parts.
    pub fn new(model: impl Into<String>, parts: Vec<Part>) -> Self {
        Self::builder()
            .model(model)
            .contents(vec![Content::from_parts(parts)])
            .build()
    }

    /// Returns the segments of the first (and only) content entry.
    pub fn segments(&self) -> &[Part] {
        self.contents
            .first()
            .map(|content| content.parts.as_slice())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn image_request_body_matches_wire_format() {
        let request = Request::builder()
            .model("gemini-2.5-flash-image")
            .contents(vec![Content::from_parts(vec![Part::text("a cat")])])
            .generation_config(GenerationConfig::image_only())
            .build();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "contents": [{ "parts": [{ "text": "a cat" }] }],
                "generationConfig": { "responseModalities": ["IMAGE"] }
            })
        );
    }

    #[test]
    fn chat_request_omits_generation_config() {
        let request = Request::new("gemini-2.5-flash", vec![Part::text("Hi")]);
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("generationConfig").is_none());
        assert!(body.get("model").is_none());
        assert_eq!(request.segments(), &[Part::text("Hi")]);
    }
}
