//! Maps provider responses back into conversation messages.

use tracing::{error, warn};

use crate::{
    error::{ChatError, GoogleGenerativeAIError, ProviderFailure},
    message::{Message, MessagePart, Role},
    models::Response,
};

const CHAT_FAILED: &str = "Failed to get response from Gemini.";
const IMAGE_FAILED: &str = "Failed to generate image.";
const NO_IMAGE: &str = "No image was generated. The model may have refused the prompt.";
const EMPTY_RESPONSE: &str = "The model returned an empty response.";

/// Maps the outcome of a chat call into a single text model message.
///
/// # Errors
///
/// Returns a [`ProviderFailure::Transport`] error if the call failed and
/// [`ProviderFailure::EmptyResponse`] if it carried no text.
pub fn map_chat_response(
    raw: Result<Response, GoogleGenerativeAIError>,
) -> Result<Message, ChatError> {
    let response = raw.map_err(|e| transport_failure(e, CHAT_FAILED))?;

    let text = response.text();
    if text.is_empty() {
        warn!(finish_reason = ?response.finish_reason(), "chat response carried no text");
        return Err(ChatError::provider(
            ProviderFailure::EmptyResponse,
            EMPTY_RESPONSE,
        ));
    }

    Ok(Message::model_text(text))
}

/// Maps the outcome of an image generation call into a single image model message.
///
/// `alt` is the prompt the image was generated from.
///
/// # Errors
///
/// Returns a [`ProviderFailure::Transport`] error if the call failed and
/// [`ProviderFailure::NoImage`] if the first candidate part holds no inline data.
pub fn map_image_response(
    raw: Result<Response, GoogleGenerativeAIError>,
    alt: &str,
) -> Result<Message, ChatError> {
    let response = raw.map_err(|e| transport_failure(e, IMAGE_FAILED))?;

    let Some(image) = response.first_inline_data() else {
        warn!(
            finish_reason = ?response.finish_reason(),
            text = %response.text(),
            "image response carried no inline data"
        );
        return Err(ChatError::provider(ProviderFailure::NoImage, NO_IMAGE));
    };

    Ok(Message::new(
        Role::Model,
        vec![MessagePart::Image {
            url: format!("data:{};base64,{}", image.mime_type, image.data),
            alt: Some(alt.to_string()),
        }],
    ))
}

fn transport_failure(source: GoogleGenerativeAIError, message: &str) -> ChatError {
    error!(error = %source, "Gemini API error");
    ChatError::Provider {
        kind: ProviderFailure::Transport,
        message: message.to_string(),
        source: Some(source),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> Response {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn chat_text_is_kept_verbatim() {
        let text = "Here:\n```rust\nfn main() {}\n```";
        let raw = response(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        }));

        let message = map_chat_response(Ok(raw)).unwrap();
        assert_eq!(message, Message::model_text(text));
    }

    #[test]
    fn chat_reply_skips_thoughts_and_other_candidates() {
        let raw = response(json!({
            "candidates": [
                { "content": { "parts": [
                    { "text": "thinking...", "thought": true },
                    { "text": "answer" }
                ] } },
                { "content": { "parts": [{ "text": "second" }] } }
            ]
        }));

        let message = map_chat_response(Ok(raw)).unwrap();
        assert_eq!(message, Message::model_text("answer"));
    }

    #[test]
    fn thoughts_alone_are_an_empty_response() {
        let raw = response(json!({
            "candidates": [{ "content": { "parts": [{ "text": "hmm", "thought": true }] } }]
        }));

        let err = map_chat_response(Ok(raw)).unwrap_err();
        assert_eq!(err.provider_failure(), Some(ProviderFailure::EmptyResponse));
    }

    #[test]
    fn chat_transport_failure_is_coarse() {
        let err = map_chat_response(Err(GoogleGenerativeAIError::new("503"))).unwrap_err();
        assert_eq!(err.provider_failure(), Some(ProviderFailure::Transport));
        assert_eq!(err.to_string(), CHAT_FAILED);
    }

    #[test]
    fn chat_without_text_is_an_empty_response() {
        let err = map_chat_response(Ok(Response::default())).unwrap_err();
        assert_eq!(err.provider_failure(), Some(ProviderFailure::EmptyResponse));
    }

    #[test]
    fn image_becomes_data_uri_with_prompt_as_alt() {
        let raw = response(json!({
            "candidates": [{
                "content": { "parts": [{ "inlineData": { "data": "QQ==", "mimeType": "image/png" } }] }
            }]
        }));

        let message = map_image_response(Ok(raw), "a cat").unwrap();
        assert_eq!(message.role, Role::Model);
        assert_eq!(
            message.parts,
            vec![MessagePart::Image {
                url: "data:image/png;base64,QQ==".into(),
                alt: Some("a cat".into()),
            }]
        );
    }

    #[test]
    fn refusal_is_distinguished_from_transport_failure() {
        let raw = response(json!({
            "candidates": [{ "content": { "parts": [{ "text": "I can't help with that." }] } }]
        }));

        let refused = map_image_response(Ok(raw), "a cat").unwrap_err();
        assert_eq!(refused.provider_failure(), Some(ProviderFailure::NoImage));

        let failed =
            map_image_response(Err(GoogleGenerativeAIError::new("timeout")), "a cat").unwrap_err();
        assert_eq!(failed.provider_failure(), Some(ProviderFailure::Transport));
        assert_eq!(failed.to_string(), IMAGE_FAILED);
    }
}
