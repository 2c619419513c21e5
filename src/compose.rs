//! Builds provider requests from user input.
//!
//! Text-like attachments are inlined into the prompt so the model reads them
//! as context; everything else travels as a base64 inline data segment.

use tracing::debug;

use crate::{
    error::ChatError,
    file::AttachedFile,
    models::{GenerationConfig, InlineData, Part, Request},
};

/// Default model used for chat requests.
pub const DEFAULT_CHAT_MODEL: &str = "gemini-2.5-flash";
/// Default model used for image generation requests.
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

/// What a send asks the model to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatMode {
    /// Answer the prompt (and attachment) with text
    #[default]
    Chat,
    /// Generate an image from the prompt
    ImageGeneration,
}

/// Turns a prompt, optional attachment and mode into a provider [`Request`].
#[derive(Debug, Clone)]
pub struct RequestComposer {
    chat_model: String,
    image_model: String,
}

impl Default for RequestComposer {
    fn default() -> Self {
        Self::new(DEFAULT_CHAT_MODEL, DEFAULT_IMAGE_MODEL)
    }
}

impl RequestComposer {
    /// Creates a composer addressing the given chat and image models.
    pub fn new(chat_model: impl Into<String>, image_model: impl Into<String>) -> Self {
        Self {
            chat_model: chat_model.into(),
            image_model: image_model.into(),
        }
    }

    /// Builds the request for one send.
    ///
    /// # Errors
    ///
    /// * [`ChatError::Validation`] if image mode has no prompt or carries an
    ///   attachment, or if chat mode has neither prompt nor attachment.
    /// * [`ChatError::Encoding`] if a binary attachment's URL is not a data URI.
    pub fn compose(
        &self,
        prompt: &str,
        attachment: Option<&AttachedFile>,
        mode: ChatMode,
    ) -> Result<Request, ChatError> {
        let request = match mode {
            ChatMode::ImageGeneration => self.compose_image(prompt, attachment)?,
            ChatMode::Chat => self.compose_chat(prompt, attachment)?,
        };
        debug!(
            model = %request.model,
            segments = request.segments().len(),
            ?mode,
            "composed request"
        );
        Ok(request)
    }

    fn compose_image(
        &self,
        prompt: &str,
        attachment: Option<&AttachedFile>,
    ) -> Result<Request, ChatError> {
        if prompt.is_empty() {
            return Err(ChatError::Validation(
                "A prompt is required for image generation.".into(),
            ));
        }
        if attachment.is_some() {
            return Err(ChatError::Validation(
                "Attachments cannot be used for image generation.".into(),
            ));
        }

        let mut request = Request::new(self.image_model.clone(), vec![Part::text(prompt)]);
        request.generation_config = Some(GenerationConfig::image_only());
        Ok(request)
    }

    fn compose_chat(
        &self,
        prompt: &str,
        attachment: Option<&AttachedFile>,
    ) -> Result<Request, ChatError> {
        if prompt.is_empty() && attachment.is_none() {
            return Err(ChatError::Validation(
                "A prompt or an attachment is required.".into(),
            ));
        }

        let mut parts = Vec::with_capacity(2);
        if !prompt.is_empty() {
            parts.push(Part::text(prompt));
        }

        if let Some(file) = attachment {
            match file.text() {
                Some(content) if file.is_text => {
                    let framed = format!("\n\n--- File Content: {} ---\n{}", file.name, content);
                    match parts.first_mut() {
                        Some(Part::Text { text, .. }) => text.push_str(&framed),
                        _ => parts.push(Part::text(framed)),
                    }
                }
                _ => {
                    let inline_data = inline_data_from_data_uri(&file.url, &file.mime_type)?;
                    parts.push(Part::InlineData { inline_data });
                }
            }
        }

        Ok(Request::new(self.chat_model.clone(), parts))
    }
}

/// Extracts the base64 payload of a data URI, pairing it with `mime_type`.
///
/// # Errors
///
/// Returns [`ChatError::Encoding`] if `url` is not a data URI.
pub fn inline_data_from_data_uri(url: &str, mime_type: &str) -> Result<InlineData, ChatError> {
    let payload = url
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .map(|(_, data)| data)
        .ok_or_else(|| {
            ChatError::Encoding(
                "Could not convert file to generative part: URL is not a data URL.".into(),
            )
        })?;

    Ok(InlineData {
        mime_type: mime_type.to_string(),
        data: payload.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Modality;

    fn text_file() -> AttachedFile {
        AttachedFile::from_bytes("notes.txt", "text/plain", b"line1".to_vec()).unwrap()
    }

    fn image_file() -> AttachedFile {
        AttachedFile::from_bytes("cat.png", "image/png", vec![0x41]).unwrap()
    }

    #[test]
    fn inlines_text_attachment_into_prompt() {
        let request = RequestComposer::default()
            .compose("Hi", Some(&text_file()), ChatMode::Chat)
            .unwrap();

        assert_eq!(request.model, DEFAULT_CHAT_MODEL);
        assert_eq!(
            request.segments(),
            &[Part::text("Hi\n\n--- File Content: notes.txt ---\nline1")]
        );
    }

    #[test]
    fn text_attachment_without_prompt_gets_its_own_segment() {
        let request = RequestComposer::default()
            .compose("", Some(&text_file()), ChatMode::Chat)
            .unwrap();

        assert_eq!(
            request.segments(),
            &[Part::text("\n\n--- File Content: notes.txt ---\nline1")]
        );
    }

    #[test]
    fn binary_attachment_alone_is_one_inline_segment() {
        let request = RequestComposer::default()
            .compose("", Some(&image_file()), ChatMode::Chat)
            .unwrap();

        assert_eq!(request.segments(), &[Part::inline_data("image/png", "QQ==")]);
    }

    #[test]
    fn binary_attachment_follows_prompt() {
        let request = RequestComposer::default()
            .compose("What is this?", Some(&image_file()), ChatMode::Chat)
            .unwrap();

        assert_eq!(
            request.segments(),
            &[
                Part::text("What is this?"),
                Part::inline_data("image/png", "QQ=="),
            ]
        );
    }

    #[test]
    fn rejects_binary_attachment_without_data_uri() {
        let mut file = image_file();
        file.url = "blob:https://example.com/1234".into();

        let err = RequestComposer::default()
            .compose("", Some(&file), ChatMode::Chat)
            .unwrap_err();
        assert!(matches!(err, ChatError::Encoding(_)));
    }

    #[test]
    fn rejects_empty_chat_input() {
        let err = RequestComposer::default()
            .compose("", None, ChatMode::Chat)
            .unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
    }

    #[test]
    fn image_mode_sends_prompt_with_image_modality() {
        let request = RequestComposer::new("chat", "painter")
            .compose("a cat", None, ChatMode::ImageGeneration)
            .unwrap();

        assert_eq!(request.model, "painter");
        assert_eq!(request.segments(), &[Part::text("a cat")]);
        assert_eq!(
            request.generation_config.unwrap().response_modalities,
            Some(vec![Modality::Image])
        );
    }

    #[test]
    fn image_mode_requires_prompt_and_no_attachment() {
        let composer = RequestComposer::default();
        assert!(matches!(
            composer.compose("", None, ChatMode::ImageGeneration),
            Err(ChatError::Validation(_))
        ));
        assert!(matches!(
            composer.compose("a cat", Some(&image_file()), ChatMode::ImageGeneration),
            Err(ChatError::Validation(_))
        ));
    }

    #[test]
    fn strips_data_uri_prefix_at_first_comma() {
        let data = inline_data_from_data_uri("data:text/csv;base64,YSxi", "text/csv").unwrap();
        assert_eq!(data.data, "YSxi");
        assert_eq!(data.mime_type, "text/csv");
    }
}
