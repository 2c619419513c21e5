use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

/// Output modalities the model may produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Modality {
    /// Plain text output
    Text,
    /// Image output
    Image,
}

/// Configuration options for model generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
#[builder(doc)]
pub struct GenerationConfig {
    /// The modalities the response is allowed to contain
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    pub response_modalities: Option<Vec<Modality>>,
}

impl GenerationConfig {
    /// A configuration asking for image output only.
    pub fn image_only() -> Self {
        Self::builder()
            .response_modalities(vec![Modality::Image])
            .build()
    }
}
