//! Client implementation for the Gemini AI API.

use async_trait::async_trait;
use tracing::debug;

use crate::{
    config::Config,
    error::GoogleGenerativeAIError,
    models::{Request, RequestType, Response},
};

/// Default API endpoint for Google's Generative AI service
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
/// Default API version
const DEFAULT_API_VERSION: &str = "v1beta";

/// Anything that can answer a `generateContent` call.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Sends one request to the model it names and returns the raw response.
    async fn generate_content(&self, request: &Request) -> Result<Response, GoogleGenerativeAIError>;
}

/// A client for the Gemini AI REST API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiClient {
    /// Creates a new client with the specified API key.
    ///
    /// # Arguments
    ///
    /// * `api_key` - The API key for authentication
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Creates a client from a loaded [`Config`].
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.google_api_key.clone()).with_base_url(config.base_url.clone())
    }

    /// Points the client at a different endpoint.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn build_url(&self, model: &str, request_type: RequestType) -> String {
        format!(
            "{}/{}/models/{}:{}?key={}",
            self.base_url, DEFAULT_API_VERSION, model, request_type, self.api_key
        )
    }

    /// Makes a request to the Gemini AI API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns a non-success status.
    async fn make_request(
        &self,
        url: &str,
        request: &Request,
    ) -> Result<reqwest::Response, GoogleGenerativeAIError> {
        let response = self.client.post(url).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(GoogleGenerativeAIError::new(format!(
                "Request failed with status {}: {}",
                status, error_body
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl ContentGenerator for GeminiClient {
    async fn generate_content(&self, request: &Request) -> Result<Response, GoogleGenerativeAIError> {
        debug!(model = %request.model, "sending generateContent request");
        let url = self.build_url(&request.model, RequestType::GenerateContent);
        let body = self.make_request(&url, request).await?.bytes().await?;
        parse_response(&body)
    }
}

/// Decodes a `generateContent` response body.
fn parse_response(body: &[u8]) -> Result<Response, GoogleGenerativeAIError> {
    Ok(serde_json::from_slice(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_generate_content_url() {
        let client = GeminiClient::new("key").with_base_url("http://localhost:8080/");
        assert_eq!(
            client.build_url("gemini-2.5-flash", RequestType::GenerateContent),
            "http://localhost:8080/v1beta/models/gemini-2.5-flash:generateContent?key=key"
        );
    }

    #[test]
    fn decodes_response_body() {
        let body = br#"{"candidates":[{"content":{"parts":[{"text":"Hello"}]}}]}"#;
        assert_eq!(parse_response(body).unwrap().text(), "Hello");
    }

    #[test]
    fn malformed_body_is_a_json_error() {
        let err = parse_response(b"<html>502 Bad Gateway</html>").unwrap_err();
        assert!(matches!(err, GoogleGenerativeAIError::JsonError(_)));
    }

    #[test]
    fn takes_endpoint_from_config() {
        let config = Config {
            google_api_key: "secret".into(),
            base_url: "http://proxy".into(),
            ..Config::default()
        };
        let client = GeminiClient::from_config(&config);
        assert_eq!(
            client.build_url("m", RequestType::GenerateContent),
            "http://proxy/v1beta/models/m:generateContent?key=secret"
        );
    }
}
