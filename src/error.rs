//! Error types for the Gemini chat client.

use std::fmt;

use thiserror::Error;

/// Errors that can occur when talking to the Gemini AI API.
#[derive(Debug, Error)]
pub enum GoogleGenerativeAIError {
    /// Base error for the Gemini AI client.
    #[error("[GoogleGenerativeAI Error]: {message}")]
    Base {
        /// Error message
        message: String,
    },

    /// Error occurred during an API request.
    #[error("API request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The response body was not a valid `generateContent` response.
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl GoogleGenerativeAIError {
    /// Creates a new Base error with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::Base {
            message: message.into(),
        }
    }
}

/// Why a provider call did not produce a usable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderFailure {
    /// The call itself failed (network, auth, quota, bad status).
    Transport,
    /// The call succeeded but no inline image came back.
    NoImage,
    /// The call succeeded but carried no text.
    EmptyResponse,
}

impl fmt::Display for ProviderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::NoImage => write!(f, "no image"),
            Self::EmptyResponse => write!(f, "empty response"),
        }
    }
}

/// Errors surfaced by a single send, from ingestion to response mapping.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Reading an attachment failed or produced no data.
    #[error("{0}")]
    Read(String),

    /// The input does not satisfy the requirements of the selected mode.
    #[error("{0}")]
    Validation(String),

    /// The attachment is not encoded as a data URI.
    #[error("{0}")]
    Encoding(String),

    /// The provider call failed or returned nothing usable.
    #[error("{message}")]
    Provider {
        /// What went wrong
        kind: ProviderFailure,
        /// Human readable description
        message: String,
        /// Underlying client error, when there is one
        #[source]
        source: Option<GoogleGenerativeAIError>,
    },
}

impl ChatError {
    /// Creates a provider error of the given kind.
    pub fn provider(kind: ProviderFailure, message: impl Into<String>) -> Self {
        Self::Provider {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Returns the provider failure kind, if this is a provider error.
    pub fn provider_failure(&self) -> Option<ProviderFailure> {
        match self {
            Self::Provider { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

/// Errors raised while loading the startup configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration sources could not be merged or parsed.
    #[error("Invalid configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// No API key was provided by any source.
    #[error("API key not found. Set GEMINI_GOOGLE_API_KEY, GOOGLE_API_KEY or google_api_key in ~/.gemini-chat/config.json")]
    MissingApiKey,
}
