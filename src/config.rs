//! Startup configuration.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Json, Serialized},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::{
    client::DEFAULT_BASE_URL,
    compose::{DEFAULT_CHAT_MODEL, DEFAULT_IMAGE_MODEL},
    error::ConfigError,
};

const CONFIG_DIR: &str = ".gemini-chat";
const CONFIG_FILE: &str = "config.json";

/// Settings read once when a session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// API key used to authenticate every call
    pub google_api_key: String,
    /// Model answering chat requests
    pub chat_model: String,
    /// Model answering image generation requests
    pub image_model: String,
    /// Endpoint of the Generative Language API
    pub base_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            google_api_key: String::new(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Config {
    /// Loads the configuration from `~/.gemini-chat/config.json`, then
    /// `GOOGLE_API_KEY`, then `GEMINI_*` environment variables.
    ///
    /// # Errors
    ///
    /// Fails if a source is malformed or no API key is configured.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment(Self::default_path()))
    }

    /// Location of the optional JSON configuration file.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// The layered configuration sources, lowest precedence first.
    pub fn figment(config_file: Option<PathBuf>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = config_file {
            figment = figment.merge(Json::file(path));
        }
        figment
            .merge(Env::raw().only(&["google_api_key"]))
            .merge(Env::prefixed("GEMINI_"))
    }

    /// Extracts and validates a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] if the key is empty.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract().map_err(Box::new)?;
        if config.google_api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        Ok(config)
    }
}
