//! Connection settings for the primary and fallback models.

use crate::chat::context::DEFAULT_CONTEXT_ROW_LIMIT;
use crate::chat::endpoint::{
    CompletionEndpoint, OllamaEndpoint, OpenAiCompatibleEndpoint, GEMINI_BASE_URL,
    OLLAMA_BASE_URL, OPENAI_BASE_URL,
};
use crate::chat::error::ConfigError;
use crate::chat::model_id::{ModelId, Provider};
use bon::Builder;
use log::{info, warn};
use reqwest::Client;
use std::fmt;

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const PRIMARY_MODEL_ENV: &str = "METEO_PRIMARY_MODEL";
pub const FALLBACK_MODEL_ENV: &str = "METEO_FALLBACK_MODEL";
pub const LOCAL_BASE_URL_ENV: &str = "OLLAMA_BASE_URL";

pub const DEFAULT_PRIMARY_MODEL: &str = "gemini/gemini-2.5-flash-lite";
pub const DEFAULT_FALLBACK_MODEL: &str = "ollama/mistral";

/// Settings the chat engine is built from.
///
/// Build one explicitly with [`ChatConfig::builder`] or read it from the
/// environment with [`ChatConfig::from_env`].
///
/// # Examples
///
/// ```
/// use meteo_explorer::{ChatConfig, ModelId, Provider};
///
/// let config = ChatConfig::builder()
///     .api_key("my-key")
///     .fallback_model(ModelId::new(Provider::Ollama, "llama3"))
///     .build();
/// assert_eq!(config.primary_model().to_string(), "gemini/gemini-2.5-flash-lite");
/// assert_eq!(config.local_base_url(), "http://localhost:11434");
/// ```
#[derive(Clone, Builder)]
pub struct ChatConfig {
    #[builder(default = ModelId::new(Provider::Gemini, "gemini-2.5-flash-lite"))]
    primary_model: ModelId,
    #[builder(default = ModelId::new(Provider::Ollama, "mistral"))]
    fallback_model: ModelId,
    #[builder(into)]
    api_key: Option<String>,
    #[builder(default = OLLAMA_BASE_URL.to_string(), into)]
    local_base_url: String,
    #[builder(default = DEFAULT_CONTEXT_ROW_LIMIT)]
    context_row_limit: usize,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for ChatConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChatConfig")
            .field("primary_model", &self.primary_model)
            .field("fallback_model", &self.fallback_model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("local_base_url", &self.local_base_url)
            .field("context_row_limit", &self.context_row_limit)
            .finish()
    }
}

impl ChatConfig {
    /// Reads the configuration from environment variables.
    ///
    /// `GEMINI_API_KEY` holds the primary provider's key. `METEO_PRIMARY_MODEL`,
    /// `METEO_FALLBACK_MODEL` and `OLLAMA_BASE_URL` override the defaults. A missing
    /// key is not an error here: it surfaces when the primary model is called.
    pub fn from_env() -> Result<Self, ConfigError> {
        let model_from_env = |var: &str, default: &str| -> Result<ModelId, ConfigError> {
            non_blank_env(var).as_deref().unwrap_or(default).parse()
        };

        Ok(Self::builder()
            .primary_model(model_from_env(PRIMARY_MODEL_ENV, DEFAULT_PRIMARY_MODEL)?)
            .fallback_model(model_from_env(FALLBACK_MODEL_ENV, DEFAULT_FALLBACK_MODEL)?)
            .maybe_api_key(non_blank_env(API_KEY_ENV))
            .maybe_local_base_url(non_blank_env(LOCAL_BASE_URL_ENV))
            .build())
    }

    pub fn primary_model(&self) -> &ModelId {
        &self.primary_model
    }

    pub fn fallback_model(&self) -> &ModelId {
        &self.fallback_model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn local_base_url(&self) -> &str {
        &self.local_base_url
    }

    pub fn context_row_limit(&self) -> usize {
        self.context_row_limit
    }

    /// Startup check. Problems are logged, not returned, so the engine still
    /// starts and can serve answers from the fallback model.
    pub fn validate(&self) {
        if self.primary_model.provider() != Provider::Ollama && self.api_key.is_none() {
            warn!(
                "No API key set ({}); every call to {} will fail over to {}",
                API_KEY_ENV, self.primary_model, self.fallback_model
            );
        }
        info!(
            "Chat models: primary {}, fallback {} (local server {})",
            self.primary_model, self.fallback_model, self.local_base_url
        );
    }

    pub fn primary_endpoint(&self, client: &Client) -> Box<dyn CompletionEndpoint> {
        self.endpoint_for(&self.primary_model, client)
    }

    pub fn fallback_endpoint(&self, client: &Client) -> Box<dyn CompletionEndpoint> {
        self.endpoint_for(&self.fallback_model, client)
    }

    fn endpoint_for(&self, model: &ModelId, client: &Client) -> Box<dyn CompletionEndpoint> {
        match model.provider() {
            Provider::Gemini => Box::new(OpenAiCompatibleEndpoint::new(
                client.clone(),
                model.clone(),
                GEMINI_BASE_URL,
                self.api_key.clone(),
            )),
            Provider::OpenAi => Box::new(OpenAiCompatibleEndpoint::new(
                client.clone(),
                model.clone(),
                OPENAI_BASE_URL,
                self.api_key.clone(),
            )),
            Provider::Ollama => Box::new(OllamaEndpoint::new(
                client.clone(),
                model.clone(),
                self.local_base_url.clone(),
            )),
        }
    }
}

/// Value of `var`, unless it is unset or blank.
fn non_blank_env(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

/// Builds the HTTP client shared by both endpoints.
pub fn http_client() -> Result<Client, ConfigError> {
    Client::builder().build().map_err(ConfigError::HttpClient)
}
