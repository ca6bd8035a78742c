use crate::chat::model_id::ModelId;
use polars::error::PolarsError;
use thiserror::Error;

/// Failure of a single completion call.
///
/// Transport errors, authentication or quota rejections and undecodable
/// responses all collapse into this one value. The fallback logic only needs
/// to know *that* a call failed, the cause is kept for display.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{cause}")]
pub struct CallFailed {
    pub cause: String,
}

impl CallFailed {
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error(
        "Erreur totale (Cloud & Local) : {primary_model} : {primary} ; \
         {fallback_model} : {fallback}. Vérifiez qu'Ollama est bien lancé."
    )]
    AllEndpointsFailed {
        primary_model: ModelId,
        primary: CallFailed,
        fallback_model: ModelId,
        fallback: CallFailed,
    },

    #[error("Failed to render the observation table into the chat context")]
    ContextRender(#[source] PolarsError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid model identifier '{0}', expected 'provider/model'")]
    InvalidModelId(String),

    #[error("Unsupported model provider '{provider}' in '{model}'")]
    UnsupportedProvider { provider: String, model: String },

    #[error("Failed to build HTTP client")]
    HttpClient(#[source] reqwest::Error),
}
