//! Model identifiers in `provider/model` form, e.g. `gemini/gemini-2.5-flash-lite`.

use crate::chat::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// The API family a model is served through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// Google Gemini, through its OpenAI-compatible endpoint.
    Gemini,
    /// OpenAI chat completions.
    OpenAi,
    /// A local Ollama server.
    Ollama,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Gemini => "gemini",
            Provider::OpenAi => "openai",
            Provider::Ollama => "ollama",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId {
    provider: Provider,
    name: String,
}

impl ModelId {
    pub fn new(provider: Provider, name: impl Into<String>) -> Self {
        Self {
            provider,
            name: name.into(),
        }
    }

    pub fn provider(&self) -> Provider {
        self.provider
    }

    /// The model name as sent on the wire, without the provider prefix.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.provider, self.name)
    }
}

impl FromStr for ModelId {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (provider, name) = s
            .trim()
            .split_once('/')
            .filter(|(provider, name)| !provider.is_empty() && !name.is_empty())
            .ok_or_else(|| ConfigError::InvalidModelId(s.to_string()))?;

        let provider = match provider.to_ascii_lowercase().as_str() {
            "gemini" => Provider::Gemini,
            "openai" => Provider::OpenAi,
            "ollama" => Provider::Ollama,
            _ => {
                return Err(ConfigError::UnsupportedProvider {
                    provider: provider.to_string(),
                    model: s.to_string(),
                })
            }
        };
        Ok(ModelId::new(provider, name))
    }
}
