//! Backend selection
//!
//! Both backends implement [`TextGenerator`]; which one runs is decided
//! once at startup from the environment.

use crate::anthropic::{AnthropicClient, AnthropicConfig, PLACEHOLDER_API_KEY};
use crate::error::BridgeError;
use crate::media::ImageAttachment;
use crate::ollama::{OllamaClient, OllamaConfig};
use async_trait::async_trait;

/// A backend that turns a prompt into raw model text
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &str;

    /// Return the model's raw reply, expected to contain one JSON object
    async fn generate(
        &self,
        system: &str,
        user: &str,
        images: &[ImageAttachment],
    ) -> Result<String, BridgeError>;
}

/// Selected backend and its settings
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderConfig {
    Ollama(OllamaConfig),
    Anthropic(AnthropicConfig),
}

impl ProviderConfig {
    /// Read the selection from process environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(&|k| std::env::var(k).ok())
    }

    /// Local Ollama is chosen when `USE_OLLAMA=true` or no usable
    /// `ANTHROPIC_API_KEY` is present.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let force_ollama = lookup("USE_OLLAMA").as_deref() == Some("true");
        let has_key = matches!(
            lookup("ANTHROPIC_API_KEY").as_deref(),
            Some(key) if !key.is_empty() && key != PLACEHOLDER_API_KEY
        );

        if force_ollama || !has_key {
            return ProviderConfig::Ollama(OllamaConfig::from_lookup(lookup));
        }

        match AnthropicConfig::from_lookup(lookup) {
            Ok(config) => ProviderConfig::Anthropic(config),
            Err(_) => ProviderConfig::Ollama(OllamaConfig::from_lookup(lookup)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProviderConfig::Ollama(_) => "Ollama",
            ProviderConfig::Anthropic(_) => "Anthropic",
        }
    }

    /// Short description for startup logs, never including secrets
    pub fn describe(&self) -> String {
        match self {
            ProviderConfig::Ollama(config) => format!("Ollama ({}) at {}", config.model, config.base_url),
            ProviderConfig::Anthropic(config) => format!("Anthropic ({})", config.model),
        }
    }

    /// Construct the configured backend
    pub fn build(self) -> Result<Box<dyn TextGenerator>, BridgeError> {
        Ok(match self {
            ProviderConfig::Ollama(config) => Box::new(OllamaClient::new(config)?),
            ProviderConfig::Anthropic(config) => Box::new(AnthropicClient::new(config)?),
        })
    }
}
