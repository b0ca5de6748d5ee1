//! Ollama HTTP API client

use crate::error::BridgeError;
use crate::media::ImageAttachment;
use crate::provider::TextGenerator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "Ollama";

/// Configuration for Ollama client
#[derive(Debug, Clone, PartialEq)]
pub struct OllamaConfig {
    /// Base URL for Ollama API (default: http://localhost:11434)
    pub base_url: String,
    /// Model tag (default: llama3.2)
    pub model: String,
    /// Sampling temperature (default: 0.7)
    pub temperature: f32,
    /// Timeout in seconds (default: 120)
    pub timeout_secs: u64,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            temperature: 0.7,
            timeout_secs: 120,
        }
    }
}

impl OllamaConfig {
    /// Defaults overridden by `OLLAMA_URL` and `OLLAMA_MODEL`
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            base_url: lookup("OLLAMA_URL")
                .filter(|v| !v.is_empty())
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.base_url),
            model: lookup("OLLAMA_MODEL")
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.model),
            ..defaults
        }
    }
}

/// Ollama API client
pub struct OllamaClient {
    config: OllamaConfig,
    client: reqwest::Client,
}

impl OllamaClient {
    /// Create a new Ollama client
    pub fn new(config: OllamaConfig) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BridgeError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Send a non-streaming generate request to Ollama
    pub async fn generate_raw(&self, request: &GenerateRequest) -> Result<GenerateResponse, BridgeError> {
        let url = format!("{}/api/generate", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| BridgeError::transport(PROVIDER, e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(BridgeError::transport(PROVIDER, format!("{status} - {error_text}")));
        }

        response
            .json()
            .await
            .map_err(|e| BridgeError::transport(PROVIDER, format!("Failed to parse response: {e}")))
    }
}

#[async_trait]
impl TextGenerator for OllamaClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(
        &self,
        system: &str,
        user: &str,
        images: &[ImageAttachment],
    ) -> Result<String, BridgeError> {
        if !images.is_empty() {
            tracing::warn!(
                count = images.len(),
                "Image analysis is not available with Ollama; images will be ignored"
            );
        }

        let request = GenerateRequest {
            model: self.config.model.clone(),
            prompt: format!("{system}\n\n{user}"),
            stream: false,
            options: GenerateOptions {
                temperature: self.config.temperature,
            },
        };

        let response = self.generate_raw(&request).await?;
        Ok(response.response)
    }
}

/// Generate request to Ollama
#[derive(Debug, Clone, Serialize)]
pub struct GenerateRequest {
    pub model: String,
    pub prompt: String,
    pub stream: bool,
    pub options: GenerateOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateOptions {
    pub temperature: f32,
}

/// Generate response from Ollama
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    pub model: String,
    pub response: String,
    #[serde(default)]
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_ollama_config_default() {
        let config = OllamaConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "llama3.2");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_ollama_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("OLLAMA_URL", "http://gpu-box:11434/"),
            ("OLLAMA_MODEL", "qwen2.5:7b"),
        ]
        .into_iter()
        .collect();
        let config = OllamaConfig::from_lookup(&|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(config.base_url, "http://gpu-box:11434");
        assert_eq!(config.model, "qwen2.5:7b");
    }

    #[test]
    fn test_generate_request_serialization() {
        let request = GenerateRequest {
            model: "llama3.2".to_string(),
            prompt: "Hello".to_string(),
            stream: false,
            options: GenerateOptions { temperature: 0.7 },
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3.2");
        assert_eq!(json["stream"], false);
        assert!(json["options"]["temperature"].is_number());
    }

    #[test]
    fn test_generate_response_parsing() {
        let body = r#"{"model":"llama3.2","created_at":"2025-01-01T00:00:00Z","response":"{\"a\":1}","done":true}"#;
        let response: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.response, "{\"a\":1}");
        assert!(response.done);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        let client = OllamaClient::new(OllamaConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 5,
            ..Default::default()
        })
        .unwrap();

        let result = client.generate("system", "user", &[]).await;
        assert!(matches!(result, Err(ref e) if e.is_transport()));
    }
}
