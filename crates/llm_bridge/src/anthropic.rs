//! Anthropic Messages API integration
//!
//! Hosted backend for symptom analysis. Unlike the local backend it accepts
//! image blocks, so owners can attach photos of a wound or rash alongside
//! the written description.

use crate::error::BridgeError;
use crate::media::ImageAttachment;
use crate::provider::TextGenerator;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "Anthropic";
const API_VERSION: &str = "2023-06-01";

/// Placeholder value shipped in sample env files
pub const PLACEHOLDER_API_KEY: &str = "your-anthropic-api-key";

/// Configuration for Anthropic API client
#[derive(Debug, Clone, PartialEq)]
pub struct AnthropicConfig {
    /// API key for Anthropic
    pub api_key: String,
    /// Model to use (default: claude-sonnet-4-20250514)
    pub model: String,
    /// Maximum tokens in the reply
    pub max_tokens: u32,
    /// API base URL (default: https://api.anthropic.com)
    pub base_url: String,
    /// Timeout in seconds
    pub timeout_secs: u64,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: "claude-sonnet-4-20250514".to_string(),
            max_tokens: 1024,
            base_url: "https://api.anthropic.com".to_string(),
            timeout_secs: 120,
        }
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self, BridgeError> {
        let api_key = lookup("ANTHROPIC_API_KEY")
            .filter(|k| !k.is_empty())
            .ok_or_else(|| BridgeError::Config("ANTHROPIC_API_KEY environment variable not set".to_string()))?;

        let mut config = Self::new(api_key);
        if let Some(model) = lookup("ANTHROPIC_MODEL").filter(|m| !m.is_empty()) {
            config.model = model;
        }
        Ok(config)
    }
}

/// Anthropic API client
pub struct AnthropicClient {
    config: AnthropicConfig,
    client: reqwest::Client,
}

impl AnthropicClient {
    /// Create a new Anthropic client
    pub fn new(config: AnthropicConfig) -> Result<Self, BridgeError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BridgeError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Assemble the request body: images first, then the prompt text
    pub fn build_request(&self, system: &str, user: &str, images: &[ImageAttachment]) -> MessagesRequest {
        let mut content: Vec<ContentBlock> = images
            .iter()
            .map(|image| ContentBlock::Image {
                source: ImageSource {
                    kind: "base64".to_string(),
                    media_type: image.media_type.clone(),
                    data: image.data.clone(),
                },
            })
            .collect();

        let text = if images.is_empty() {
            user.to_string()
        } else {
            format!(
                "{user}\n\nI have also attached {} image(s) showing the symptoms. Please analyze these images as part of your assessment.",
                images.len()
            )
        };
        content.push(ContentBlock::Text { text });

        MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            system: system.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content,
            }],
        }
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn generate(
        &self,
        system: &str,
        user: &str,
        images: &[ImageAttachment],
    ) -> Result<String, BridgeError> {
        let request = self.build_request(system, user, images);
        let url = format!("{}/v1/messages", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| BridgeError::transport(PROVIDER, format!("Failed to send request: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(BridgeError::transport(PROVIDER, format!("({status}): {error_text}")));
        }

        let messages_response: MessagesResponse = response
            .json()
            .await
            .map_err(|e| BridgeError::transport(PROVIDER, format!("Failed to parse response: {e}")))?;

        messages_response
            .first_text()
            .map(str::to_string)
            .ok_or(BridgeError::EmptyResponse)
    }
}

/// Messages API request structure
#[derive(Debug, Serialize)]
pub struct MessagesRequest {
    pub model: String,
    pub max_tokens: u32,
    pub system: String,
    pub messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub role: String,
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

#[derive(Debug, Serialize)]
pub struct ImageSource {
    #[serde(rename = "type")]
    pub kind: String,
    pub media_type: String,
    pub data: String,
}

/// Messages API response structure
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl MessagesResponse {
    fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ResponseBlock::Text { text } => Some(text.as_str()),
            ResponseBlock::Other => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn test_client() -> AnthropicClient {
        AnthropicClient::new(AnthropicConfig::new("test-key")).unwrap()
    }

    #[test]
    fn test_anthropic_config_defaults() {
        let config = AnthropicConfig::new("test-key");
        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.model, "claude-sonnet-4-20250514");
        assert_eq!(config.max_tokens, 1024);
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_config_requires_api_key() {
        let vars: HashMap<&str, &str> = HashMap::new();
        let result = AnthropicConfig::from_lookup(&|k| vars.get(k).map(|v| v.to_string()));
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_config_model_override() {
        let vars: HashMap<&str, &str> =
            [("ANTHROPIC_API_KEY", "sk-test"), ("ANTHROPIC_MODEL", "claude-haiku")].into_iter().collect();
        let config = AnthropicConfig::from_lookup(&|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.model, "claude-haiku");
    }

    #[test]
    fn test_text_only_request() {
        let request = test_client().build_request("sys", "Reported Symptoms: itching", &[]);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["system"], "sys");
        assert_eq!(json["messages"][0]["role"], "user");
        let content = json["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 1);
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], "Reported Symptoms: itching");
    }

    #[test]
    fn test_images_precede_text() {
        let images = vec![
            ImageAttachment::from_data_url("data:image/png;base64,AAAA").unwrap(),
            ImageAttachment::from_data_url("data:image/jpeg;base64,BBBB").unwrap(),
        ];
        let request = test_client().build_request("sys", "rash on belly", &images);
        let json = serde_json::to_value(&request).unwrap();
        let content = json["messages"][0]["content"].as_array().unwrap();

        assert_eq!(content.len(), 3);
        assert_eq!(content[0]["type"], "image");
        assert_eq!(content[0]["source"]["type"], "base64");
        assert_eq!(content[0]["source"]["media_type"], "image/png");
        assert_eq!(content[1]["source"]["data"], "BBBB");
        assert_eq!(content[2]["type"], "text");
        assert!(content[2]["text"]
            .as_str()
            .unwrap()
            .contains("I have also attached 2 image(s)"));
    }

    #[test]
    fn test_response_text_extraction() {
        let body = r#"{"id":"msg_1","type":"message","content":[{"type":"thinking","thinking":"..."},{"type":"text","text":"{\"ok\":true}"}]}"#;
        let response: MessagesResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.first_text(), Some("{\"ok\":true}"));
    }

    #[test]
    fn test_response_without_text() {
        let response: MessagesResponse = serde_json::from_str(r#"{"content":[]}"#).unwrap();
        assert_eq!(response.first_text(), None);
    }
}
