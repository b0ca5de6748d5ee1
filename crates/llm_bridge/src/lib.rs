//! LLM Bridge for symptom analysis
//!
//! Dispatches triage prompts to one of two interchangeable text-generation
//! backends: a local Ollama server or the hosted Anthropic Messages API.
//! The hosted backend also accepts photo attachments. Whatever text comes
//! back is validated by `triage_core` before it reaches a caller.
//!
//! Copyright (c) 2025 Michael A Wright

pub mod analyzer;
pub mod anthropic;
pub mod error;
pub mod media;
pub mod mock;
pub mod ollama;
pub mod provider;

pub use analyzer::{AnalysisRequest, LlmAnalyzer, SymptomAnalyzer};
pub use anthropic::{AnthropicClient, AnthropicConfig};
pub use error::BridgeError;
pub use media::ImageAttachment;
pub use mock::MockGenerator;
pub use ollama::{OllamaClient, OllamaConfig};
pub use provider::{ProviderConfig, TextGenerator};
