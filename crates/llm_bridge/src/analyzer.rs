//! Symptom analysis pipeline: prompt, generate, validate

use crate::error::BridgeError;
use crate::media::ImageAttachment;
use crate::provider::{ProviderConfig, TextGenerator};
use async_trait::async_trait;
use triage_core::{build_user_prompt, validate_analysis, PetProfile, SymptomAnalysis, SYSTEM_PROMPT};

/// One symptom report to interpret
#[derive(Debug, Clone, Default)]
pub struct AnalysisRequest {
    pub symptoms: String,
    pub pet: PetProfile,
    pub images: Vec<ImageAttachment>,
}

/// Anything that can turn a symptom report into a validated analysis
#[async_trait]
pub trait SymptomAnalyzer: Send + Sync {
    fn provider_name(&self) -> &str;

    async fn analyze(&self, request: &AnalysisRequest) -> Result<SymptomAnalysis, BridgeError>;
}

/// Analyzer backed by a text-generation model
pub struct LlmAnalyzer {
    generator: Box<dyn TextGenerator>,
}

impl LlmAnalyzer {
    pub fn new(generator: Box<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Build the backend selected by `config`
    pub fn from_config(config: ProviderConfig) -> Result<Self, BridgeError> {
        tracing::info!(provider = %config.describe(), "Using model backend for symptom analysis");
        Ok(Self::new(config.build()?))
    }
}

#[async_trait]
impl SymptomAnalyzer for LlmAnalyzer {
    fn provider_name(&self) -> &str {
        self.generator.name()
    }

    async fn analyze(&self, request: &AnalysisRequest) -> Result<SymptomAnalysis, BridgeError> {
        let user_prompt = build_user_prompt(&request.symptoms, &request.pet);

        let raw = self
            .generator
            .generate(SYSTEM_PROMPT, &user_prompt, &request.images)
            .await?;

        validate_analysis(&raw).map_err(|e| {
            tracing::warn!(provider = self.generator.name(), error = %e, response = %raw, "Rejected model response");
            BridgeError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockGenerator;
    use triage_core::{SeverityCategory, ValidationError};

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            symptoms: "Sneezing a lot".to_string(),
            pet: PetProfile {
                name: "Mochi".to_string(),
                species: "cat".to_string(),
                age_months: 4,
                ..Default::default()
            },
            images: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_analyze_validates_reply() {
        let mock = MockGenerator::with_reply(
            "```json\n{\"possibleCauses\":[\"Upper respiratory infection\"],\"severityCategory\":\"Critical\",\"recommendations\":[\"Keep warm\"],\"whenToVisitVet\":\"Within 48 hours\",\"disclaimer\":\"Not a diagnosis\"}\n```",
        );
        let analyzer = LlmAnalyzer::new(Box::new(mock.clone()));

        let analysis = analyzer.analyze(&request()).await.unwrap();
        assert_eq!(analysis.severity_category, SeverityCategory::NonUrgent);
        assert_eq!(analysis.possible_causes, vec!["Upper respiratory infection"]);

        let prompt = mock.last_user_prompt().unwrap();
        assert!(prompt.contains("young kitten"));
        assert!(prompt.contains("Reported Symptoms:\nSneezing a lot"));
        assert_eq!(mock.last_system_prompt().as_deref(), Some(SYSTEM_PROMPT));
    }

    #[tokio::test]
    async fn test_analyze_passes_images_to_backend() {
        let mock = MockGenerator::with_reply("{}");
        let analyzer = LlmAnalyzer::new(Box::new(mock.clone()));
        let mut req = request();
        req.images.push(ImageAttachment::from_data_url("data:image/png;base64,AAAA").unwrap());

        let _ = analyzer.analyze(&req).await;
        assert_eq!(mock.last_image_count(), Some(1));
    }

    #[tokio::test]
    async fn test_analyze_rejects_unparseable_reply() {
        let analyzer = LlmAnalyzer::new(Box::new(MockGenerator::with_reply("no idea, sorry")));
        let result = analyzer.analyze(&request()).await;
        assert_eq!(result, Err(BridgeError::Invalid(ValidationError::NoJson)));
    }

    #[tokio::test]
    async fn test_transport_error_propagates() {
        let analyzer = LlmAnalyzer::new(Box::new(MockGenerator::with_error(BridgeError::transport(
            "Mock",
            "connection refused",
        ))));
        let result = analyzer.analyze(&request()).await;
        assert!(result.unwrap_err().is_transport());
    }
}
