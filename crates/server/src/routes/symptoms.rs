use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use llm_bridge::{AnalysisRequest, ImageAttachment};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use triage_core::emergency::detect_emergency_keywords;
use triage_core::{PetProfile, SymptomAnalysis, SymptomCheck, SymptomCheckId};

use super::{parse_pet_id, pets::owned_pet};
use crate::db::checks;
use crate::error::ApiError;
use crate::state::{ApiJson, AppState, Owner};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeBody {
    pub pet_id: Option<String>,
    pub symptoms: Option<String>,
    /// Expected to be `[{ "type": "image", "data": "data:image/...;base64,..." }]`
    pub media: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub analysis: SymptomAnalysis,
    pub check_id: SymptomCheckId,
    pub emergency_keywords: Vec<&'static str>,
}

/// Keep only image items carrying a parseable data URL
pub fn valid_media(media: Option<&Value>) -> Vec<ImageAttachment> {
    let Some(Value::Array(items)) = media else {
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| item.get("type").and_then(Value::as_str) == Some("image"))
        .filter_map(|item| item.get("data").and_then(Value::as_str))
        .filter(|data| data.starts_with("data:image"))
        .filter_map(ImageAttachment::from_data_url)
        .collect()
}

pub async fn analyze(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    ApiJson(body): ApiJson<AnalyzeBody>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let (Some(pet_id), Some(symptoms)) = (
        body.pet_id.as_deref().map(str::trim).filter(|s| !s.is_empty()),
        body.symptoms.as_deref().map(str::trim).filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::BadRequest("Pet ID and symptoms are required".to_string()));
    };

    let pet = owned_pet(&state, parse_pet_id(pet_id)?, &owner)?;
    let images = valid_media(body.media.as_ref());
    let emergency_keywords = detect_emergency_keywords(symptoms);
    if !emergency_keywords.is_empty() {
        tracing::warn!(pet_id = %pet.id, keywords = ?emergency_keywords, "Emergency keywords in symptom report");
    }

    let request = AnalysisRequest {
        symptoms: symptoms.to_string(),
        pet: PetProfile::from(&pet),
        images,
    };

    tracing::info!(
        pet_id = %pet.id,
        provider = state.analyzer.provider_name(),
        images = request.images.len(),
        "Analyzing symptoms"
    );
    let analysis = state.analyzer.analyze(&request).await?;

    let check = SymptomCheck {
        id: SymptomCheckId::new(),
        pet_id: pet.id,
        symptoms: request.symptoms,
        analysis,
        created_at: Utc::now(),
    };
    state.with_db(|conn| Ok(checks::insert_check(conn, &check)?))?;

    Ok(Json(AnalyzeResponse {
        analysis: check.analysis,
        check_id: check.id,
        emergency_keywords,
    }))
}

/// Symptom history for one pet, newest first
pub async fn list_checks(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
) -> Result<Json<Vec<SymptomCheck>>, ApiError> {
    let pet = owned_pet(&state, parse_pet_id(&id)?, &owner)?;
    let history = state.with_db(|conn| Ok(checks::list_checks_for_pet(conn, pet.id)?))?;
    Ok(Json(history))
}
