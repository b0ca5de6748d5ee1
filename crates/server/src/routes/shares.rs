use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use triage_core::non_blank;

use super::{parse_check_ids, parse_pet_id, pets::owned_pet};
use crate::error::ApiError;
use crate::share::{self, NewShare, ShareError, SharedView};
use crate::state::{ApiJson, AppState, Owner};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ShareBody {
    pub pet_id: Option<String>,
    pub selected_check_ids: Vec<String>,
    pub care_notes: Option<String>,
    pub vet_name: Option<String>,
    pub vet_email: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareResponse {
    pub share_url: String,
    pub expires_at: DateTime<Utc>,
}

pub async fn create_share(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    ApiJson(body): ApiJson<ShareBody>,
) -> Result<Json<ShareResponse>, ApiError> {
    let pet_id = body
        .pet_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Pet ID is required".to_string()))?;

    let pet = owned_pet(&state, parse_pet_id(pet_id)?, &owner)?;
    let new_share = NewShare {
        selected_check_ids: parse_check_ids(&body.selected_check_ids)?,
        care_notes: non_blank(body.care_notes.as_deref()),
        vet_name: non_blank(body.vet_name.as_deref()),
        vet_email: non_blank(body.vet_email.as_deref()),
    };

    let record = state.with_db(|conn| Ok(share::create_share(conn, &pet, new_share, Utc::now())?))?;

    Ok(Json(ShareResponse {
        share_url: state.config.share_url(&record.share_token),
        expires_at: record.expires_at,
    }))
}

/// Public, read-only view behind a share token
pub async fn view_shared(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<SharedView>, ApiError> {
    let view = state.with_db(|conn| {
        share::resolve_share(conn, &token, Utc::now()).map_err(|e| match e {
            ShareError::NotFound => ApiError::NotFound("Shared record not found".to_string()),
            ShareError::Expired(_) => ApiError::LinkExpired,
            ShareError::Database(db) => db.into(),
        })
    })?;
    Ok(Json(view))
}
