//! HTTP routes

pub mod pets;
pub mod shares;
pub mod species;
pub mod symptoms;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use triage_core::{PetId, SymptomCheckId};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/species", get(species::list_species))
        .route("/pets", get(pets::list_pets).post(pets::create_pet))
        .route(
            "/pets/:id",
            get(pets::get_pet).put(pets::update_pet).delete(pets::delete_pet),
        )
        .route("/pets/:id/checks", get(symptoms::list_checks))
        .route("/symptoms/analyze", post(symptoms::analyze))
        .route("/records/share", post(shares::create_share))
        .route("/shared/:token", get(shares::view_shared))
}

/// Path ids that fail to parse are reported as missing pets
pub(crate) fn parse_pet_id(raw: &str) -> Result<PetId, ApiError> {
    Uuid::parse_str(raw)
        .map(PetId)
        .map_err(|_| ApiError::NotFound("Pet not found".to_string()))
}

pub(crate) fn parse_check_ids(raw: &[String]) -> Result<Vec<SymptomCheckId>, ApiError> {
    raw.iter()
        .map(|id| {
            Uuid::parse_str(id)
                .map(SymptomCheckId)
                .map_err(|_| ApiError::BadRequest(format!("Invalid symptom check id: {id}")))
        })
        .collect()
}
