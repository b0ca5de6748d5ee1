use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use triage_core::{non_blank, Pet, PetId, PetInput};

use super::parse_pet_id;
use crate::db::pets;
use crate::error::ApiError;
use crate::state::{ApiJson, AppState, Owner};

fn clean_list(items: Vec<String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Load a pet the caller owns, 404 otherwise
pub(crate) fn owned_pet(state: &AppState, id: PetId, owner: &Owner) -> Result<Pet, ApiError> {
    state
        .with_db(|conn| Ok(pets::get_pet_for_owner(conn, id, &owner.0)?))?
        .ok_or_else(|| ApiError::NotFound("Pet not found".to_string()))
}

pub async fn list_pets(State(state): State<Arc<AppState>>, owner: Owner) -> Result<Json<Vec<Pet>>, ApiError> {
    let pets = state.with_db(|conn| Ok(pets::list_pets_for_owner(conn, &owner.0)?))?;
    Ok(Json(pets))
}

pub async fn create_pet(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    ApiJson(input): ApiJson<PetInput>,
) -> Result<(StatusCode, Json<Pet>), ApiError> {
    input.validate().map_err(ApiError::BadRequest)?;

    let now = Utc::now();
    let pet = Pet {
        id: PetId::new(),
        owner_id: owner.0,
        name: input.name.trim().to_string(),
        species: input.species.trim().to_string(),
        breed: input.breed(),
        age_months: input.age_months,
        weight: input.weight(),
        photo_url: non_blank(input.photo_url.as_deref()),
        known_conditions: clean_list(input.known_conditions),
        allergies: clean_list(input.allergies),
        medications: clean_list(input.medications),
        created_at: now,
        updated_at: now,
    };

    state.with_db(|conn| Ok(pets::insert_pet(conn, &pet)?))?;
    tracing::info!(pet_id = %pet.id, species = %pet.species, "Registered pet");

    Ok((StatusCode::CREATED, Json(pet)))
}

pub async fn get_pet(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
) -> Result<Json<Pet>, ApiError> {
    let pet = owned_pet(&state, parse_pet_id(&id)?, &owner)?;
    Ok(Json(pet))
}

pub async fn update_pet(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
    ApiJson(input): ApiJson<PetInput>,
) -> Result<Json<Pet>, ApiError> {
    let existing = owned_pet(&state, parse_pet_id(&id)?, &owner)?;
    input.validate().map_err(ApiError::BadRequest)?;

    let photo_url = match input.photo_url.as_deref() {
        None => existing.photo_url.clone(),
        Some(url) => non_blank(Some(url)),
    };

    let pet = Pet {
        name: input.name.trim().to_string(),
        species: input.species.trim().to_string(),
        breed: input.breed(),
        age_months: input.age_months,
        weight: input.weight(),
        photo_url,
        known_conditions: clean_list(input.known_conditions),
        allergies: clean_list(input.allergies),
        medications: clean_list(input.medications),
        updated_at: Utc::now(),
        ..existing
    };

    state.with_db(|conn| Ok(pets::update_pet(conn, &pet)?))?;
    Ok(Json(pet))
}

#[derive(Serialize)]
pub struct DeleteResponse {
    message: &'static str,
}

pub async fn delete_pet(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let pet = owned_pet(&state, parse_pet_id(&id)?, &owner)?;
    state.with_db(|conn| Ok(pets::delete_pet(conn, pet.id)?))?;
    tracing::info!(pet_id = %pet.id, "Deleted pet");

    Ok(Json(DeleteResponse { message: "Pet deleted" }))
}
