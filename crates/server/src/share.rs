//! Share links
//!
//! A share token is an unguessable 64-hex-character capability. It resolves
//! to a read-only view of a pet and a chosen subset of its symptom checks for
//! seven days. Expired links are refused but nothing is deleted.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use rusqlite::Connection;
use serde::Serialize;
use triage_core::prompt::age_text;
use triage_core::species::weight_unit;
use triage_core::{species_info, Pet, SharedRecord, SharedRecordId, SymptomCheck, SymptomCheckId, VetType};

use crate::db::{checks, pets, shares, DatabaseError};

pub const SHARE_LIFETIME_DAYS: i64 = 7;

const TOKEN_BYTES: usize = 32;

/// Why a token did not resolve
#[derive(Debug, thiserror::Error)]
pub enum ShareError {
    #[error("Shared record not found")]
    NotFound,
    #[error("Shared record expired at {0}")]
    Expired(DateTime<Utc>),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

/// 32 random bytes as lowercase hex
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// What the owner chose to share
#[derive(Debug, Clone, Default)]
pub struct NewShare {
    pub selected_check_ids: Vec<SymptomCheckId>,
    pub care_notes: Option<String>,
    pub vet_name: Option<String>,
    pub vet_email: Option<String>,
}

/// Create and store a share link for `pet`
pub fn create_share(
    conn: &Connection,
    pet: &Pet,
    share: NewShare,
    now: DateTime<Utc>,
) -> Result<SharedRecord, DatabaseError> {
    let record = SharedRecord {
        id: SharedRecordId::new(),
        share_token: generate_token(),
        pet_id: pet.id,
        owner_id: pet.owner_id.clone(),
        selected_check_ids: share.selected_check_ids,
        care_notes: share.care_notes,
        vet_name: share.vet_name,
        vet_email: share.vet_email,
        view_count: 0,
        expires_at: now + Duration::days(SHARE_LIFETIME_DAYS),
        created_at: now,
    };
    shares::insert_shared_record(conn, &record)?;

    tracing::info!(pet_id = %pet.id, expires_at = %record.expires_at, "Created share link");
    Ok(record)
}

/// Read-only pet details exposed through a share link
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedPet {
    pub name: String,
    pub species: String,
    pub species_label: String,
    pub icon: String,
    pub vet_type: VetType,
    pub breed: Option<String>,
    pub age_months: u32,
    pub age_text: String,
    pub weight: Option<f64>,
    pub weight_unit: &'static str,
    pub photo_url: Option<String>,
    pub known_conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub medications: Vec<String>,
}

impl From<&Pet> for SharedPet {
    fn from(pet: &Pet) -> Self {
        let info = species_info(&pet.species);
        Self {
            name: pet.name.clone(),
            species: pet.species.clone(),
            species_label: info.label,
            icon: info.icon,
            vet_type: info.vet_type,
            breed: pet.breed.clone(),
            age_months: pet.age_months,
            age_text: age_text(pet.age_months),
            weight: pet.weight,
            weight_unit: weight_unit(&pet.species, info.vet_type),
            photo_url: pet.photo_url.clone(),
            known_conditions: pet.known_conditions.clone(),
            allergies: pet.allergies.clone(),
            medications: pet.medications.clone(),
        }
    }
}

/// The rendered record behind a share token
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedView {
    pub pet: SharedPet,
    pub vet_name: Option<String>,
    pub care_notes: Option<String>,
    pub symptom_checks: Vec<SymptomCheck>,
    pub view_count: u32,
    pub shared_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Resolve a token as of `now`, counting the view
pub fn resolve_share(conn: &Connection, token: &str, now: DateTime<Utc>) -> Result<SharedView, ShareError> {
    let record = shares::get_by_token(conn, token)?.ok_or(ShareError::NotFound)?;

    if record.is_expired(now) {
        return Err(ShareError::Expired(record.expires_at));
    }

    let view_count = shares::increment_view_count(conn, record.id)?;

    let pet = pets::get_pet(conn, record.pet_id)?.ok_or(ShareError::NotFound)?;
    let symptom_checks = checks::get_checks_for_pet_by_ids(conn, pet.id, &record.selected_check_ids)?;

    Ok(SharedView {
        pet: SharedPet::from(&pet),
        vet_name: record.vet_name,
        care_notes: record.care_notes,
        symptom_checks,
        view_count,
        shared_at: record.created_at,
        expires_at: record.expires_at,
    })
}
