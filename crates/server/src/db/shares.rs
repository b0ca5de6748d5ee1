use rusqlite::{params, Connection, OptionalExtension, Row};
use triage_core::{PetId, SharedRecord, SharedRecordId, SymptomCheckId};
use uuid::Uuid;

use super::{from_json_list, parse_timestamp, parse_uuid, timestamp, to_json_list, DatabaseError};

struct SharedRow {
    id: String,
    share_token: String,
    pet_id: String,
    owner_id: String,
    selected_check_ids: String,
    care_notes: Option<String>,
    vet_name: Option<String>,
    vet_email: Option<String>,
    view_count: u32,
    expires_at: String,
    created_at: String,
}

impl SharedRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            share_token: row.get(1)?,
            pet_id: row.get(2)?,
            owner_id: row.get(3)?,
            selected_check_ids: row.get(4)?,
            care_notes: row.get(5)?,
            vet_name: row.get(6)?,
            vet_email: row.get(7)?,
            view_count: row.get(8)?,
            expires_at: row.get(9)?,
            created_at: row.get(10)?,
        })
    }

    fn decode(self) -> Result<SharedRecord, DatabaseError> {
        let selected: Vec<Uuid> = from_json_list("shared_records.selected_check_ids", &self.selected_check_ids)?;
        Ok(SharedRecord {
            id: SharedRecordId(parse_uuid("shared_records.id", &self.id)?),
            share_token: self.share_token,
            pet_id: PetId(parse_uuid("shared_records.pet_id", &self.pet_id)?),
            owner_id: self.owner_id,
            selected_check_ids: selected.into_iter().map(SymptomCheckId).collect(),
            care_notes: self.care_notes,
            vet_name: self.vet_name,
            vet_email: self.vet_email,
            view_count: self.view_count,
            expires_at: parse_timestamp("shared_records.expires_at", &self.expires_at)?,
            created_at: parse_timestamp("shared_records.created_at", &self.created_at)?,
        })
    }
}

pub fn insert_shared_record(conn: &Connection, record: &SharedRecord) -> Result<(), DatabaseError> {
    let selected: Vec<Uuid> = record.selected_check_ids.iter().map(|id| id.0).collect();
    conn.execute(
        "INSERT INTO shared_records (id, share_token, pet_id, owner_id, selected_check_ids,
                                     care_notes, vet_name, vet_email, view_count, expires_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            record.id.0.to_string(),
            record.share_token,
            record.pet_id.to_string(),
            record.owner_id,
            to_json_list(&selected),
            record.care_notes,
            record.vet_name,
            record.vet_email,
            record.view_count,
            timestamp(record.expires_at),
            timestamp(record.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_by_token(conn: &Connection, token: &str) -> Result<Option<SharedRecord>, DatabaseError> {
    conn.query_row(
        "SELECT id, share_token, pet_id, owner_id, selected_check_ids, care_notes, vet_name,
                vet_email, view_count, expires_at, created_at
         FROM shared_records WHERE share_token = ?1",
        params![token],
        SharedRow::from_row,
    )
    .optional()?
    .map(SharedRow::decode)
    .transpose()
}

/// Add one view and return the new count
pub fn increment_view_count(conn: &Connection, id: SharedRecordId) -> Result<u32, DatabaseError> {
    let count = conn.query_row(
        "UPDATE shared_records SET view_count = view_count + 1 WHERE id = ?1 RETURNING view_count",
        params![id.0.to_string()],
        |row| row.get::<_, u32>(0),
    )?;
    Ok(count)
}
