use rusqlite::{params, Connection, OptionalExtension, Row};
use triage_core::{Pet, PetId};

use super::{from_json_list, parse_timestamp, parse_uuid, timestamp, to_json_list, DatabaseError};

const PET_COLUMNS: &str = "id, owner_id, name, species, breed, age_months, weight, photo_url,
     known_conditions, allergies, medications, created_at, updated_at";

/// Raw column values before decoding
struct PetRow {
    id: String,
    owner_id: String,
    name: String,
    species: String,
    breed: Option<String>,
    age_months: u32,
    weight: Option<f64>,
    photo_url: Option<String>,
    known_conditions: String,
    allergies: String,
    medications: String,
    created_at: String,
    updated_at: String,
}

impl PetRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            owner_id: row.get(1)?,
            name: row.get(2)?,
            species: row.get(3)?,
            breed: row.get(4)?,
            age_months: row.get(5)?,
            weight: row.get(6)?,
            photo_url: row.get(7)?,
            known_conditions: row.get(8)?,
            allergies: row.get(9)?,
            medications: row.get(10)?,
            created_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    fn decode(self) -> Result<Pet, DatabaseError> {
        Ok(Pet {
            id: PetId(parse_uuid("pets.id", &self.id)?),
            owner_id: self.owner_id,
            name: self.name,
            species: self.species,
            breed: self.breed,
            age_months: self.age_months,
            weight: self.weight,
            photo_url: self.photo_url,
            known_conditions: from_json_list("pets.known_conditions", &self.known_conditions)?,
            allergies: from_json_list("pets.allergies", &self.allergies)?,
            medications: from_json_list("pets.medications", &self.medications)?,
            created_at: parse_timestamp("pets.created_at", &self.created_at)?,
            updated_at: parse_timestamp("pets.updated_at", &self.updated_at)?,
        })
    }
}

pub fn insert_pet(conn: &Connection, pet: &Pet) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO pets (id, owner_id, name, species, breed, age_months, weight, photo_url,
                           known_conditions, allergies, medications, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            pet.id.to_string(),
            pet.owner_id,
            pet.name,
            pet.species,
            pet.breed,
            pet.age_months,
            pet.weight,
            pet.photo_url,
            to_json_list(&pet.known_conditions),
            to_json_list(&pet.allergies),
            to_json_list(&pet.medications),
            timestamp(pet.created_at),
            timestamp(pet.updated_at),
        ],
    )?;
    Ok(())
}

/// Fetch a pet regardless of owner
pub fn get_pet(conn: &Connection, id: PetId) -> Result<Option<Pet>, DatabaseError> {
    let sql = format!("SELECT {PET_COLUMNS} FROM pets WHERE id = ?1");
    conn.query_row(&sql, params![id.to_string()], PetRow::from_row)
        .optional()?
        .map(PetRow::decode)
        .transpose()
}

/// Fetch a pet only if it belongs to `owner_id`
pub fn get_pet_for_owner(conn: &Connection, id: PetId, owner_id: &str) -> Result<Option<Pet>, DatabaseError> {
    let sql = format!("SELECT {PET_COLUMNS} FROM pets WHERE id = ?1 AND owner_id = ?2");
    conn.query_row(&sql, params![id.to_string(), owner_id], PetRow::from_row)
        .optional()?
        .map(PetRow::decode)
        .transpose()
}

/// All pets of an owner, newest first
pub fn list_pets_for_owner(conn: &Connection, owner_id: &str) -> Result<Vec<Pet>, DatabaseError> {
    let sql = format!("SELECT {PET_COLUMNS} FROM pets WHERE owner_id = ?1 ORDER BY created_at DESC, rowid DESC");
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![owner_id], PetRow::from_row)?;

    let mut pets = Vec::new();
    for row in rows {
        pets.push(row?.decode()?);
    }
    Ok(pets)
}

pub fn update_pet(conn: &Connection, pet: &Pet) -> Result<(), DatabaseError> {
    conn.execute(
        "UPDATE pets SET name = ?2, species = ?3, breed = ?4, age_months = ?5, weight = ?6,
                photo_url = ?7, known_conditions = ?8, allergies = ?9, medications = ?10,
                updated_at = ?11
         WHERE id = ?1",
        params![
            pet.id.to_string(),
            pet.name,
            pet.species,
            pet.breed,
            pet.age_months,
            pet.weight,
            pet.photo_url,
            to_json_list(&pet.known_conditions),
            to_json_list(&pet.allergies),
            to_json_list(&pet.medications),
            timestamp(pet.updated_at),
        ],
    )?;
    Ok(())
}

/// Delete a pet; its checks and share links go with it
pub fn delete_pet(conn: &Connection, id: PetId) -> Result<bool, DatabaseError> {
    let deleted = conn.execute("DELETE FROM pets WHERE id = ?1", params![id.to_string()])?;
    Ok(deleted > 0)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use chrono::{Duration, Utc};

    pub(crate) fn sample_pet(owner_id: &str, name: &str) -> Pet {
        let now = Utc::now();
        Pet {
            id: PetId::new(),
            owner_id: owner_id.to_string(),
            name: name.to_string(),
            species: "rabbit".to_string(),
            breed: Some("Holland Lop".to_string()),
            age_months: 18,
            weight: Some(1.8),
            photo_url: None,
            known_conditions: vec!["dental overgrowth".to_string()],
            allergies: Vec::new(),
            medications: vec!["meloxicam".to_string()],
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn insert_and_fetch_round_trips_lists() {
        let conn = open_memory_database().unwrap();
        let pet = sample_pet("owner-1", "Clover");
        insert_pet(&conn, &pet).unwrap();

        let fetched = get_pet(&conn, pet.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Clover");
        assert_eq!(fetched.known_conditions, vec!["dental overgrowth"]);
        assert_eq!(fetched.medications, vec!["meloxicam"]);
        assert_eq!(fetched.weight, Some(1.8));
    }

    #[test]
    fn owner_scoped_lookup() {
        let conn = open_memory_database().unwrap();
        let pet = sample_pet("owner-1", "Clover");
        insert_pet(&conn, &pet).unwrap();

        assert!(get_pet_for_owner(&conn, pet.id, "owner-1").unwrap().is_some());
        assert!(get_pet_for_owner(&conn, pet.id, "owner-2").unwrap().is_none());
    }

    #[test]
    fn list_is_newest_first_and_owner_scoped() {
        let conn = open_memory_database().unwrap();
        let mut older = sample_pet("owner-1", "Older");
        older.created_at = Utc::now() - Duration::days(3);
        let newer = sample_pet("owner-1", "Newer");
        let other = sample_pet("owner-2", "Other");
        for pet in [&older, &newer, &other] {
            insert_pet(&conn, pet).unwrap();
        }

        let names: Vec<String> = list_pets_for_owner(&conn, "owner-1")
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Newer", "Older"]);
    }

    #[test]
    fn update_and_delete() {
        let conn = open_memory_database().unwrap();
        let mut pet = sample_pet("owner-1", "Clover");
        insert_pet(&conn, &pet).unwrap();

        pet.age_months = 19;
        pet.allergies = vec!["timothy hay".to_string()];
        update_pet(&conn, &pet).unwrap();
        let fetched = get_pet(&conn, pet.id).unwrap().unwrap();
        assert_eq!(fetched.age_months, 19);
        assert_eq!(fetched.allergies, vec!["timothy hay"]);

        assert!(delete_pet(&conn, pet.id).unwrap());
        assert!(!delete_pet(&conn, pet.id).unwrap());
        assert!(get_pet(&conn, pet.id).unwrap().is_none());
    }
}
