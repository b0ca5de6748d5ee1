use rusqlite::{params, params_from_iter, Connection, Row};
use triage_core::{PetId, SeverityCategory, SymptomAnalysis, SymptomCheck, SymptomCheckId};

use super::{from_json_list, parse_timestamp, parse_uuid, timestamp, to_json_list, DatabaseError};

const CHECK_COLUMNS: &str = "id, pet_id, symptoms, possible_causes, severity_category,
     recommendations, when_to_visit_vet, disclaimer, created_at";

fn decode_row(row: &Row<'_>) -> rusqlite::Result<[String; 9]> {
    Ok([
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
        row.get(7)?,
        row.get(8)?,
    ])
}

fn into_check(columns: [String; 9]) -> Result<SymptomCheck, DatabaseError> {
    let [id, pet_id, symptoms, causes, severity, recommendations, when_to_visit_vet, disclaimer, created_at] =
        columns;

    let severity_category = SeverityCategory::parse_label(&severity).ok_or_else(|| DatabaseError::Corrupt {
        column: "symptom_checks.severity_category",
        reason: format!("unknown label {severity:?}"),
    })?;

    Ok(SymptomCheck {
        id: SymptomCheckId(parse_uuid("symptom_checks.id", &id)?),
        pet_id: PetId(parse_uuid("symptom_checks.pet_id", &pet_id)?),
        symptoms,
        analysis: SymptomAnalysis {
            possible_causes: from_json_list("symptom_checks.possible_causes", &causes)?,
            severity_category,
            recommendations: from_json_list("symptom_checks.recommendations", &recommendations)?,
            when_to_visit_vet,
            disclaimer,
        },
        created_at: parse_timestamp("symptom_checks.created_at", &created_at)?,
    })
}

pub fn insert_check(conn: &Connection, check: &SymptomCheck) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO symptom_checks (id, pet_id, symptoms, possible_causes, severity_category,
                                     recommendations, when_to_visit_vet, disclaimer, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            check.id.to_string(),
            check.pet_id.to_string(),
            check.symptoms,
            to_json_list(&check.analysis.possible_causes),
            check.analysis.severity_category.as_str(),
            to_json_list(&check.analysis.recommendations),
            check.analysis.when_to_visit_vet,
            check.analysis.disclaimer,
            timestamp(check.created_at),
        ],
    )?;
    Ok(())
}

/// Symptom history for a pet, newest first
pub fn list_checks_for_pet(conn: &Connection, pet_id: PetId) -> Result<Vec<SymptomCheck>, DatabaseError> {
    let sql = format!(
        "SELECT {CHECK_COLUMNS} FROM symptom_checks WHERE pet_id = ?1 ORDER BY created_at DESC, rowid DESC"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params![pet_id.to_string()], decode_row)?;

    let mut checks = Vec::new();
    for row in rows {
        checks.push(into_check(row?)?);
    }
    Ok(checks)
}

/// The subset of `ids` that belong to `pet_id`, newest first
pub fn get_checks_for_pet_by_ids(
    conn: &Connection,
    pet_id: PetId,
    ids: &[SymptomCheckId],
) -> Result<Vec<SymptomCheck>, DatabaseError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = (2..ids.len() + 2)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let sql = format!(
        "SELECT {CHECK_COLUMNS} FROM symptom_checks
         WHERE pet_id = ?1 AND id IN ({placeholders})
         ORDER BY created_at DESC, rowid DESC"
    );

    let bindings = std::iter::once(pet_id.to_string()).chain(ids.iter().map(|id| id.to_string()));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(bindings), decode_row)?;

    let mut checks = Vec::new();
    for row in rows {
        checks.push(into_check(row?)?);
    }
    Ok(checks)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::open_memory_database;
    use crate::db::pets::{delete_pet, insert_pet, tests::sample_pet};
    use chrono::{Duration, Utc};

    pub(crate) fn sample_check(pet_id: PetId, symptoms: &str, age: Duration) -> SymptomCheck {
        SymptomCheck {
            id: SymptomCheckId::new(),
            pet_id,
            symptoms: symptoms.to_string(),
            analysis: SymptomAnalysis {
                possible_causes: vec!["GI stasis".to_string()],
                severity_category: SeverityCategory::Emergency,
                recommendations: vec!["Contact an exotic vet now".to_string()],
                when_to_visit_vet: "Immediately".to_string(),
                disclaimer: "This is not a diagnosis.".to_string(),
            },
            created_at: Utc::now() - age,
        }
    }

    #[test]
    fn history_is_newest_first() {
        let conn = open_memory_database().unwrap();
        let pet = sample_pet("owner-1", "Clover");
        insert_pet(&conn, &pet).unwrap();

        insert_check(&conn, &sample_check(pet.id, "first", Duration::days(2))).unwrap();
        insert_check(&conn, &sample_check(pet.id, "second", Duration::hours(1))).unwrap();

        let history = list_checks_for_pet(&conn, pet.id).unwrap();
        let symptoms: Vec<&str> = history.iter().map(|c| c.symptoms.as_str()).collect();
        assert_eq!(symptoms, vec!["second", "first"]);
        assert_eq!(history[0].analysis.severity_category, SeverityCategory::Emergency);
    }

    #[test]
    fn lookup_by_ids_ignores_other_pets() {
        let conn = open_memory_database().unwrap();
        let pet = sample_pet("owner-1", "Clover");
        let other = sample_pet("owner-1", "Basil");
        insert_pet(&conn, &pet).unwrap();
        insert_pet(&conn, &other).unwrap();

        let mine = sample_check(pet.id, "mine", Duration::hours(2));
        let theirs = sample_check(other.id, "theirs", Duration::hours(1));
        insert_check(&conn, &mine).unwrap();
        insert_check(&conn, &theirs).unwrap();

        let found = get_checks_for_pet_by_ids(&conn, pet.id, &[mine.id, theirs.id]).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, mine.id);

        assert!(get_checks_for_pet_by_ids(&conn, pet.id, &[]).unwrap().is_empty());
    }

    #[test]
    fn deleting_pet_cascades_to_checks() {
        let conn = open_memory_database().unwrap();
        let pet = sample_pet("owner-1", "Clover");
        insert_pet(&conn, &pet).unwrap();
        insert_check(&conn, &sample_check(pet.id, "sneezing", Duration::zero())).unwrap();

        delete_pet(&conn, pet.id).unwrap();
        let remaining: i64 = conn
            .query_row("SELECT COUNT(*) FROM symptom_checks", [], |row| row.get(0))
            .unwrap();
        assert_eq!(remaining, 0);
    }
}
