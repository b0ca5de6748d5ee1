//! Core types for the vettriage domain
//!
//! Pets, symptom checks, and shared records as they are stored and
//! returned over the API. List-valued medical attributes are plain
//! `Vec<String>` here; serialization to a column is the storage layer's job.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a pet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PetId(pub Uuid);

impl PetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PetId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a symptom check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SymptomCheckId(pub Uuid);

impl SymptomCheckId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SymptomCheckId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SymptomCheckId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Unique identifier for a shared record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SharedRecordId(pub Uuid);

impl SharedRecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SharedRecordId {
    fn default() -> Self {
        Self::new()
    }
}

/// Triage classification attached to a symptom analysis
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeverityCategory {
    /// Life-threatening, go to a vet now
    Emergency,
    /// Needs a vet within 24 hours
    Urgent,
    /// Schedule a visit within a few days
    #[serde(rename = "Non-Urgent")]
    #[default]
    NonUrgent,
    /// Safe to observe at home
    Monitor,
}

impl SeverityCategory {
    pub const ALL: [SeverityCategory; 4] = [
        SeverityCategory::Emergency,
        SeverityCategory::Urgent,
        SeverityCategory::NonUrgent,
        SeverityCategory::Monitor,
    ];

    /// Canonical label, as used on the wire and in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            SeverityCategory::Emergency => "Emergency",
            SeverityCategory::Urgent => "Urgent",
            SeverityCategory::NonUrgent => "Non-Urgent",
            SeverityCategory::Monitor => "Monitor",
        }
    }

    /// Parse an exact canonical label
    pub fn parse_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == label)
    }

    /// Map any label to a canonical category, defaulting to `NonUrgent`
    pub fn normalize(label: &str) -> Self {
        Self::parse_label(label).unwrap_or_default()
    }
}

impl fmt::Display for SeverityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated result of a model's symptom interpretation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomAnalysis {
    pub possible_causes: Vec<String>,
    pub severity_category: SeverityCategory,
    pub recommendations: Vec<String>,
    pub when_to_visit_vet: String,
    pub disclaimer: String,
}

/// A registered pet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    pub id: PetId,
    pub owner_id: String,
    pub name: String,
    /// Catalogue key, e.g. `dog` or `bearded_dragon`
    pub species: String,
    pub breed: Option<String>,
    /// Age in months
    pub age_months: u32,
    /// Weight in the species' unit (kg, grams, or cm for fish)
    pub weight: Option<f64>,
    pub photo_url: Option<String>,
    pub known_conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub medications: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create/update payload for a pet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PetInput {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age_months: u32,
    pub weight: Option<f64>,
    /// `None` on update keeps the stored photo
    pub photo_url: Option<String>,
    pub known_conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub medications: Vec<String>,
}

impl PetInput {
    /// Check required fields; returns a user-facing message on failure
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() || self.species.trim().is_empty() || self.age_months == 0 {
            return Err("Name, species, and age are required".to_string());
        }
        if matches!(self.weight, Some(w) if !w.is_finite() || w < 0.0) {
            return Err("Weight must be a non-negative number".to_string());
        }
        Ok(())
    }

    /// Breed with blank values collapsed to `None`
    pub fn breed(&self) -> Option<String> {
        non_blank(self.breed.as_deref())
    }

    /// Weight with zero collapsed to `None`
    pub fn weight(&self) -> Option<f64> {
        self.weight.filter(|w| *w > 0.0)
    }
}

/// Trim a string and drop it if nothing is left
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A stored symptom report with its analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymptomCheck {
    pub id: SymptomCheckId,
    pub pet_id: PetId,
    pub symptoms: String,
    #[serde(flatten)]
    pub analysis: SymptomAnalysis,
    pub created_at: DateTime<Utc>,
}

/// A time-limited capability granting read access to part of a pet's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedRecord {
    pub id: SharedRecordId,
    pub share_token: String,
    pub pet_id: PetId,
    pub owner_id: String,
    pub selected_check_ids: Vec<SymptomCheckId>,
    pub care_notes: Option<String>,
    pub vet_name: Option<String>,
    pub vet_email: Option<String>,
    pub view_count: u32,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl SharedRecord {
    /// Expired at or after `expires_at`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_pet_id_creation() {
        let id1 = PetId::new();
        let id2 = PetId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_severity_serialization_uses_labels() {
        let json = serde_json::to_string(&SeverityCategory::NonUrgent).unwrap();
        assert_eq!(json, "\"Non-Urgent\"");

        let parsed: SeverityCategory = serde_json::from_str("\"Emergency\"").unwrap();
        assert_eq!(parsed, SeverityCategory::Emergency);
    }

    #[test]
    fn test_severity_normalize() {
        assert_eq!(SeverityCategory::normalize("Critical"), SeverityCategory::NonUrgent);
        assert_eq!(SeverityCategory::normalize("urgent"), SeverityCategory::NonUrgent);
        assert_eq!(SeverityCategory::default(), SeverityCategory::NonUrgent);
        for category in SeverityCategory::ALL {
            assert_eq!(SeverityCategory::normalize(category.as_str()), category);
        }
    }

    #[test]
    fn test_pet_input_validation() {
        let mut input = PetInput {
            name: "Rex".to_string(),
            species: "dog".to_string(),
            age_months: 24,
            ..Default::default()
        };
        assert!(input.validate().is_ok());

        input.age_months = 0;
        assert!(input.validate().is_err());

        input.age_months = 3;
        input.name = "   ".to_string();
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_pet_input_deserializes_with_defaults() {
        let input: PetInput =
            serde_json::from_str(r#"{"name":"Nemo","species":"goldfish","ageMonths":8}"#).unwrap();
        assert_eq!(input.age_months, 8);
        assert!(input.known_conditions.is_empty());
        assert!(input.photo_url.is_none());
    }

    #[test]
    fn test_shared_record_expiry_boundary() {
        let created = Utc::now();
        let record = SharedRecord {
            id: SharedRecordId::new(),
            share_token: "ab".repeat(32),
            pet_id: PetId::new(),
            owner_id: "owner".to_string(),
            selected_check_ids: Vec::new(),
            care_notes: None,
            vet_name: None,
            vet_email: None,
            view_count: 0,
            expires_at: created + Duration::days(7),
            created_at: created,
        };

        assert!(!record.is_expired(created + Duration::days(6)));
        assert!(record.is_expired(created + Duration::days(7)));
    }

    #[test]
    fn test_symptom_check_flattens_analysis() {
        let check = SymptomCheck {
            id: SymptomCheckId::new(),
            pet_id: PetId::new(),
            symptoms: "limping".to_string(),
            analysis: SymptomAnalysis {
                possible_causes: vec!["sprain".to_string()],
                severity_category: SeverityCategory::Monitor,
                recommendations: vec!["rest".to_string()],
                when_to_visit_vet: "if it persists".to_string(),
                disclaimer: "not a diagnosis".to_string(),
            },
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&check).unwrap();
        assert_eq!(json["severityCategory"], "Monitor");
        assert_eq!(json["possibleCauses"][0], "sprain");
    }
}
