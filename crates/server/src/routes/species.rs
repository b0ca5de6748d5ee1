use axum::Json;
use serde::Serialize;
use triage_core::species::{species_info, CATEGORIES};
use triage_core::{SpeciesInfo, VetType};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesEntry {
    #[serde(flatten)]
    pub info: SpeciesInfo,
    pub vet_label: &'static str,
    pub vet_search_term: &'static str,
    pub vet_description: &'static str,
}

#[derive(Debug, Serialize)]
pub struct CategoryEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub species: Vec<SpeciesEntry>,
}

fn entry(info: SpeciesInfo) -> SpeciesEntry {
    let vet_type: VetType = info.vet_type;
    SpeciesEntry {
        info,
        vet_label: vet_type.label(),
        vet_search_term: vet_type.search_term(),
        vet_description: vet_type.description(),
    }
}

/// The species catalogue grouped by category
pub async fn list_species() -> Json<Vec<CategoryEntry>> {
    let categories = CATEGORIES
        .iter()
        .map(|category| CategoryEntry {
            key: category.key,
            label: category.label,
            species: category
                .species
                .iter()
                .map(|(value, ..)| entry(species_info(value)))
                .collect(),
        })
        .collect();
    Json(categories)
}
