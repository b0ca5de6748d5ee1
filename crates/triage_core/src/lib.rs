//! Core domain for vettriage
//!
//! This crate provides the data structures shared by the server and the
//! model bridge, the species catalogue, and the two halves of the symptom
//! analysis contract: building a species-aware prompt and validating the
//! model's free-text reply into a [`SymptomAnalysis`].

pub mod emergency;
pub mod prompt;
pub mod species;
pub mod types;
pub mod validate;

pub use prompt::{build_user_prompt, PetProfile, SYSTEM_PROMPT};
pub use species::{species_info, SpeciesInfo, VetType};
pub use types::*;
pub use validate::{extract_json_object, validate_analysis, ValidationError};
