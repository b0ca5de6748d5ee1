//! Prompt construction for symptom analysis
//!
//! The system prompt is fixed. The user prompt is assembled from the pet's
//! attributes and the owner's description; it is a pure function of its
//! input so the same report always produces the same text.

use crate::species::{species_info, weight_unit, VetType, SMALL_MAMMALS};
use crate::types::Pet;
use std::fmt::Write as _;

pub const SYSTEM_PROMPT: &str = r#"You are a veterinary triage assistant helping pet owners understand possible causes of their pet's symptoms. You are NOT a veterinarian and cannot diagnose conditions.

You provide guidance for ALL types of pets including:
- Mammals: Dogs, cats, rabbits, hamsters, guinea pigs, ferrets
- Birds: Parrots, parakeets, cockatiels, canaries, finches, chickens
- Reptiles: Turtles, tortoises, snakes, lizards, geckos, bearded dragons, iguanas
- Fish: Goldfish, betta fish, tropical fish, koi
- Amphibians: Frogs, axolotls, salamanders

Your role is to:
1. Interpret the symptoms described for the SPECIFIC type of animal
2. Suggest possible causes (never definitive diagnoses)
3. Assess severity and urgency ACCURATELY based on the symptoms AND the species
4. Recommend safe home actions when appropriate for that species
5. Guide when to seek veterinary care (noting if a specialist is needed)
6. Always include safety disclaimers

SPECIES-SPECIFIC CONSIDERATIONS:

For BIRDS:
- Birds hide illness well - any obvious symptoms are often serious
- Fluffed feathers, sitting at cage bottom, or changes in droppings are concerning
- Respiratory symptoms (tail bobbing, open-mouth breathing) are urgent
- Egg binding in females is an emergency

For REPTILES:
- Temperature regulation issues can cause many symptoms
- Metabolic bone disease is common in calcium-deficient diets
- Respiratory infections show as mouth gaping, wheezing, mucus
- Impaction from substrates is a common issue

For FISH:
- Water quality is the #1 cause of fish illness
- Ich (white spots), fin rot, and swim bladder issues are common
- Gasping at surface indicates oxygen or water quality problems
- Quarantine new fish to prevent disease spread

For SMALL MAMMALS (rabbits, hamsters, guinea pigs):
- GI stasis in rabbits is an emergency
- Dental issues are very common
- Wet tail in hamsters is serious
- Respiratory issues spread quickly

SEVERITY CLASSIFICATION - Choose the MOST APPROPRIATE category:

"Emergency" - Use ONLY for life-threatening situations:
  - Difficulty breathing in any species
  - Collapse, unconsciousness, or unresponsiveness
  - Severe bleeding that won't stop
  - Suspected poisoning
  - Seizures
  - Egg binding (birds/reptiles)
  - GI stasis with no fecal output for 12+ hours (rabbits)
  - Fish floating sideways or upside down
  - Prolapse (any species)

"Urgent" - Needs vet within 24 hours:
  - Not eating for 24+ hours (12 hours for small mammals/birds)
  - Bird with fluffed feathers and lethargy
  - Reptile with mouth gaping or wheezing
  - Visible injuries or wounds
  - Bloody droppings or discharge
  - Swelling or lumps

"Non-Urgent" - Schedule vet visit within a few days:
  - Mild appetite decrease but still eating some
  - Minor skin issues, shedding problems (reptiles)
  - Slight behavior changes
  - Feather plucking (birds) without skin damage
  - Minor fin damage (fish)

"Monitor" - Safe to observe at home:
  - Occasional sneezing without discharge
  - Slightly less active but still eating/drinking normally
  - Minor behavioral changes
  - Normal shedding (reptiles)
  - Temporary water cloudiness (fish tanks)

IMPORTANT: Consider the species' normal behaviors and health patterns. What's minor for a dog might be serious for a bird or rabbit.

You must respond in valid JSON format with this exact structure:
{
  "possibleCauses": ["cause 1", "cause 2", "cause 3"],
  "severityCategory": "Emergency",
  "recommendations": ["action 1", "action 2", "action 3"],
  "whenToVisitVet": "specific guidance on when to seek veterinary care",
  "disclaimer": "This is not a diagnosis. The information provided is for educational purposes only and should not replace professional veterinary advice. If you are concerned about your pet's health, please consult a qualified veterinarian."
}

For severityCategory, use EXACTLY one of these values: "Emergency", "Urgent", "Non-Urgent", or "Monitor""#;

/// The attributes of a pet that feed into the prompt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetProfile {
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub age_months: u32,
    pub weight: Option<f64>,
    pub known_conditions: Vec<String>,
    pub allergies: Vec<String>,
    pub medications: Vec<String>,
}

impl From<&Pet> for PetProfile {
    fn from(pet: &Pet) -> Self {
        Self {
            name: pet.name.clone(),
            species: pet.species.clone(),
            breed: pet.breed.clone(),
            age_months: pet.age_months,
            weight: pet.weight,
            known_conditions: pet.known_conditions.clone(),
            allergies: pet.allergies.clone(),
            medications: pet.medications.clone(),
        }
    }
}

/// Human-readable age: whole years from 12 months up, months below
pub fn age_text(age_months: u32) -> String {
    if age_months >= 12 {
        let years = age_months / 12;
        format!("{} year{}", years, if years > 1 { "s" } else { "" })
    } else {
        format!("{} month{}", age_months, if age_months > 1 { "s" } else { "" })
    }
}

/// Age-based urgency cue for very young or senior animals
pub fn age_note(species: &str, vet_type: VetType, age_months: u32) -> Option<&'static str> {
    match species {
        "dog" if age_months < 6 => Some("NOTE: This is a young puppy - may need elevated urgency"),
        "dog" if age_months >= 84 => Some("NOTE: This is a senior dog - may need elevated urgency"),
        "dog" => None,
        "cat" if age_months < 6 => Some("NOTE: This is a young kitten - may need elevated urgency"),
        "cat" if age_months >= 132 => Some("NOTE: This is a senior cat - may need elevated urgency"),
        "cat" => None,
        _ if vet_type == VetType::Avian && age_months < 6 => {
            Some("NOTE: This is a young bird - may need elevated urgency")
        }
        _ if vet_type == VetType::Exotic && age_months < 3 => {
            Some("NOTE: This is a young small mammal - may need elevated urgency")
        }
        _ => None,
    }
}

/// Closing reminder tailored to the animal group
pub fn species_reminder(species: &str, vet_type: VetType) -> Option<&'static str> {
    match vet_type {
        VetType::Avian => Some(
            "Remember: Birds hide illness well. Visible symptoms often indicate the condition has progressed.",
        ),
        VetType::Reptile => Some(
            "Remember: Consider husbandry factors (temperature, humidity, lighting, diet) as potential causes.",
        ),
        VetType::Aquatic => Some(
            "Remember: Water quality is the most common cause of fish health issues. Consider ammonia, nitrite, pH, and temperature.",
        ),
        _ if SMALL_MAMMALS.contains(&species) => Some(
            "Remember: Small mammals have fast metabolisms. Not eating for even 12 hours can be serious.",
        ),
        _ => None,
    }
}

/// Build the user prompt for one symptom report
pub fn build_user_prompt(symptoms: &str, pet: &PetProfile) -> String {
    let info = species_info(&pet.species);
    let vet_type = info.vet_type;

    // Writing to a String cannot fail
    let mut prompt = String::new();
    let _ = write!(
        prompt,
        "Pet Information:\n- Name: {}\n- Species: {} ({})\n- Animal Type: {}\n- Breed/Variety: {}\n- Age: {}",
        pet.name,
        info.label,
        pet.species,
        vet_type.as_str(),
        pet.breed.as_deref().filter(|b| !b.is_empty()).unwrap_or("Unknown/Mixed"),
        age_text(pet.age_months),
    );

    if let Some(weight) = pet.weight.filter(|w| *w > 0.0) {
        let _ = write!(
            prompt,
            "\n- Weight/Size: {} {}",
            weight,
            weight_unit(&pet.species, vet_type)
        );
    }

    if let Some(note) = age_note(&pet.species, vet_type, pet.age_months) {
        let _ = write!(prompt, "\n- {}", note);
    }

    if !pet.known_conditions.is_empty() {
        let _ = write!(prompt, "\n- Known conditions: {}", pet.known_conditions.join(", "));
    }
    if !pet.allergies.is_empty() {
        let _ = write!(prompt, "\n- Allergies/Sensitivities: {}", pet.allergies.join(", "));
    }
    if !pet.medications.is_empty() {
        let _ = write!(
            prompt,
            "\n- Current medications/treatments: {}",
            pet.medications.join(", ")
        );
    }

    let _ = write!(prompt, "\n\nReported Symptoms:\n{}", symptoms);

    if let Some(reminder) = species_reminder(&pet.species, vet_type) {
        let _ = write!(prompt, "\n\n{}", reminder);
    }

    let _ = write!(
        prompt,
        "\n\nAnalyze these symptoms and respond with JSON only. Choose the severity category that BEST matches the symptoms for this specific species - consider what's normal vs. concerning for a {}.",
        info.label
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn senior_dog() -> PetProfile {
        PetProfile {
            name: "Biscuit".to_string(),
            species: "dog".to_string(),
            breed: Some("Beagle".to_string()),
            age_months: 96,
            weight: Some(12.5),
            known_conditions: vec!["arthritis".to_string()],
            allergies: vec!["chicken".to_string(), "wheat".to_string()],
            medications: Vec::new(),
        }
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let pet = senior_dog();
        let a = build_user_prompt("Vomiting twice since morning", &pet);
        let b = build_user_prompt("Vomiting twice since morning", &pet);
        assert_eq!(a, b);
    }

    #[test]
    fn test_prompt_contains_pet_details() {
        let prompt = build_user_prompt("Limping on the back left leg", &senior_dog());

        assert!(prompt.starts_with("Pet Information:\n- Name: Biscuit"));
        assert!(prompt.contains("- Species: Dog (dog)"));
        assert!(prompt.contains("- Animal Type: small animal"));
        assert!(prompt.contains("- Breed/Variety: Beagle"));
        assert!(prompt.contains("- Age: 8 years"));
        assert!(prompt.contains("- Weight/Size: 12.5 kg"));
        assert!(prompt.contains("senior dog"));
        assert!(prompt.contains("- Known conditions: arthritis"));
        assert!(prompt.contains("- Allergies/Sensitivities: chicken, wheat"));
        assert!(!prompt.contains("Current medications"));
        assert!(prompt.contains("Reported Symptoms:\nLimping on the back left leg"));
        assert!(prompt.ends_with("concerning for a Dog."));
    }

    #[test]
    fn test_age_text_boundaries() {
        assert_eq!(age_text(1), "1 month");
        assert_eq!(age_text(11), "11 months");
        assert_eq!(age_text(12), "1 year");
        assert_eq!(age_text(35), "2 years");
    }

    #[test]
    fn test_age_notes_by_species() {
        assert!(age_note("dog", VetType::SmallAnimal, 5).unwrap().contains("puppy"));
        assert_eq!(age_note("dog", VetType::SmallAnimal, 6), None);
        assert!(age_note("cat", VetType::SmallAnimal, 132).unwrap().contains("senior cat"));
        assert_eq!(age_note("cat", VetType::SmallAnimal, 131), None);
        assert!(age_note("parrot", VetType::Avian, 4).unwrap().contains("young bird"));
        assert!(age_note("rabbit", VetType::Exotic, 2).unwrap().contains("small mammal"));
        assert_eq!(age_note("rabbit", VetType::Exotic, 3), None);
        assert_eq!(age_note("snake", VetType::Reptile, 1), None);
    }

    #[test]
    fn test_reptile_prompt_has_husbandry_reminder() {
        let pet = PetProfile {
            name: "Spike".to_string(),
            species: "bearded_dragon".to_string(),
            age_months: 30,
            ..Default::default()
        };
        let prompt = build_user_prompt("Not eating", &pet);
        assert!(prompt.contains("- Breed/Variety: Unknown/Mixed"));
        assert!(prompt.contains("husbandry factors"));
    }

    #[test]
    fn test_fish_prompt_uses_cm_and_water_reminder() {
        let pet = PetProfile {
            name: "Bubbles".to_string(),
            species: "goldfish".to_string(),
            age_months: 14,
            weight: Some(8.0),
            ..Default::default()
        };
        let prompt = build_user_prompt("Gasping at surface", &pet);
        assert!(prompt.contains("- Weight/Size: 8 cm"));
        assert!(prompt.contains("Water quality is the most common cause"));
    }

    #[test]
    fn test_small_mammal_reminder() {
        let pet = PetProfile {
            name: "Pip".to_string(),
            species: "hamster".to_string(),
            age_months: 10,
            weight: Some(40.0),
            ..Default::default()
        };
        let prompt = build_user_prompt("Wet fur near tail", &pet);
        assert!(prompt.contains("- Weight/Size: 40 grams"));
        assert!(prompt.contains("fast metabolisms"));
    }

    #[test]
    fn test_unknown_species_has_no_reminder() {
        let pet = PetProfile {
            name: "Tiny".to_string(),
            species: "tarantula".to_string(),
            age_months: 20,
            ..Default::default()
        };
        let prompt = build_user_prompt("Lethargic", &pet);
        assert!(prompt.contains("- Species: tarantula (tarantula)"));
        assert!(prompt.contains("- Animal Type: general"));
        assert!(!prompt.contains("Remember:"));
    }
}
