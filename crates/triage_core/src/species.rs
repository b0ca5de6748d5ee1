//! Species catalogue
//!
//! Maps a species key to its display label and the kind of veterinarian
//! that treats it. Unknown keys fall back to a general entry so that any
//! free-form species still produces a usable prompt.

use serde::Serialize;

/// Kind of veterinary practice suited to a species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VetType {
    SmallAnimal,
    Exotic,
    Avian,
    Reptile,
    Aquatic,
    General,
}

impl VetType {
    /// Label used inside prompts ("small animal", "avian", ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            VetType::SmallAnimal => "small animal",
            VetType::Exotic => "exotic",
            VetType::Avian => "avian",
            VetType::Reptile => "reptile",
            VetType::Aquatic => "aquatic",
            VetType::General => "general",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            VetType::SmallAnimal => "Small Animal Vet",
            VetType::Exotic => "Exotic Animal Vet",
            VetType::Avian => "Avian Vet",
            VetType::Reptile => "Reptile Vet",
            VetType::Aquatic => "Aquatic Vet",
            VetType::General => "General Vet",
        }
    }

    /// Search phrase for finding this kind of practice on a map service
    pub fn search_term(&self) -> &'static str {
        match self {
            VetType::SmallAnimal | VetType::General => "veterinarian",
            VetType::Exotic => "exotic pet veterinarian",
            VetType::Avian => "avian bird veterinarian",
            VetType::Reptile => "reptile veterinarian",
            VetType::Aquatic => "fish aquatic veterinarian",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            VetType::SmallAnimal => "General practice for dogs and cats",
            VetType::Exotic => "Specializes in rabbits, rodents, ferrets, and unusual pets",
            VetType::Avian => "Specializes in birds",
            VetType::Reptile => "Specializes in reptiles and amphibians",
            VetType::Aquatic => "Specializes in fish and aquatic animals",
            VetType::General => "General veterinary practice",
        }
    }
}

/// Catalogue entry for one species
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesInfo {
    pub value: String,
    pub label: String,
    pub icon: String,
    pub vet_type: VetType,
}

/// A group of species shown together
#[derive(Debug, Clone, Copy)]
pub struct SpeciesCategory {
    pub key: &'static str,
    pub label: &'static str,
    pub species: &'static [(&'static str, &'static str, &'static str, VetType)],
}

pub const CATEGORIES: &[SpeciesCategory] = &[
    SpeciesCategory {
        key: "mammal",
        label: "Mammals",
        species: &[
            ("dog", "Dog", "🐕", VetType::SmallAnimal),
            ("cat", "Cat", "🐈", VetType::SmallAnimal),
            ("rabbit", "Rabbit", "🐇", VetType::Exotic),
            ("hamster", "Hamster", "🐹", VetType::Exotic),
            ("guinea_pig", "Guinea Pig", "🐹", VetType::Exotic),
            ("ferret", "Ferret", "🦡", VetType::Exotic),
        ],
    },
    SpeciesCategory {
        key: "bird",
        label: "Birds",
        species: &[
            ("parrot", "Parrot", "🦜", VetType::Avian),
            ("parakeet", "Parakeet/Budgie", "🐦", VetType::Avian),
            ("cockatiel", "Cockatiel", "🐦", VetType::Avian),
            ("canary", "Canary", "🐤", VetType::Avian),
            ("finch", "Finch", "🐦", VetType::Avian),
            ("chicken", "Chicken", "🐔", VetType::Avian),
        ],
    },
    SpeciesCategory {
        key: "reptile",
        label: "Reptiles",
        species: &[
            ("turtle", "Turtle/Tortoise", "🐢", VetType::Reptile),
            ("snake", "Snake", "🐍", VetType::Reptile),
            ("lizard", "Lizard", "🦎", VetType::Reptile),
            ("gecko", "Gecko", "🦎", VetType::Reptile),
            ("bearded_dragon", "Bearded Dragon", "🦎", VetType::Reptile),
            ("iguana", "Iguana", "🦎", VetType::Reptile),
        ],
    },
    SpeciesCategory {
        key: "fish",
        label: "Fish",
        species: &[
            ("goldfish", "Goldfish", "🐠", VetType::Aquatic),
            ("betta", "Betta Fish", "🐟", VetType::Aquatic),
            ("tropical_fish", "Tropical Fish", "🐠", VetType::Aquatic),
            ("koi", "Koi", "🐟", VetType::Aquatic),
        ],
    },
    SpeciesCategory {
        key: "amphibian",
        label: "Amphibians",
        species: &[
            ("frog", "Frog", "🐸", VetType::Exotic),
            ("axolotl", "Axolotl", "🦎", VetType::Aquatic),
            ("salamander", "Salamander", "🦎", VetType::Exotic),
        ],
    },
];

/// Species whose weight is given in grams
const GRAM_WEIGHED: &[&str] = &["hamster", "guinea_pig", "parakeet", "canary", "finch"];

/// Small mammals with fast metabolisms
pub const SMALL_MAMMALS: &[&str] = &["rabbit", "guinea_pig", "hamster", "ferret"];

/// Look up a species; unknown keys get a general fallback
pub fn species_info(key: &str) -> SpeciesInfo {
    CATEGORIES
        .iter()
        .flat_map(|category| category.species.iter())
        .find(|(value, ..)| *value == key)
        .map(|&(value, label, icon, vet_type)| SpeciesInfo {
            value: value.to_string(),
            label: label.to_string(),
            icon: icon.to_string(),
            vet_type,
        })
        .unwrap_or_else(|| SpeciesInfo {
            value: key.to_string(),
            label: key.to_string(),
            icon: "🐾".to_string(),
            vet_type: VetType::General,
        })
}

/// Unit for the weight/size field of a species
pub fn weight_unit(key: &str, vet_type: VetType) -> &'static str {
    if vet_type == VetType::Aquatic {
        "cm"
    } else if GRAM_WEIGHED.contains(&key) {
        "grams"
    } else {
        "kg"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_species_lookup() {
        let info = species_info("bearded_dragon");
        assert_eq!(info.label, "Bearded Dragon");
        assert_eq!(info.vet_type, VetType::Reptile);
    }

    #[test]
    fn test_unknown_species_falls_back() {
        let info = species_info("capybara");
        assert_eq!(info.label, "capybara");
        assert_eq!(info.vet_type, VetType::General);
        assert_eq!(info.icon, "🐾");
    }

    #[test]
    fn test_axolotl_is_aquatic_amphibian() {
        assert_eq!(species_info("axolotl").vet_type, VetType::Aquatic);
        assert_eq!(species_info("frog").vet_type, VetType::Exotic);
    }

    #[test]
    fn test_weight_units() {
        assert_eq!(weight_unit("koi", VetType::Aquatic), "cm");
        assert_eq!(weight_unit("hamster", VetType::Exotic), "grams");
        assert_eq!(weight_unit("dog", VetType::SmallAnimal), "kg");
    }

    #[test]
    fn test_catalogue_has_25_species() {
        let total: usize = CATEGORIES.iter().map(|category| category.species.len()).sum();
        assert_eq!(total, 25);
    }
}
