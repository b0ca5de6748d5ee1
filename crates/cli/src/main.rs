//! vettriage CLI
//!
//! Runs the API server, or analyzes a single symptom report from the
//! command line against the configured model backend.
//!
//! Copyright (c) 2025 Michael A Wright

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use llm_bridge::{
    AnalysisRequest, ImageAttachment, LlmAnalyzer, OllamaConfig, ProviderConfig, SymptomAnalyzer,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use triage_core::emergency::detect_emergency_keywords;
use triage_core::species::{species_info, CATEGORIES};
use triage_core::{build_user_prompt, PetProfile, SYSTEM_PROMPT};
use vettriage_server::ServerConfig;

mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("BUILT_GIT_COMMIT_HASH"),
    ", built ",
    env!("BUILT_TIME_UTC"),
    ")"
);

#[derive(Parser)]
#[command(name = "vettriage")]
#[command(version = VERSION)]
#[command(about = "Species-aware symptom triage for pets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the REST API server
    Serve {
        /// Listen address (overrides BIND_ADDR)
        #[arg(short, long)]
        bind: Option<String>,

        /// SQLite database file (overrides DATABASE_PATH)
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Origin used in share URLs (overrides PUBLIC_BASE_URL)
        #[arg(long)]
        base_url: Option<String>,

        /// Force the local Ollama backend
        #[arg(long)]
        ollama: bool,
    },

    /// Analyze one symptom report and print the result as JSON
    Analyze {
        #[command(flatten)]
        pet: PetArgs,

        /// Free-text description of the symptoms
        #[arg(short, long)]
        symptoms: String,

        /// Photo of the symptom (repeatable, hosted backend only)
        #[arg(short, long = "image")]
        images: Vec<PathBuf>,

        /// Force the local Ollama backend
        #[arg(long)]
        ollama: bool,
    },

    /// Print the prompts that would be sent, without calling a model
    Prompt {
        #[command(flatten)]
        pet: PetArgs,

        #[arg(short, long)]
        symptoms: String,

        /// Include the system prompt
        #[arg(long)]
        system: bool,
    },

    /// List supported species and the vet type each needs
    Species,
}

#[derive(Args)]
struct PetArgs {
    /// Species key, e.g. dog, parrot, bearded_dragon
    #[arg(long)]
    species: String,

    /// Age in months
    #[arg(long)]
    age_months: u32,

    #[arg(long, default_value = "My pet")]
    name: String,

    #[arg(long)]
    breed: Option<String>,

    /// Weight or length, in the unit the species uses
    #[arg(long)]
    weight: Option<f64>,

    /// Known condition (repeatable)
    #[arg(long = "condition")]
    conditions: Vec<String>,

    /// Allergy or sensitivity (repeatable)
    #[arg(long = "allergy")]
    allergies: Vec<String>,

    /// Current medication or treatment (repeatable)
    #[arg(long = "medication")]
    medications: Vec<String>,
}

impl PetArgs {
    fn into_profile(self) -> Result<PetProfile> {
        if self.age_months == 0 {
            bail!("Age must be at least one month");
        }
        Ok(PetProfile {
            name: self.name,
            species: self.species,
            breed: self.breed,
            age_months: self.age_months,
            weight: self.weight,
            known_conditions: self.conditions,
            allergies: self.allergies,
            medications: self.medications,
        })
    }
}

fn provider_config(force_ollama: bool) -> ProviderConfig {
    if force_ollama {
        ProviderConfig::Ollama(OllamaConfig::from_lookup(&|k| std::env::var(k).ok()))
    } else {
        ProviderConfig::from_env()
    }
}

fn read_images(paths: &[PathBuf]) -> Result<Vec<ImageAttachment>> {
    paths
        .iter()
        .map(|path| {
            let bytes = std::fs::read(path).with_context(|| format!("Failed to read image {}", path.display()))?;
            Ok(ImageAttachment::from_bytes(&bytes))
        })
        .collect()
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    tracing::debug!(
        version = built_info::PKG_VERSION,
        target = built_info::TARGET,
        profile = built_info::PROFILE,
        "vettriage starting"
    );

    match cli.command {
        Commands::Serve {
            bind,
            database,
            base_url,
            ollama,
        } => {
            let mut config = ServerConfig::from_env();
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if let Some(database) = database {
                config.database_path = database;
            }
            if let Some(base_url) = base_url {
                config.public_base_url = base_url.trim_end_matches('/').to_string();
            }
            vettriage_server::serve(config, provider_config(ollama)).await
        }
        Commands::Analyze {
            pet,
            symptoms,
            images,
            ollama,
        } => {
            let request = AnalysisRequest {
                symptoms: symptoms.trim().to_string(),
                pet: pet.into_profile()?,
                images: read_images(&images)?,
            };
            if request.symptoms.is_empty() {
                bail!("Symptoms are required");
            }

            let keywords = detect_emergency_keywords(&request.symptoms);
            if !keywords.is_empty() {
                eprintln!(
                    "WARNING: possible emergency ({}). Contact a vet or emergency clinic now.",
                    keywords.join(", ")
                );
            }

            let analyzer = LlmAnalyzer::from_config(provider_config(ollama))?;
            let analysis = analyzer
                .analyze(&request)
                .await
                .with_context(|| format!("Analysis via {} failed", analyzer.provider_name()))?;

            println!("{}", serde_json::to_string_pretty(&analysis)?);
            Ok(())
        }
        Commands::Prompt { pet, symptoms, system } => {
            let profile = pet.into_profile()?;
            if system {
                println!("{SYSTEM_PROMPT}\n");
            }
            println!("{}", build_user_prompt(symptoms.trim(), &profile));
            Ok(())
        }
        Commands::Species => {
            for category in CATEGORIES {
                println!("{}:", category.label);
                for (key, ..) in category.species {
                    let info = species_info(key);
                    println!(
                        "  {} {:<16} {:<18} {}",
                        info.icon,
                        info.value,
                        info.label,
                        info.vet_type.label()
                    );
                }
            }
            Ok(())
        }
    }
}
