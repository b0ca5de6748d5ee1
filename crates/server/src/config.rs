//! Server configuration from the environment

use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Listen address (default: 127.0.0.1:3000)
    pub bind_addr: String,
    /// SQLite file (default: vettriage.db)
    pub database_path: PathBuf,
    /// Origin used when building share URLs (default: http://localhost:3000)
    pub public_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            database_path: PathBuf::from("vettriage.db"),
            public_base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `BIND_ADDR`, `DATABASE_PATH`, `PUBLIC_BASE_URL`
    pub fn from_env() -> Self {
        Self::from_lookup(&|k| std::env::var(k).ok())
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

        Self {
            bind_addr: var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            database_path: var("DATABASE_PATH").map(PathBuf::from).unwrap_or(defaults.database_path),
            public_base_url: var("PUBLIC_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.public_base_url),
        }
    }

    pub fn share_url(&self, token: &str) -> String {
        format!("{}/shared/{}", self.public_base_url, token)
    }
}
