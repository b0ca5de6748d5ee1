//! vettriage REST API server

use anyhow::Result;
use llm_bridge::ProviderConfig;
use tracing_subscriber::EnvFilter;
use vettriage_server::ServerConfig;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    vettriage_server::serve(ServerConfig::from_env(), ProviderConfig::from_env()).await
}
