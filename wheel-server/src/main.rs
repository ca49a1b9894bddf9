use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use wheel_core::rarity::catalogue::FALLBACK_CATALOGUE;
use wheel_server::api::{self, ApiState};
use wheel_server::catalogue::{CatalogueCache, StaticSource};
use wheel_server::storage::memory::MemoryStore;

const DEFAULT_PORT: u16 = 3001;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let port = std::env::var("WHEEL_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT);

    // Catalogue document: a local file when configured, otherwise the
    // embedded fallback roster.
    let document = match std::env::var("WHEEL_CATALOGUE_PATH") {
        Ok(path) => {
            info!(path, "loading catalogue document");
            std::fs::read_to_string(&path)?
        }
        Err(_) => {
            warn!("WHEEL_CATALOGUE_PATH not set, using embedded catalogue");
            FALLBACK_CATALOGUE.to_string()
        }
    };

    let store = Arc::new(MemoryStore::new());
    let state = ApiState {
        ledger: store.clone(),
        achievements: store.clone(),
        events: store,
        catalogue: Arc::new(CatalogueCache::new(Arc::new(StaticSource(document)))),
    };

    api::start_api_server(state, port).await
}
