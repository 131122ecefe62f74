use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use matchboard::bot;
use matchboard::catalog::StaticCatalog;
use matchboard::config::Config;
use matchboard::error::AppError;
use matchboard::render::TextRenderer;
use matchboard::service::match_game::MatchGameService;
use matchboard::store::MemoryStore;

/// Size of the demo card pool the binary ships with. A real deployment
/// plugs the photocard library in behind `CardCatalog` instead.
const DEMO_POOL_SIZE: u64 = 64;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let catalog = Arc::new(StaticCatalog::sequential(DEMO_POOL_SIZE));
    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(MatchGameService::new(catalog, store));

    tracing::info!("Starting matchboard");

    bot::start::start_bot(&config, service, Arc::new(TextRenderer)).await
}
