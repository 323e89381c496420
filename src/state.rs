use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use dashboard_auth::AuthGate;
use dashboard_config::{AccessConfig, CorsConfig, DatabaseConfig, JwtConfig};
use dashboard_core::hash_password;
use dashboard_db::{MemoryStore, PgStore, ServiceRepository, UserRepository, seed_baseline};

/// Password given to the seeded baseline accounts.
pub const BASELINE_PASSWORD: &str = "password";

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AuthGate>,
    pub services: Arc<dyn ServiceRepository>,
    pub users: Arc<dyn UserRepository>,
    pub cors_config: CorsConfig,
}

impl AppState {
    /// Builds state where one store backs both resources.
    pub fn new<S>(gate: AuthGate, store: Arc<S>, cors_config: CorsConfig) -> Self
    where
        S: ServiceRepository + UserRepository + 'static,
    {
        Self {
            gate: Arc::new(gate),
            services: store.clone(),
            users: store,
            cors_config,
        }
    }
}

/// Reads configuration, connects the store and seeds the baseline records.
///
/// Falls back to the in-memory store when no database is configured.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let access = AccessConfig::from_env().context("Invalid access configuration")?;
    let gate = AuthGate::new(JwtConfig::from_env(), &access)
        .context("Invalid permission matrix")?;
    let cors_config = CorsConfig::from_env();
    let database = DatabaseConfig::from_env();

    let password_hash = hash_password(BASELINE_PASSWORD)
        .map_err(|e| anyhow::anyhow!("Failed to hash baseline password: {e}"))?;

    match &database.url {
        Some(url) => {
            let store = Arc::new(
                PgStore::connect(url, &database)
                    .await
                    .context("Failed to connect to database")?,
            );
            seed_baseline(store.as_ref(), &password_hash)
                .await
                .context("Failed to seed baseline data")?;
            info!("Using Postgres store");
            Ok(AppState::new(gate, store, cors_config))
        }
        None => {
            warn!("No database configured, using in-memory store");
            let store = Arc::new(MemoryStore::new());
            seed_baseline(store.as_ref(), &password_hash)
                .await
                .context("Failed to seed baseline data")?;
            Ok(AppState::new(gate, store, cors_config))
        }
    }
}
