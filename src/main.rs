use anyhow::Context;
use chrono::Duration;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracklog::{
    auth::{AuthGateway, CredentialHasher, TokenService},
    build_router,
    config::{Config, StoreBackend},
    services::{seed_demo_data, MemoryStore, RedisStore, Store},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    let store: Arc<dyn Store> = match config.store.backend {
        StoreBackend::Memory => {
            tracing::warn!("Using the in-memory store; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
        StoreBackend::Redis => {
            let url = config.redis.url.as_deref().context("redis.url not configured")?;
            Arc::new(RedisStore::open(url).context("Failed to open Redis client")?)
        }
    };

    let hasher = CredentialHasher::new(config.auth.bcrypt_cost, config.auth.min_password_length);
    let tokens = TokenService::new(
        config.auth.secret.as_bytes(),
        Duration::seconds(config.auth.token_ttl_secs),
    );

    if config.seed.enabled {
        seed_demo_data(store.as_ref(), &hasher)
            .await
            .context("Failed to seed demo data")?;
    }

    let auth = AuthGateway::new(store.clone(), hasher, tokens)
        .context("Failed to initialise auth")?;
    let app = build_router(AppState::new(store, auth), config.server.max_body_bytes);

    let address = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    tracing::info!("Server running on {}", address);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
