mod applications;
mod auth;
mod auth_client;
mod config;
mod dashboard;
mod db;
mod documents;
mod errors;
mod jobs;
mod models;
mod profile;
mod repo;
mod routes;
mod search;
mod session;
mod state;
mod storage;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use chrono::Utc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth_client::HostedAuthClient;
use crate::config::{Backend, Config, HostedConfig};
use crate::db::{create_pool, run_migrations};
use crate::repo::{seed::seed_jobs, MemoryRepository, Repositories};
use crate::routes::build_router;
use crate::session::{MemorySessionStore, RedisSessionStore, SessionStore};
use crate::state::AppState;
use crate::storage::{MemoryObjectStore, ObjectStore, S3ObjectStore};

/// Objects in the in-memory store are not served; links only identify them.
const MEMORY_STORAGE_URL: &str = "memory://documents";

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Job Board API v{}", env!("CARGO_PKG_VERSION"));

    let (repos, storage, sessions): (Repositories, Arc<dyn ObjectStore>, Arc<dyn SessionStore>) =
        match &config.backend {
            Backend::Memory => {
                let jobs = seed_jobs(Utc::now());
                info!("Using in-memory backend with {} seeded jobs", jobs.len());
                (
                    Repositories::memory(MemoryRepository::with_jobs(jobs)),
                    Arc::new(MemoryObjectStore::new(MEMORY_STORAGE_URL)),
                    Arc::new(MemorySessionStore::new(config.session_ttl_secs)),
                )
            }
            Backend::Hosted(hosted) => {
                // Initialize PostgreSQL
                let db = create_pool(&hosted.database_url).await?;
                run_migrations(&db).await?;

                // Initialize Redis
                let redis = redis::Client::open(hosted.redis_url.clone())?;
                info!("Redis client initialized");

                // Initialize S3 / MinIO
                let s3 = build_s3_client(hosted).await;
                info!("S3 client initialized (bucket: {})", hosted.s3_bucket);

                (
                    Repositories::postgres(db),
                    Arc::new(S3ObjectStore::new(
                        s3,
                        hosted.s3_bucket.clone(),
                        hosted.s3_public_url.clone(),
                    )),
                    Arc::new(RedisSessionStore::new(redis, config.session_ttl_secs)),
                )
            }
        };

    let auth = HostedAuthClient::new(config.auth_url.clone(), config.auth_api_key.clone())?;
    info!("Auth client initialized ({})", config.auth_url);

    // Build app state
    let state = AppState {
        repos,
        storage,
        sessions,
        auth: Arc::new(auth),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the UI host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Constructs an S3 client configured for MinIO (local) or AWS (production).
async fn build_s3_client(config: &HostedConfig) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
        None,
        None,
        "jobboard-static",
    );

    let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new("us-east-1"))
        .credentials_provider(credentials)
        .endpoint_url(&config.s3_endpoint)
        .load()
        .await;

    // MinIO serves buckets by path, not by virtual host.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(true)
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
