use anyhow::{bail, Context, Result};

const DEFAULT_SESSION_TTL_SECS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Connection settings for the hosted data store, object storage and session cache.
#[derive(Debug, Clone)]
pub struct HostedConfig {
    pub database_url: String,
    pub redis_url: String,
    pub s3_bucket: String,
    pub s3_endpoint: String,
    /// Base URL used to build public document links. Defaults to `s3_endpoint`.
    pub s3_public_url: String,
    pub aws_access_key_id: String,
    pub aws_secret_access_key: String,
}

#[derive(Debug, Clone)]
pub enum Backend {
    /// Seeded in-memory repositories, object store and session store.
    Memory,
    Hosted(HostedConfig),
}

/// Application configuration loaded from environment variables.
/// Startup fails if a variable required by the selected backend is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub backend: Backend,
    pub auth_url: String,
    pub auth_api_key: String,
    pub session_ttl_secs: u64,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let require = |key: &str| {
            lookup(key).with_context(|| format!("Required environment variable '{key}' is not set"))
        };

        let backend = match lookup("DATA_BACKEND").as_deref().unwrap_or("postgres") {
            "memory" => Backend::Memory,
            "postgres" => {
                let s3_endpoint = require("S3_ENDPOINT")?;
                Backend::Hosted(HostedConfig {
                    database_url: require("DATABASE_URL")?,
                    redis_url: require("REDIS_URL")?,
                    s3_bucket: require("S3_BUCKET")?,
                    s3_public_url: lookup("S3_PUBLIC_URL").unwrap_or_else(|| s3_endpoint.clone()),
                    s3_endpoint,
                    aws_access_key_id: require("AWS_ACCESS_KEY_ID")?,
                    aws_secret_access_key: require("AWS_SECRET_ACCESS_KEY")?,
                })
            }
            other => bail!("DATA_BACKEND must be 'postgres' or 'memory', got '{other}'"),
        };

        Ok(Config {
            backend,
            auth_url: require("AUTH_URL")?,
            auth_api_key: require("AUTH_API_KEY")?,
            session_ttl_secs: parse_or(&lookup, "SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?,
            max_upload_bytes: parse_or(&lookup, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
