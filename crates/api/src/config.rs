//! # API Configuration Module
//!
//! Loads the server configuration from environment variables, with defaults
//! for everything except the secrets.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: host address to bind to (default: "0.0.0.0")
//! - `API_PORT`: port to listen on (default: 3000)
//! - `LOG_LEVEL`: logging level (default: "info")
//! - `API_CORS_ORIGINS`: comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: request timeout (default: 30)
//! - `STORAGE_BACKEND`: `json`, `sqlite` or `memory` (default: "json")
//! - `DATA_DIR`: directory of the JSON documents (default: "content/bookings")
//! - `DATABASE_URL`: SQLite connection string (default: "sqlite://studio.db")
//! - `STORE_CORRUPT_POLICY`: `fail` or `empty` (default: "fail")
//! - `BOOKING_OVERLAP_POLICY`: `independent` or `exclusive` (default: "independent")
//! - `ADMIN_PASSWORD_HASH`: argon2 PHC string guarding the admin endpoints
//! - `ADMIN_PASSWORD`: plain admin password, hashed at startup when no hash is set
//! - `PAYMENT_WEBHOOK_SECRET`: shared secret expected from the payment provider

use std::{env, path::PathBuf, str::FromStr};

use eyre::{Result, WrapErr};
use studio_core::models::availability::OverlapPolicy;
use studio_db::{backend::CorruptStorePolicy, repositories::StoreOptions};
use tracing::Level;

/// Where the slot calendar and booking ledger are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// Two JSON documents in `DATA_DIR`.
    Json,
    /// Tables in the SQLite database at `DATABASE_URL`.
    Sqlite,
    /// Process memory, lost on restart.
    Memory,
}

impl FromStr for StorageBackend {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StorageBackend::Json),
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(eyre::eyre!(
                "Unknown storage backend '{}', expected json, sqlite or memory",
                other
            )),
        }
    }
}

/// Configuration for the booking API server
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    pub storage_backend: StorageBackend,

    /// Directory holding `available-slots.json` and `bookings.json`
    pub data_dir: PathBuf,

    /// SQLite connection string
    pub database_url: String,

    pub corrupt_policy: CorruptStorePolicy,

    pub overlap_policy: OverlapPolicy,

    /// Argon2 hash of the admin password
    pub admin_password_hash: Option<String>,

    /// Plain admin password, only used when no hash is configured
    pub admin_password: Option<String>,

    /// Secret the payment provider sends in `x-webhook-secret`
    pub payment_webhook_secret: Option<String>,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// Fails when a set variable cannot be parsed: `API_PORT`,
    /// `STORAGE_BACKEND`, `STORE_CORRUPT_POLICY` or `BOOKING_OVERLAP_POLICY`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, e.g. a map in tests.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        // Network settings
        let host = var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = var("API_PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Logging settings
        let log_level = match var("LOG_LEVEL")
            .unwrap_or_else(|| "info".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        // CORS settings
        let cors_origins = var("API_CORS_ORIGINS").map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        // Performance settings
        let request_timeout = var("API_REQUEST_TIMEOUT_SECONDS")
            .and_then(|value| value.parse().ok())
            .unwrap_or(30);

        // Storage settings
        let storage_backend = var("STORAGE_BACKEND")
            .map(|value| value.parse::<StorageBackend>())
            .transpose()?
            .unwrap_or(StorageBackend::Json);
        let data_dir = var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("content/bookings"));
        let database_url = var("DATABASE_URL").unwrap_or_else(|| "sqlite://studio.db".to_string());
        let corrupt_policy = var("STORE_CORRUPT_POLICY")
            .map(|value| value.parse::<CorruptStorePolicy>())
            .transpose()
            .wrap_err("Invalid STORE_CORRUPT_POLICY value")?
            .unwrap_or_default();
        let overlap_policy = var("BOOKING_OVERLAP_POLICY")
            .map(|value| value.parse::<OverlapPolicy>())
            .transpose()
            .wrap_err("Invalid BOOKING_OVERLAP_POLICY value")?
            .unwrap_or_default();

        // Security settings
        let admin_password_hash = var("ADMIN_PASSWORD_HASH");
        let admin_password = var("ADMIN_PASSWORD");
        let payment_webhook_secret = var("PAYMENT_WEBHOOK_SECRET");

        Ok(Self {
            host,
            port,
            log_level,
            cors_origins,
            request_timeout,
            storage_backend,
            data_dir,
            database_url,
            corrupt_policy,
            overlap_policy,
            admin_password_hash,
            admin_password,
            payment_webhook_secret,
        })
    }

    /// Returns the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn store_options(&self) -> StoreOptions {
        StoreOptions {
            corrupt_policy: self.corrupt_policy,
            overlap_policy: self.overlap_policy,
        }
    }
}
