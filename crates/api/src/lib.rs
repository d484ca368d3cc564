//! # Studio Booking API
//!
//! The web server of the studio booking service: public availability and
//! booking endpoints, the payment-confirmation webhook, and the admin
//! endpoints for the slot calendar and the booking ledger.
//!
//! ## Architecture
//!
//! - **Routes**: API endpoints and URL structure
//! - **Handlers**: request parsing and response shaping over the repositories
//! - **Middleware**: admin authentication and error mapping
//! - **Config**: environment configuration

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Middleware for authentication and error handling
pub mod middleware;
/// Default booking notifier
pub mod notify;
/// Route definitions and API endpoint structure
pub mod routes;

use std::{sync::Arc, time::Duration};

use argon2::PasswordHash;
use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    http::{HeaderName, HeaderValue, Method, StatusCode, header},
};
use eyre::{Result, WrapErr};
use serde_json::{Value, json};
use studio_core::notify::BookingNotifier;
use studio_db::{
    backend::Backend, create_pool, json_file::JsonFileBackend, memory::MemoryBackend,
    repositories::Repositories, schema::initialize_database, sqlite::SqliteBackend,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    config::{ApiConfig, StorageBackend},
    middleware::auth::{self, ADMIN_PASSWORD_HEADER, WEBHOOK_SECRET_HEADER},
};

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    /// Slot store and booking ledger
    pub repositories: Repositories,
    /// Told about bookings created or cancelled through the API
    pub notifier: Arc<dyn BookingNotifier>,
    /// Argon2 hash guarding the admin routes; admin access is refused when unset
    pub admin_password_hash: Option<String>,
    pub payment_webhook_secret: Option<String>,
}

impl ApiState {
    /// Builds the state, hashing a plain `ADMIN_PASSWORD` when no hash is configured.
    pub fn new(
        repositories: Repositories,
        notifier: Arc<dyn BookingNotifier>,
        config: &ApiConfig,
    ) -> Result<Self> {
        let admin_password_hash = match (&config.admin_password_hash, &config.admin_password) {
            (Some(hash), _) => {
                PasswordHash::new(hash).map_err(|e| eyre::eyre!("Invalid ADMIN_PASSWORD_HASH: {}", e))?;
                Some(hash.clone())
            }
            (None, Some(password)) => Some(auth::hash_password(password)?),
            (None, None) => {
                tracing::warn!("No admin password configured, admin endpoints are disabled");
                None
            }
        };

        if config.payment_webhook_secret.is_none() {
            tracing::warn!("No payment webhook secret configured, payment confirmations are refused");
        }

        Ok(Self {
            repositories,
            notifier,
            admin_password_hash,
            payment_webhook_secret: config.payment_webhook_secret.clone(),
        })
    }
}

/// Opens the configured storage backend and wraps it in the repositories.
pub async fn open_repositories(config: &ApiConfig) -> Result<Repositories> {
    let backend: Arc<dyn Backend> = match config.storage_backend {
        StorageBackend::Json => {
            info!("Using JSON documents in {}", config.data_dir.display());
            Arc::new(JsonFileBackend::new(&config.data_dir))
        }
        StorageBackend::Sqlite => {
            info!("Using SQLite database {}", config.database_url);
            let pool = create_pool(&config.database_url)
                .await
                .wrap_err("Failed to open the SQLite database")?;
            initialize_database(&pool).await?;
            Arc::new(SqliteBackend::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage, nothing survives a restart");
            Arc::new(MemoryBackend::new())
        }
    };

    Ok(Repositories::new(backend, config.store_options()))
}

/// Builds the application router with all routes and layers.
pub fn build_router(state: Arc<ApiState>, config: &ApiConfig) -> Result<Router> {
    let app = Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Public availability
        .merge(routes::slots::routes())
        // Public bookings and payment confirmations
        .merge(routes::bookings::routes())
        // Admin calendar and ledger management
        .merge(routes::admin::routes(state.clone()))
        .with_state(state);

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err("Invalid API_CORS_ORIGINS value")?;

        let cors = CorsLayer::new()
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([
                header::CONTENT_TYPE,
                header::ACCEPT,
                HeaderName::from_static(ADMIN_PASSWORD_HEADER),
                HeaderName::from_static(WEBHOOK_SECRET_HEADER),
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout middleware
    let app = app.layer(
        ServiceBuilder::new()
            .layer(HandleErrorLayer::new(handle_timeout_error))
            .timeout(Duration::from_secs(config.request_timeout)),
    );

    Ok(app.layer(TraceLayer::new_for_http()))
}

async fn handle_timeout_error(err: BoxError) -> (StatusCode, Json<Value>) {
    if err.is::<tower::timeout::error::Elapsed>() {
        (
            StatusCode::REQUEST_TIMEOUT,
            Json(json!({ "error": "Request timed out" })),
        )
    } else {
        tracing::error!("Unhandled middleware error: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "Internal server error" })),
        )
    }
}

/// Starts the API server with the provided configuration and state
pub async fn start_server(config: ApiConfig, state: Arc<ApiState>) -> Result<()> {
    let app = build_router(state, &config)?;

    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
