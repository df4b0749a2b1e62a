//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! This module provides the main server setup function that creates the Axum
//! router, registers all routes, applies middleware, and starts the HTTP
//! server.

// region: --- Imports
use crate::handlers;
use crate::middleware::{log_requests, require_auth, stamp_req};
use axum::{
    routing::{get, post},
    Router,
};
use lib_core::{create_pool, Config, DbPool};
use lib_vendor::{
    CredentialsResolver, Hg5Api, Hg5HttpClient, OrsApi, OrsHttpClient, WalletApi, WalletHttpClient,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub config: Config,
    pub credentials: Arc<CredentialsResolver>,
    pub wallet: Arc<dyn WalletApi>,
    pub hg5: Arc<dyn Hg5Api>,
    pub ors: Arc<dyn OrsApi>,
}

impl axum::extract::FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.db.clone()
    }
}

impl axum::extract::FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl axum::extract::FromRef<AppState> for Arc<CredentialsResolver> {
    fn from_ref(state: &AppState) -> Self {
        state.credentials.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3001")
    pub bind_address: String,
    /// Allowed CORS origins (operator frontends)
    pub allowed_origins: Vec<String>,
    /// Database migrations path
    pub migrations_path: &'static str,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3001".to_string(),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
            migrations_path: "./migrations",
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Initialize and start the HTTP server
///
/// # Errors
///
/// This function will return an error if:
/// - Configuration loading fails
/// - Database connection or migrations fail
/// - Provider credentials cannot be loaded
/// - Server binding fails
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    info!("PROVIDER GATEWAY STARTING");

    dotenvy::dotenv().ok();

    info!("Loading configuration...");
    lib_core::config::init_config().map_err(|e| anyhow::anyhow!(e))?;
    let app_config = lib_core::config::core_config().clone();

    // Ensure the data directory exists for SQLite
    if let Some(db_path) = app_config.database_url.strip_prefix("sqlite:") {
        if let Some(parent) = std::path::Path::new(db_path).parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent)?;
                info!("Created database directory: {:?}", parent);
            }
        }
    }

    info!("Connecting to database...");
    let pool = create_pool().await?;

    info!("Running database migrations from: {}", config.migrations_path);
    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new(config.migrations_path)).await?;
    migrator.run(&pool).await?;
    info!("Migrations complete");

    info!("Loading provider credentials...");
    let credentials = Arc::new(CredentialsResolver::from_path(
        &app_config.provider_credentials_path,
    )?);

    let wallet: Arc<dyn WalletApi> = Arc::new(WalletHttpClient::new(&app_config.wallet_api_url)?);
    let hg5: Arc<dyn Hg5Api> = Arc::new(Hg5HttpClient::new()?);
    let ors: Arc<dyn OrsApi> = Arc::new(OrsHttpClient::new()?);

    let state = AppState {
        db: pool,
        config: app_config,
        credentials,
        wallet,
        hg5,
        ors,
    };

    let app = create_router(state, config.allowed_origins.clone());

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("SERVER READY: http://{}", config.bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}

/// Create the main application router with all routes
fn create_router(state: AppState, allowed_origins: Vec<String>) -> Router {
    use axum::http::{HeaderValue, Method};

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
        ]);

    // Vendor callback routes authenticate inside the orchestrators
    // (session token / payload signature), never via the JWT middleware.
    let vendor_routes = Router::new()
        .route("/api/hg5/auth", post(handlers::hg5::auth))
        .route("/api/hg5/balance", post(handlers::hg5::balance))
        .route("/api/hg5/bet", post(handlers::hg5::bet))
        .route("/api/hg5/settle", post(handlers::hg5::settle))
        .route("/api/hg5/bet-settle", post(handlers::hg5::bet_settle))
        .route("/api/hg5/cancel", post(handlers::hg5::cancel))
        .route("/api/hg5/bonus", post(handlers::hg5::bonus))
        .route("/api/ors/transfer", post(handlers::ors::transfer))
        .route("/api/ors/cancel", post(handlers::ors::cancel))
        .route("/api/ors/balance", post(handlers::ors::balance));

    // Operator routes require a bearer JWT.
    let operator_routes = Router::new()
        .route("/api/launch/hg5", post(handlers::launch::launch_hg5))
        .route("/api/launch/ors", post(handlers::launch::launch_ors))
        .route("/api/transactions", get(handlers::launch::transaction_history))
        .route("/api/hg5/orders/{trx_id}", get(handlers::launch::hg5_order_query))
        .route(
            "/api/hg5/orders/{trx_id}/detail",
            get(handlers::launch::hg5_order_detail),
        )
        .route("/api/ors/records", get(handlers::launch::ors_betting_records))
        .route("/api/ors/games", get(handlers::launch::ors_game_list))
        .route_layer(axum::middleware::from_fn(require_auth));

    info!("[ROUTE SETUP] Registering HTTP routes...");
    vendor_routes
        .merge(operator_routes)
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        // Request stamping (adds request ID) - must be first
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(axum::middleware::from_fn(log_requests))
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(cors)
}
// endregion: --- Server Setup
