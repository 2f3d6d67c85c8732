//! Game Server Community Site Backend
//!
//! A REST backend over a flat-file store: news, suggestions, downloadable
//! assets, a player scoreboard and a password-gated admin surface.

mod api;
mod auth;
mod config;
mod errors;
mod models;
mod relay;
mod store;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use auth::SessionStore;
use config::Config;
use relay::Mailer;
use store::{AssetStore, ContentStore, ScoreboardStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub content: Arc<ContentStore>,
    pub assets: Arc<AssetStore>,
    pub scoreboard: Arc<ScoreboardStore>,
    pub sessions: Arc<SessionStore>,
    pub mailer: Arc<Mailer>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting community site backend");
    tracing::info!("Data directory: {:?}", config.data_dir);
    tracing::info!("Files directory: {:?}", config.files_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn about degraded modes
    if config.admin_password.is_none() {
        tracing::warn!("No admin password configured (SITE_ADMIN_PASSWORD). Admin gate is open!");
    }
    if config.smtp.is_none() {
        tracing::info!("No SMTP credentials configured; suggestion notifications are disabled");
    }

    // Initialize the flat-file store
    store::init(&config).await?;

    let state = AppState {
        content: Arc::new(ContentStore::new(
            &config.data_dir,
            config.default_chat_link.clone(),
        )),
        assets: Arc::new(AssetStore::new(&config.files_dir)),
        scoreboard: Arc::new(ScoreboardStore::new(&config.data_dir)),
        sessions: Arc::new(SessionStore::new()),
        mailer: Arc::new(Mailer::from_config(config.smtp.as_ref())),
        config: Arc::new(config),
    };

    // Build router
    let app = create_router(state.clone());

    // Start server
    let listener = tokio::net::TcpListener::bind(&state.config.bind_addr).await?;
    tracing::info!("Server listening on {}", state.config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone session state for the auth layer
    let sessions = state.sessions.clone();
    let gate_enabled = state.config.admin_password.is_some();

    // Admin routes behind the session gate; login is added after the layer
    // so it stays reachable while locked.
    let admin_routes = Router::new()
        .route("/logout", post(api::logout))
        .route("/news", post(api::create_news))
        .route("/suggestions", get(api::list_suggestions))
        .route("/chat-link", put(api::update_chat_link))
        .route("/rules", put(api::upload_rules))
        .route("/bundles/{kind}", put(api::upload_bundle))
        .route("/scoreboard", put(api::upload_scoreboard))
        .route("/test-mail", post(api::send_test_mail))
        // Bundle archives can be large; the default 2 MB body limit is far
        // too small for them.
        .layer(DefaultBodyLimit::max(256 * 1024 * 1024))
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_auth_layer(sessions.clone(), gate_enabled, req, next)
        }))
        .route("/login", post(api::login));

    // API routes
    let api_routes = Router::new()
        .route("/news", get(api::list_news))
        .route("/chat-link", get(api::get_chat_link))
        .route("/scoreboard", get(api::get_scoreboard))
        .route("/scoreboard/top", get(api::get_scoreboard_top))
        .route("/downloads/rules", get(api::download_rules))
        .route("/downloads/bundles/{kind}", get(api::download_bundle))
        .route("/suggestions", post(api::submit_suggestion))
        .nest("/admin", admin_routes);

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
