//! Build Journal Backend
//!
//! Serves the published journal posts and the password-gated admin editor
//! that drafts posts locally and publishes them to GitHub.

mod api;
mod auth;
mod config;
mod db;
mod draft;
mod errors;
mod github;
mod models;
mod publish;
mod session;
mod store;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::LocalStorage;
use draft::DraftCache;
use github::{ContentsClient, GithubSettings};
use publish::Publisher;
use session::AdminSession;
use store::PostStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<PostStore>,
    pub drafts: DraftCache,
    pub github: GithubSettings,
    pub publisher: Arc<Publisher>,
    pub session: Arc<Mutex<AdminSession>>,
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

    tracing::info!("Starting Build Journal Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Posts source: {}", config.posts_url);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.admin_password.is_none() {
        tracing::warn!("No admin password configured (JOURNAL_ADMIN_PASSWORD). Admin API is open!");
    }

    // Local storage for drafts and GitHub settings
    let pool = db::init_database(&config.db_path).await?;
    let storage = LocalStorage::new(pool);

    let http = github::http_client()?;
    let store = Arc::new(PostStore::new(http.clone(), config.posts_url.clone()));
    let drafts = DraftCache::new(storage.clone());

    let (session, draft) = AdminSession::open(&store, &drafts).await;
    if let Some(draft) = draft {
        tracing::info!(
            "A saved draft with {} posts is available for restoring",
            draft.post_count
        );
    }

    let state = AppState {
        store,
        drafts,
        github: GithubSettings::new(storage),
        publisher: Arc::new(Publisher::new(
            ContentsClient::new(http, config.github_api.clone()),
            config.posts_path.clone(),
        )),
        session: Arc::new(Mutex::new(session)),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

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

    let password = state.config.admin_password.clone();

    // Public journal routes
    let public_routes = Router::new()
        .route("/posts", get(api::list_posts))
        .route("/posts/{id}", get(api::get_post))
        .route("/tags", get(api::list_tags))
        .route("/tags/names", get(api::list_tag_names))
        .route("/stats", get(api::get_stats));

    // Admin routes
    let admin_routes = Router::new()
        // Session
        .route("/session", get(api::get_session))
        .route("/session/reload", post(api::reload_session))
        .route("/session/new", post(api::new_post))
        .route("/session/edit", get(api::edit_list))
        .route("/session/edit/{id}", post(api::select_post))
        .route("/session/form", put(api::update_form))
        .route(
            "/session/screenshot/{file_name}",
            put(api::attach_screenshot)
                .layer(DefaultBodyLimit::max(api::MAX_SCREENSHOT_BYTES)),
        )
        // Output
        .route("/generate", post(api::generate))
        .route("/download", post(api::download))
        .route("/publish", post(api::publish))
        // Draft
        .route(
            "/draft",
            get(api::get_draft).delete(api::discard_draft),
        )
        .route("/draft/restore", post(api::restore_draft))
        // GitHub settings
        .route(
            "/github",
            get(api::get_github_config).put(api::save_github_config),
        )
        // Apply password gate
        .layer(middleware::from_fn(move |req, next| {
            auth::admin_auth_layer(password.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", public_routes.nest("/admin", admin_routes))
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod test_support;
