//! CourseDesk Persistence Server
//!
//! REST API that stores course hierarchies and accepts reorder submissions
//! from the administrative console. Backed by the in-memory content store
//! from `coursedesk-core`, seeded from a JSON file at startup.
//!
//! # Usage
//!
//! ```bash
//! CONSOLE_SEED_PATH=./courses.json cargo run --bin console-server
//! ```
//!
//! # Security
//!
//! - CORS restricted to configured origins
//! - No authentication

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use coursedesk_core::InMemoryContentStore;

pub mod config;
mod course_endpoints;
mod http_error;

pub use config::ServerConfig;
pub use http_error::HttpError;

/// Application state shared across all endpoints
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<InMemoryContentStore>,
}

impl AppState {
    pub fn new(store: InMemoryContentStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .merge(course_endpoints::routes(state))
        .layer(cors_layer(cors_origins))
        .layer(TraceLayer::new_for_http())
}

/// CORS layer for the console front-end
///
/// Origins that are not valid header values are skipped;
/// [`ServerConfig::validate`] reports them before startup.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Skipping invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::PUT])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(false)
}

/// Serve the API on an already bound listener
pub async fn serve(
    listener: TcpListener,
    state: AppState,
    cors_origins: &[String],
) -> anyhow::Result<()> {
    let app = create_router(state, cors_origins);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Start the HTTP server on `config.port`
///
/// # Errors
///
/// Returns error if the configuration is invalid, the seed file cannot be
/// loaded, or the server fails to bind.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    config.validate().map_err(anyhow::Error::msg)?;
    let state = AppState::new(config.load_store()?);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Persistence API listening on http://{}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origins.join(", "));

    serve(listener, state, &config.cors_origins).await
}
