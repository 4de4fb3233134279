//! Persistence API Server Binary
//!
//! # Usage
//!
//! ```bash
//! # Default port 3001, empty catalogue
//! cargo run --bin console-server
//!
//! # Seeded catalogue on a custom port
//! CONSOLE_SERVER_PORT=3002 CONSOLE_SEED_PATH=./courses.json cargo run --bin console-server
//! ```
//!
//! # Environment Variables
//!
//! - `CONSOLE_SERVER_PORT`: Server port (default: 3001)
//! - `CONSOLE_SEED_PATH`: JSON array of courses to serve
//! - `CORS_ALLOW_ORIGIN`: Allowed front-end origin
//! - `RUST_LOG`: Logging level (e.g., "info", "debug", "trace")

use coursedesk_server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("CourseDesk persistence API");

    let config = ServerConfig::from_env();
    tracing::info!("Port: {}", config.port);
    if let Some(path) = &config.seed_path {
        tracing::info!("Seed: {}", path.display());
    }

    coursedesk_server::start_server(config).await
}
