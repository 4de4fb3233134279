//! Server configuration
//!
//! Read from the environment by the `console-server` binary:
//!
//! - `CONSOLE_SERVER_PORT`: port to listen on (default 3001)
//! - `CONSOLE_SEED_PATH`: JSON file holding an array of courses to serve
//! - `CORS_ALLOW_ORIGIN`: single allowed origin, replacing the localhost defaults

use std::path::{Path, PathBuf};

use anyhow::Context;
use axum::http::HeaderValue;
use coursedesk_core::{Course, InMemoryContentStore};

pub const ENV_PORT: &str = "CONSOLE_SERVER_PORT";
pub const ENV_SEED_PATH: &str = "CONSOLE_SEED_PATH";
pub const ENV_CORS_ALLOW_ORIGIN: &str = "CORS_ALLOW_ORIGIN";

const DEFAULT_PORT: u16 = 3001;

/// Common local front-end dev server origins
const DEFAULT_ORIGINS: [&str; 3] = [
    "http://localhost:5173",
    "http://localhost:3000",
    "http://localhost:4173",
];

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub port: u16,
    pub seed_path: Option<PathBuf>,
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            seed_path: None,
            cors_origins: DEFAULT_ORIGINS.iter().map(|o| o.to_string()).collect(),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(port) = lookup(ENV_PORT) {
            match port.parse::<u16>() {
                Ok(port) => config.port = port,
                Err(_) => tracing::warn!("Ignoring invalid {}='{}'", ENV_PORT, port),
            }
        }
        if let Some(path) = lookup(ENV_SEED_PATH).filter(|p| !p.is_empty()) {
            config.seed_path = Some(PathBuf::from(path));
        }
        if let Some(origin) = lookup(ENV_CORS_ALLOW_ORIGIN).filter(|o| !o.is_empty()) {
            config.cors_origins = vec![origin];
        }

        config
    }

    /// Check that every CORS origin is a valid header value
    pub fn validate(&self) -> Result<(), String> {
        if self.cors_origins.is_empty() {
            return Err("at least one CORS origin is required".to_string());
        }
        for origin in &self.cors_origins {
            if origin.parse::<HeaderValue>().is_err() {
                return Err(format!("invalid CORS origin '{}'", origin));
            }
        }
        Ok(())
    }

    /// Build the content store, seeded from `seed_path` when set
    pub fn load_store(&self) -> anyhow::Result<InMemoryContentStore> {
        match &self.seed_path {
            Some(path) => load_seed(path),
            None => {
                tracing::warn!("No {} set; serving an empty course catalogue", ENV_SEED_PATH);
                Ok(InMemoryContentStore::new())
            }
        }
    }
}

/// Read a JSON array of courses and validate each one
pub fn load_seed(path: &Path) -> anyhow::Result<InMemoryContentStore> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;
    let courses: Vec<Course> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse seed file {}", path.display()))?;

    let count = courses.len();
    let store = InMemoryContentStore::with_courses(courses)
        .with_context(|| format!("Invalid course in seed file {}", path.display()))?;
    tracing::info!("Loaded {} course(s) from {}", count, path.display());

    Ok(store)
}
