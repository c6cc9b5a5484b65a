//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

/// HTTP server and storage configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port the chat API listens on.
    pub port: u16,
    /// Path to the libSQL database file.
    pub db_path: PathBuf,
    /// Origins allowed by the CORS layer (the dev frontends by default).
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            db_path: PathBuf::from("./data/food-assist.db"),
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
            ],
        }
    }
}

impl ServerConfig {
    /// Build from environment variables, falling back to defaults.
    ///
    /// `FOOD_ASSIST_PORT`, `FOOD_ASSIST_DB_PATH`,
    /// `FOOD_ASSIST_ALLOWED_ORIGINS` (comma-separated).
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = std::env::var("FOOD_ASSIST_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.port);

        let db_path = std::env::var("FOOD_ASSIST_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let allowed_origins = std::env::var("FOOD_ASSIST_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or(defaults.allowed_origins);

        Self {
            port,
            db_path,
            allowed_origins,
        }
    }
}

/// Outbound webhook configuration.
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    /// Target URL for completed-intake notifications. `None` disables delivery.
    pub url: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl WebhookConfig {
    /// Build from `WEBHOOK_URL` and `WEBHOOK_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let url = std::env::var("WEBHOOK_URL")
            .ok()
            .filter(|u| !u.trim().is_empty());

        let timeout_secs = std::env::var("WEBHOOK_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        Self {
            url,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}
