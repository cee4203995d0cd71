//! Application configuration loaded from environment variables.
//!
//! Cloud Run injects secrets and settings as environment variables, so a
//! single `from_env()` pass at startup is all the service needs.

use std::env;

/// Topic every device subscribes to and the trigger publishes on.
pub const NEW_ROUTINES_TOPIC: &str = "nuevas_rutinas";

/// Notification channel shared by the push receiver and the reminder job.
pub const NOTIFICATION_CHANNEL_ID: &str = "rutinas_channel";

/// CloudEvent type emitted by Firestore when a document is created.
pub const FIRESTORE_CREATED_EVENT_TYPE: &str = "google.cloud.firestore.document.v1.created";

const DEFAULT_FCM_ENDPOINT: &str = "https://fcm.googleapis.com";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP / Firebase project ID
    pub gcp_project_id: String,
    /// Server port
    pub port: u16,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Firebase uids allowed to author predefined routines
    pub admin_uids: Vec<String>,
    /// Record each notified document id and skip repeats
    pub trigger_dedupe: bool,
    /// Base URL of the FCM HTTP v1 API (overridable for local fakes)
    pub fcm_endpoint: String,
}

impl Config {
    /// Config for tests only.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            admin_uids: vec!["admin-uid".to_string()],
            trigger_dedupe: false,
            fcm_endpoint: DEFAULT_FCM_ENDPOINT.to_string(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", raw))?,
            Err(_) => 8080,
        };

        let trigger_dedupe = match env::var("TRIGGER_DEDUPE") {
            Ok(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid("TRIGGER_DEDUPE", raw))?,
            Err(_) => false,
        };

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID")
                .map_err(|_| ConfigError::Missing("GCP_PROJECT_ID"))?,
            port,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            admin_uids: env::var("ADMIN_UIDS")
                .map(|v| parse_list(&v))
                .unwrap_or_default(),
            trigger_dedupe,
            fcm_endpoint: env::var("FCM_ENDPOINT")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| DEFAULT_FCM_ENDPOINT.to_string()),
        })
    }

    /// Whether a Firebase uid may author predefined routines.
    pub fn is_admin(&self, uid: &str) -> bool {
        self.admin_uids.iter().any(|admin| admin == uid)
    }
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
