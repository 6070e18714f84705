//! Application configuration constants and environment loading

use std::env;
use std::path::PathBuf;

// ============================================================================
// Server Defaults
// ============================================================================

/// Default address the HTTP server binds to
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

/// Default directory for the JSON collection files
pub const DEFAULT_DATA_DIR: &str = "./qedge-data";

/// Default SMTP submission port (STARTTLS)
pub const DEFAULT_SMTP_PORT: u16 = 587;

// ============================================================================
// Meetings
// ============================================================================

/// Base URL for generated meeting room links
pub const MEETING_LINK_BASE: &str = "https://meet.qedge.app";

// ============================================================================
// Validation Limits
// ============================================================================

/// Maximum length for course and meeting titles
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum length for outbound email subjects
pub const MAX_SUBJECT_LENGTH: usize = 200;

// ============================================================================
// Demo Accounts
// ============================================================================

/// Seeded HR account, created on first run
pub const DEMO_HR_EMAIL: &str = "hr@company.com";
pub const DEMO_HR_PASSWORD: &str = "admin123";

/// Seeded employee account, created on first run
pub const DEMO_EMPLOYEE_EMAIL: &str = "user@company.com";
pub const DEMO_EMPLOYEE_PASSWORD: &str = "user123";

// ============================================================================
// Runtime Configuration
// ============================================================================

/// Settings resolved from the environment at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding one JSON file per collection
    pub data_dir: PathBuf,
    /// Address the HTTP server listens on
    pub bind_addr: String,
    /// Public base URL used when building tracking pixel links
    pub base_url: String,
    /// SMTP relay settings, absent when not configured
    pub mailer: Option<MailerConfig>,
}

/// Credentials and endpoint for the outbound SMTP relay.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_address: String,
}

impl AppConfig {
    /// Loads configuration from the environment, with `.env` support.
    ///
    /// Every setting has a default except the SMTP relay, which stays
    /// disabled until fully configured.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let data_dir = env::var("QEDGE_DATA_DIR")
            .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string())
            .into();
        let bind_addr =
            env::var("QEDGE_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let base_url =
            env::var("QEDGE_BASE_URL").unwrap_or_else(|_| format!("http://{}", bind_addr));

        Self {
            data_dir,
            bind_addr,
            base_url,
            mailer: MailerConfig::from_env(),
        }
    }
}

impl MailerConfig {
    /// Reads the SMTP settings, returning `None` unless host, username,
    /// password and from-address are all present.
    fn from_env() -> Option<Self> {
        let host = env::var("QEDGE_SMTP_HOST").ok()?;

        let username = env::var("QEDGE_SMTP_USERNAME").ok();
        let password = env::var("QEDGE_SMTP_PASSWORD").ok();
        let from_address = env::var("QEDGE_SMTP_FROM").ok();

        let port = env::var("QEDGE_SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);

        match (username, password, from_address) {
            (Some(username), Some(password), Some(from_address)) => Some(Self {
                host,
                port,
                username,
                password,
                from_address,
            }),
            _ => {
                tracing::warn!("Incomplete SMTP configuration, email sending disabled");
                None
            }
        }
    }
}
