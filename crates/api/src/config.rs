use coverage_core::types::{business_today, Day};

use crate::auth::jwt::JwtConfig;

/// Default offset from UTC, in hours, of the business calendar.
const DEFAULT_BUSINESS_UTC_OFFSET_HOURS: i32 = -3;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development except the JWT
/// secret.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Upper bound on post-shutdown cleanup in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// Offset of the business calendar from UTC; defines "today".
    pub business_utc_offset_hours: i32,
    /// JWT token configuration.
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                 |
    /// |-----------------------------|-------------------------|
    /// | `HOST`                      | `0.0.0.0`               |
    /// | `PORT`                      | `3000`                  |
    /// | `CORS_ORIGINS`              | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                    |
    /// | `BUSINESS_UTC_OFFSET_HOURS` | `-3`                    |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let business_utc_offset_hours = business_utc_offset_from_env();

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            business_utc_offset_hours,
            jwt,
        }
    }

    /// The current date on the business calendar.
    pub fn today(&self) -> Day {
        business_today(self.business_utc_offset_hours)
    }
}

/// Read `BUSINESS_UTC_OFFSET_HOURS`, defaulting to `-3`.
fn business_utc_offset_from_env() -> i32 {
    std::env::var("BUSINESS_UTC_OFFSET_HOURS")
        .map(|v| {
            v.parse()
                .expect("BUSINESS_UTC_OFFSET_HOURS must be a valid i32")
        })
        .unwrap_or(DEFAULT_BUSINESS_UTC_OFFSET_HOURS)
}
