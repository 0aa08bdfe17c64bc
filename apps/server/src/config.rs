//! Server configuration module.
//!
//! Configuration is loaded from environment variables (and `.env`, see
//! `main`) with fallback to defaults.

use std::env;
use std::path::PathBuf;

use tracing::warn;

const DEV_JWT_SECRET: &str = "inkline-dev-secret-change-in-production";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: PathBuf,

    /// Pool size
    pub db_max_connections: u32,

    /// HS256 secret the web client's tokens are signed with
    pub jwt_secret: String,

    /// Lifetime of tokens issued by [`crate::auth::JwtManager::issue_token`]
    pub jwt_lifetime_secs: i64,
}

impl ServerConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using the development secret");
            DEV_JWT_SECRET.to_string()
        });
        if jwt_secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("JWT_SECRET".to_string()));
        }

        let config = ServerConfig {
            http_port: parse_var("HTTP_PORT", 5000)?,

            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "./inkline.db".to_string())
                .into(),

            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,

            jwt_secret,

            // 12 hours, one shift
            jwt_lifetime_secs: parse_var("JWT_LIFETIME_SECS", 43_200)?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_default_when_unset() {
        let port: u16 = parse_var("INKLINE_TEST_UNSET_PORT", 5000).unwrap();
        assert_eq!(port, 5000);
    }

    #[test]
    fn test_parse_var_rejects_garbage() {
        env::set_var("INKLINE_TEST_BAD_PORT", "fifty");
        let err = parse_var::<u16>("INKLINE_TEST_BAD_PORT", 5000).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for INKLINE_TEST_BAD_PORT");
    }
}
