use std::env;

use chrono::FixedOffset;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub database_url: String,
    pub max_pool_size: u32,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub upload_dir: String,
    /// Offset of the shop's local calendar, used for day/month periods.
    pub local_offset: FixedOffset,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        let _ = dotenvy::dotenv();

        let local_offset =
            parse_utc_offset(&env::var("UTC_OFFSET_HOURS").unwrap_or_else(|_| "7".to_string()))?;

        Ok(Self {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("SERVER_PORT"))?,
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://data/dashboard.db".to_string()),
            max_pool_size: parse_pool_size(
                &env::var("MAX_POOL_SIZE").unwrap_or_else(|_| "5".to_string()),
            )?,
            jwt_secret: env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?,
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .map_err(|_| ConfigError::Invalid("JWT_EXPIRATION_HOURS"))?,
            upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
            local_offset,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

/// Whole hours east of UTC, as accepted by `FixedOffset`.
fn parse_utc_offset(value: &str) -> Result<FixedOffset, ConfigError> {
    value
        .trim()
        .parse::<i32>()
        .ok()
        .and_then(|hours| hours.checked_mul(3600))
        .and_then(FixedOffset::east_opt)
        .ok_or(ConfigError::Invalid("UTC_OFFSET_HOURS"))
}

fn parse_pool_size(value: &str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ConfigError::Invalid("MAX_POOL_SIZE")),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid value for {0}")]
    Invalid(&'static str),
}
