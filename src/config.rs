// config.rs
use std::env;
use std::str::FromStr;

use crate::errors::{AppError, Result};

/// Longest session-token lifetime accepted from `TOKEN_TTL_HOURS` (one year).
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Mongo,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StorageBackend::Mongo),
            "memory" | "in-memory" => Ok(StorageBackend::Memory),
            other => Err(AppError::configuration(format!(
                "STORAGE must be `mongo` or `memory`, got `{}`",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub storage: StorageBackend,
    pub database_url: Option<String>,
    pub database_name: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
    pub port: u16,
    pub host: String,
}

impl AppConfig {
    /// Reads configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a local `.env` file.
    pub fn from_env() -> Result<Self> {
        let storage: StorageBackend = env::var("STORAGE")
            .unwrap_or_else(|_| "mongo".to_string())
            .parse()?;

        let database_url = env::var("DATABASE_URL").ok();
        if storage == StorageBackend::Mongo && database_url.is_none() {
            return Err(AppError::configuration("DATABASE_URL must be set"));
        }

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::configuration("JWT_SECRET must be set"))?;
        if jwt_secret.is_empty() {
            return Err(AppError::configuration("JWT_SECRET must not be empty"));
        }

        Ok(AppConfig {
            storage,
            database_url,
            database_name: env::var("DATABASE_NAME").unwrap_or_else(|_| "authserver".to_string()),
            jwt_secret,
            token_ttl_hours: check_token_ttl(parse_var("TOKEN_TTL_HOURS", 24)?)?,
            bcrypt_cost: parse_var("BCRYPT_COST", 10)?,
            port: parse_var("PORT", 8080)?,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::configuration(format!("{} must be a number", key))),
        Err(_) => Ok(default),
    }
}

fn check_token_ttl(hours: i64) -> Result<i64> {
    if (1..=MAX_TOKEN_TTL_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(AppError::configuration(format!(
            "TOKEN_TTL_HOURS must be between 1 and {}, got {}",
            MAX_TOKEN_TTL_HOURS, hours
        )))
    }
}
