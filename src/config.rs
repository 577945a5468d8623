//! Configuration management

use std::str::FromStr;

use anyhow::{self, Context, Result};

use crate::defaults::{
    DEFAULT_BATCH_SIZE, DEFAULT_BIND_ADDR, DEFAULT_COUNTRY, DEFAULT_LOGS_DIR,
    DEFAULT_MAX_UPLOAD_BYTES, DEFAULT_PORT,
};
use crate::services::importer::ImportSettings;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string
    pub database_url: String,

    pub bind_addr: String,
    pub port: u16,

    /// Rows per bulk insert during imports
    pub import_batch_size: usize,

    /// Country given to imported clients whose row names none
    pub default_country: String,

    /// Request body limit for spreadsheet uploads
    pub max_upload_bytes: usize,

    /// Allowed CORS origin (any origin when unset)
    pub cors_origin: Option<String>,

    pub logs_dir: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let bind_addr = var("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let port = parse_or(var("PORT"), "PORT", DEFAULT_PORT)?;

        let import_batch_size =
            parse_or(var("IMPORT_BATCH_SIZE"), "IMPORT_BATCH_SIZE", DEFAULT_BATCH_SIZE)?;
        if import_batch_size == 0 {
            anyhow::bail!("IMPORT_BATCH_SIZE must be greater than zero");
        }

        let default_country = var("DEFAULT_COUNTRY")
            .map(|c| c.trim().to_string())
            .unwrap_or_else(|| DEFAULT_COUNTRY.to_string());

        let max_upload_bytes =
            parse_or(var("MAX_UPLOAD_BYTES"), "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;

        let cors_origin = var("CORS_ORIGIN");
        let logs_dir = var("LOGS_DIR").unwrap_or_else(|| DEFAULT_LOGS_DIR.to_string());

        Ok(Self {
            database_url,
            bind_addr,
            port,
            import_batch_size,
            default_country,
            max_upload_bytes,
            cors_origin,
            logs_dir,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    pub fn import_settings(&self) -> ImportSettings {
        ImportSettings {
            batch_size: self.import_batch_size,
            default_country: self.default_country.clone(),
        }
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {raw:?}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_config_requires_database_url() {
        let err = config_from(&[]).unwrap_err();
        assert!(err.to_string().contains("DATABASE_URL"));
    }

    #[test]
    fn test_config_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://test")]).unwrap();

        assert_eq!(config.listen_addr(), "0.0.0.0:3000");
        assert_eq!(config.import_batch_size, 50);
        assert_eq!(config.default_country, "Россия");
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert!(config.cors_origin.is_none());
        assert_eq!(config.logs_dir, "./logs");
    }

    #[test]
    fn test_config_overrides() {
        let config = config_from(&[
            ("DATABASE_URL", "postgres://test"),
            ("BIND_ADDR", "127.0.0.1"),
            ("PORT", "8080"),
            ("IMPORT_BATCH_SIZE", " 200 "),
            ("DEFAULT_COUNTRY", "Казахстан"),
            ("CORS_ORIGIN", "http://localhost:5173"),
        ])
        .unwrap();

        assert_eq!(config.listen_addr(), "127.0.0.1:8080");
        assert_eq!(config.import_batch_size, 200);
        assert_eq!(config.cors_origin.as_deref(), Some("http://localhost:5173"));

        let settings = config.import_settings();
        assert_eq!(settings.batch_size, 200);
        assert_eq!(settings.default_country, "Казахстан");
    }

    #[test]
    fn test_config_blank_values_fall_back_to_defaults() {
        let config = config_from(&[("DATABASE_URL", "postgres://test"), ("PORT", "  ")]).unwrap();
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_config_rejects_invalid_numbers() {
        let err = config_from(&[("DATABASE_URL", "postgres://test"), ("PORT", "http")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }

    #[test]
    fn test_config_rejects_zero_batch_size() {
        let err = config_from(&[("DATABASE_URL", "postgres://test"), ("IMPORT_BATCH_SIZE", "0")])
            .unwrap_err();
        assert!(err.to_string().contains("IMPORT_BATCH_SIZE"));
    }
}
