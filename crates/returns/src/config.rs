//! Engine configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `RETURNS_SHIPMENT_LINE_TABLE_ID` - Table ID owning shipment lines in the
//!   assignment history (default: 320)
//! - `RETURNS_LOG_FORMAT` - `text` or `json` (default: text)
//! - `RETURNS_LOG_FILTER` - Default tracing directive when `RUST_LOG` is unset
//!   (default: info)

use hu_returns_core::TableId;
use thiserror::Error;

const DEFAULT_SHIPMENT_LINE_TABLE_ID: i32 = 320;
const DEFAULT_LOG_FILTER: &str = "info";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable text lines.
    #[default]
    Text,
    /// One JSON object per event, for log shipping.
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("expected `text` or `json`, got `{s}`")),
        }
    }
}

/// Return-document engine configuration.
#[derive(Debug, Clone)]
pub struct ReturnsConfig {
    /// Table whose rows are shipment lines in the HU assignment history
    pub shipment_line_table: TableId,
    /// Log output format
    pub log_format: LogFormat,
    /// Default `EnvFilter` directive
    pub log_filter: String,
}

impl Default for ReturnsConfig {
    fn default() -> Self {
        Self {
            shipment_line_table: TableId::new(DEFAULT_SHIPMENT_LINE_TABLE_ID),
            log_format: LogFormat::Text,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ReturnsConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let shipment_line_table = match lookup("RETURNS_SHIPMENT_LINE_TABLE_ID") {
            Some(raw) => {
                let id = raw.trim().parse::<i32>().map_err(|e| {
                    ConfigError::InvalidEnvVar(
                        "RETURNS_SHIPMENT_LINE_TABLE_ID".to_string(),
                        e.to_string(),
                    )
                })?;
                if id <= 0 {
                    return Err(ConfigError::InvalidEnvVar(
                        "RETURNS_SHIPMENT_LINE_TABLE_ID".to_string(),
                        "must be positive".to_string(),
                    ));
                }
                TableId::new(id)
            }
            None => defaults.shipment_line_table,
        };

        let log_format = match lookup("RETURNS_LOG_FORMAT") {
            Some(raw) => raw
                .trim()
                .parse::<LogFormat>()
                .map_err(|e| ConfigError::InvalidEnvVar("RETURNS_LOG_FORMAT".to_string(), e))?,
            None => defaults.log_format,
        };

        let log_filter = lookup("RETURNS_LOG_FILTER")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            shipment_line_table,
            log_format,
            log_filter,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ReturnsConfig::from_lookup(lookup_from(&[])).expect("defaults");
        assert_eq!(config.shipment_line_table, TableId::new(320));
        assert_eq!(config.log_format, LogFormat::Text);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_overrides() {
        let config = ReturnsConfig::from_lookup(lookup_from(&[
            ("RETURNS_SHIPMENT_LINE_TABLE_ID", "540"),
            ("RETURNS_LOG_FORMAT", "JSON"),
            ("RETURNS_LOG_FILTER", "hu_returns=debug"),
        ]))
        .expect("valid config");
        assert_eq!(config.shipment_line_table, TableId::new(540));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_filter, "hu_returns=debug");
    }

    #[test]
    fn test_invalid_table_id() {
        let result =
            ReturnsConfig::from_lookup(lookup_from(&[("RETURNS_SHIPMENT_LINE_TABLE_ID", "abc")]));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidEnvVar(name, _)) if name == "RETURNS_SHIPMENT_LINE_TABLE_ID"
        ));

        let result =
            ReturnsConfig::from_lookup(lookup_from(&[("RETURNS_SHIPMENT_LINE_TABLE_ID", "0")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_log_format() {
        let result = ReturnsConfig::from_lookup(lookup_from(&[("RETURNS_LOG_FORMAT", "xml")]));
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_blank_filter_falls_back() {
        let config = ReturnsConfig::from_lookup(lookup_from(&[("RETURNS_LOG_FILTER", "  ")]))
            .expect("valid config");
        assert_eq!(config.log_filter, "info");
    }
}
