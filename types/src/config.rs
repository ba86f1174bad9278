//! Deployment configuration with TOML file support.

use crate::CertificationParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Configuration for the certification core.
///
/// Can be loaded from a TOML file via [`CertificationConfig::from_toml_file`]
/// or built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CertificationConfig {
    /// Base URL of the identity-match oracle.
    #[serde(default = "default_oracle_url")]
    pub oracle_url: String,

    /// Origin prepended to verify links embedded in scan codes.
    #[serde(default = "default_verify_origin")]
    pub verify_origin: String,

    /// Geofence radius in meters (fixed per deployment).
    #[serde(default = "default_radius_m")]
    pub geofence_radius_m: f64,

    /// Capture timeout in seconds before an unresponsive sensor becomes a
    /// retryable error.
    #[serde(default = "default_capture_timeout")]
    pub capture_timeout_secs: u64,

    /// Position acquisition timeout in seconds.
    #[serde(default = "default_position_timeout")]
    pub position_timeout_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_oracle_url() -> String {
    "https://verify.attest.example.org".to_string()
}

fn default_verify_origin() -> String {
    "https://attest.example.org".to_string()
}

fn default_radius_m() -> f64 {
    100.0
}

fn default_capture_timeout() -> u64 {
    20
}

fn default_position_timeout() -> u64 {
    15
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for CertificationConfig {
    fn default() -> Self {
        Self {
            oracle_url: default_oracle_url(),
            verify_origin: default_verify_origin(),
            geofence_radius_m: default_radius_m(),
            capture_timeout_secs: default_capture_timeout(),
            position_timeout_secs: default_position_timeout(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

impl CertificationConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&raw)?)
    }

    /// The flow-level parameters derived from this configuration.
    pub fn params(&self) -> CertificationParams {
        CertificationParams {
            geofence_radius_m: self.geofence_radius_m,
            capture_timeout_secs: self.capture_timeout_secs,
            position_timeout_secs: self.position_timeout_secs,
            verify_origin: self.verify_origin.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config: CertificationConfig = toml::from_str("").unwrap();
        assert_eq!(config.geofence_radius_m, 100.0);
        assert_eq!(config.capture_timeout_secs, 20);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn partial_config_overrides_only_named_fields() {
        let config: CertificationConfig = toml::from_str(
            r#"
            geofence_radius_m = 250.0
            verify_origin = "https://events.example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.geofence_radius_m, 250.0);
        assert_eq!(config.verify_origin, "https://events.example.com");
        assert_eq!(config.position_timeout_secs, 15);
    }

    #[test]
    fn params_carry_the_configured_values() {
        let mut config = CertificationConfig::default();
        config.geofence_radius_m = 50.0;
        let params = config.params();
        assert_eq!(params.geofence_radius_m, 50.0);
        assert_eq!(params.verify_origin, config.verify_origin);
    }
}
