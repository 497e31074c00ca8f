//! # Checkout Configuration
//!
//! Configuration for the sales-endpoint connection.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variable (highest priority)                            │
//! │     MERIDIAN_SALES_URL=https://pos.example.com/api/                    │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     passed explicitly to `CheckoutConfig::load`                        │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     local development backend, conservative timeouts                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # checkout.toml
//! endpoint_url = "https://pos.example.com/api/"
//! connect_timeout_secs = 5
//! request_timeout_secs = 30
//! terminal_name = "Register 1"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{CheckoutError, CheckoutResult};

// =============================================================================
// Checkout Configuration
// =============================================================================

/// Connection settings for the sales-recording endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Base URL of the backend API. The sale submission POSTs to
    /// `{endpoint_url}/sales`.
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,

    /// TCP connect timeout (seconds).
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout (seconds). A checkout that outlives this is
    /// surfaced as a transport error; the cart stays intact.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Human-readable name of this terminal (for logs).
    #[serde(default = "default_terminal_name")]
    pub terminal_name: String,
}

fn default_endpoint_url() -> String {
    "http://127.0.0.1:8000/api/".to_string()
}

fn default_connect_timeout() -> u64 {
    5
}

fn default_request_timeout() -> u64 {
    30
}

fn default_terminal_name() -> String {
    "POS Terminal".to_string()
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        CheckoutConfig {
            endpoint_url: default_endpoint_url(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            terminal_name: default_terminal_name(),
        }
    }
}

impl CheckoutConfig {
    /// Parses a config from TOML text. Missing fields fall back to their
    /// defaults.
    pub fn from_toml_str(text: &str) -> CheckoutResult<Self> {
        let mut config: CheckoutConfig =
            toml::from_str(text).map_err(|e| CheckoutError::ConfigLoadFailed(e.to_string()))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Loads a config file from disk. A missing file is not an error:
    /// defaults (plus env overrides) are used instead.
    pub fn load(path: &Path) -> CheckoutResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No checkout config file, using defaults");
            let mut config = CheckoutConfig::default();
            config.apply_env_overrides();
            return Ok(config);
        }

        let text = std::fs::read_to_string(path)
            .map_err(|e| CheckoutError::ConfigLoadFailed(e.to_string()))?;
        let config = Self::from_toml_str(&text)?;

        info!(path = %path.display(), endpoint = %config.endpoint_url, "Loaded checkout config");
        Ok(config)
    }

    /// Applies `MERIDIAN_SALES_URL` over whatever the file said.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("MERIDIAN_SALES_URL") {
            if !url.trim().is_empty() {
                debug!(url = %url, "Sales endpoint overridden by MERIDIAN_SALES_URL");
                self.endpoint_url = url;
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// The environment is process-global, so every test that loads a
    /// config (and therefore reads MERIDIAN_SALES_URL) serializes on this.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_defaults() {
        let config = CheckoutConfig::default();
        assert_eq!(config.endpoint_url, "http://127.0.0.1:8000/api/");
        assert_eq!(config.connect_timeout_secs, 5);
        assert_eq!(config.request_timeout_secs, 30);
        assert_eq!(config.terminal_name, "POS Terminal");
    }

    #[test]
    fn test_partial_toml_uses_field_defaults() {
        let _env = ENV_LOCK.lock().unwrap();
        let config =
            CheckoutConfig::from_toml_str("endpoint_url = \"https://pos.example.com/api/\"\n")
                .unwrap();
        assert_eq!(config.endpoint_url, "https://pos.example.com/api/");
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn test_full_toml() {
        let _env = ENV_LOCK.lock().unwrap();
        let text = r#"
            endpoint_url = "https://pos.example.com/api/"
            connect_timeout_secs = 2
            request_timeout_secs = 10
            terminal_name = "Register 1"
        "#;
        let config = CheckoutConfig::from_toml_str(text).unwrap();
        assert_eq!(config.connect_timeout_secs, 2);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.terminal_name, "Register 1");
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        let result = CheckoutConfig::from_toml_str("endpoint_url = [not a string");
        assert!(matches!(result, Err(CheckoutError::ConfigLoadFailed(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let _env = ENV_LOCK.lock().unwrap();
        let config = CheckoutConfig::load(Path::new("/nonexistent/checkout.toml")).unwrap();
        assert_eq!(config.endpoint_url, CheckoutConfig::default().endpoint_url);
    }

    #[test]
    fn test_env_override_beats_file() {
        let _env = ENV_LOCK.lock().unwrap();
        std::env::set_var("MERIDIAN_SALES_URL", "https://override.example.com/api/");

        let config =
            CheckoutConfig::from_toml_str("endpoint_url = \"https://file.example.com/api/\"\n")
                .unwrap();

        std::env::remove_var("MERIDIAN_SALES_URL");
        assert_eq!(config.endpoint_url, "https://override.example.com/api/");
    }

    #[test]
    fn test_blank_env_override_is_ignored() {
        let _env = ENV_LOCK.lock().unwrap();
        std::env::set_var("MERIDIAN_SALES_URL", "   ");

        let config =
            CheckoutConfig::from_toml_str("endpoint_url = \"https://file.example.com/api/\"\n")
                .unwrap();

        std::env::remove_var("MERIDIAN_SALES_URL");
        assert_eq!(config.endpoint_url, "https://file.example.com/api/");
    }
}
