//! # Forms Configuration
//!
//! Configuration for sale serial forms.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKDESK_REQUIRE_FULL_QUANTITY=false                              │
//! │     STOCKDESK_MAX_QUANTITY=500                                         │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/stockdesk/forms.toml (Linux)                             │
//! │     ~/Library/Application Support/com.stockdesk.stockdesk/forms.toml   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # forms.toml
//! [serials]
//! require_full_quantity = true
//! max_quantity = 5000
//! max_serial_len = 64
//!
//! [logging]
//! filter = "info,stockdesk=debug"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info, warn};

use stockdesk_core::{SubmissionPolicy, MAX_SALE_QUANTITY, MAX_SERIAL_LEN};

use crate::error::{FormError, FormResult};

// =============================================================================
// Serial Settings
// =============================================================================

/// Rules applied to serial forms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialSettings {
    /// Block submission while attached serials fall short of the quantity.
    #[serde(default = "default_require_full_quantity")]
    pub require_full_quantity: bool,

    /// Largest quantity accepted on one sale line.
    #[serde(default = "default_max_quantity")]
    pub max_quantity: u32,

    /// Longest serial number accepted.
    #[serde(default = "default_max_serial_len")]
    pub max_serial_len: usize,
}

fn default_require_full_quantity() -> bool {
    true
}

fn default_max_quantity() -> u32 {
    MAX_SALE_QUANTITY
}

fn default_max_serial_len() -> usize {
    MAX_SERIAL_LEN
}

impl Default for SerialSettings {
    fn default() -> Self {
        SerialSettings {
            require_full_quantity: default_require_full_quantity(),
            max_quantity: default_max_quantity(),
            max_serial_len: default_max_serial_len(),
        }
    }
}

// =============================================================================
// Logging Settings
// =============================================================================

/// Log output settings. `RUST_LOG` still wins when set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive string.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,stockdesk=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

// =============================================================================
// Forms Config
// =============================================================================

/// Complete forms configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormsConfig {
    /// Serial form rules.
    #[serde(default)]
    pub serials: SerialSettings,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl FormsConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (forms.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> FormResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading forms config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads configuration, falling back to defaults on any failure.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load forms config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Writes the configuration as TOML.
    pub fn save(&self, config_path: Option<PathBuf>) -> FormResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| FormError::InvalidConfig("no config directory available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;
        info!(?path, "Saved forms config");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> FormResult<()> {
        if self.serials.max_quantity == 0 {
            return Err(FormError::InvalidConfig(
                "max_quantity must be greater than 0".into(),
            ));
        }

        if self.serials.max_serial_len == 0 {
            return Err(FormError::InvalidConfig(
                "max_serial_len must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Returns the submission policy these settings describe.
    pub fn policy(&self) -> SubmissionPolicy {
        SubmissionPolicy {
            require_full_quantity: self.serials.require_full_quantity,
            max_quantity: self.serials.max_quantity,
            max_serial_len: self.serials.max_serial_len,
        }
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the environment in production).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(value) = lookup("STOCKDESK_REQUIRE_FULL_QUANTITY") {
            match parse_flag(&value) {
                Some(flag) => {
                    debug!(require_full_quantity = flag, "Overriding quantity rule from environment");
                    self.serials.require_full_quantity = flag;
                }
                None => warn!(value = %value, "Unknown STOCKDESK_REQUIRE_FULL_QUANTITY value"),
            }
        }

        if let Some(value) = lookup("STOCKDESK_MAX_QUANTITY") {
            match value.trim().parse::<u32>() {
                Ok(max) => {
                    debug!(max_quantity = max, "Overriding max quantity from environment");
                    self.serials.max_quantity = max;
                }
                Err(e) => warn!(value = %value, error = %e, "Invalid STOCKDESK_MAX_QUANTITY value"),
            }
        }

        if let Some(value) = lookup("STOCKDESK_MAX_SERIAL_LEN") {
            match value.trim().parse::<usize>() {
                Ok(max) => {
                    debug!(max_serial_len = max, "Overriding max serial length from environment");
                    self.serials.max_serial_len = max;
                }
                Err(e) => warn!(value = %value, error = %e, "Invalid STOCKDESK_MAX_SERIAL_LEN value"),
            }
        }

        if let Some(filter) = lookup("STOCKDESK_LOG") {
            self.logging.filter = filter;
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stockdesk", "stockdesk")
            .map(|dirs| dirs.config_dir().join("forms.toml"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
