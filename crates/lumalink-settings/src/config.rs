//! Configuration file handling for lumalink
//!
//! Supports JSON and TOML files. Configuration is organized into sections:
//! - Session settings (notification timeout, unresolved-device policy, MTU)
//! - Encoder settings (transition duration)
//! - Probe settings (test level, tolerance)

use lumalink_communication::framing::{DEFAULT_MTU, MIN_MTU};
use lumalink_communication::{EncodeOptions, ProbeSettings, SessionConfig};
use lumalink_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionSection {
    /// Wait for a response notification, in milliseconds
    pub notification_timeout_ms: u64,
    /// Accept devices the classifier could not resolve
    pub allow_unresolved: bool,
    /// Largest link write in bytes
    pub mtu: usize,
}

impl Default for SessionSection {
    fn default() -> Self {
        Self {
            notification_timeout_ms: 5000,
            allow_unresolved: true,
            mtu: DEFAULT_MTU,
        }
    }
}

/// Encoder settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderSection {
    /// Transition for duration-bearing commands, whole seconds
    pub transition_secs: u16,
}

/// Capability probe settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeSection {
    /// Probe tentative devices
    pub enabled: bool,
    /// Channel level of test commands
    pub test_level: u8,
    /// Accepted echo difference
    pub tolerance: u8,
}

impl Default for ProbeSection {
    fn default() -> Self {
        let defaults = ProbeSettings::default();
        Self {
            enabled: defaults.enabled,
            test_level: defaults.test_level,
            tolerance: defaults.tolerance,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Session settings
    pub session: SessionSection,
    /// Encoder settings
    pub encoder: EncoderSection,
    /// Probe settings
    pub probe: ProbeSection,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::other(format!("Failed to read config file: {}", e)))?;

        let config: Self = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&content)
                .map_err(|e| Error::other(format!("Invalid JSON config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::from_str(&content)
                .map_err(|e| Error::other(format!("Invalid TOML config: {}", e)))?
        } else {
            return Err(Error::other("Config file must be .json or .toml"));
        };

        config.validate()?;
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        self.validate()?;

        let content = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            toml::to_string_pretty(self)
                .map_err(|e| Error::other(format!("Failed to serialize config: {}", e)))?
        } else {
            return Err(Error::other("Config file must be .json or .toml"));
        };

        std::fs::write(path, content)
            .map_err(|e| Error::other(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.session.notification_timeout_ms == 0 {
            return Err(Error::other("Notification timeout must be > 0"));
        }

        if self.session.mtu < MIN_MTU {
            return Err(Error::other(format!("MTU must be at least {}", MIN_MTU)));
        }

        if self.probe.tolerance >= self.probe.test_level {
            return Err(Error::other("Probe tolerance must be below the test level"));
        }

        Ok(())
    }

    /// Encoder options
    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            transition_secs: self.encoder.transition_secs,
        }
    }

    /// Probe settings
    pub fn probe_settings(&self) -> ProbeSettings {
        ProbeSettings {
            enabled: self.probe.enabled,
            test_level: self.probe.test_level,
            tolerance: self.probe.tolerance,
        }
    }

    /// Session configuration with encoder and probe settings applied
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            notification_timeout_ms: self.session.notification_timeout_ms,
            allow_unresolved: self.session.allow_unresolved,
            mtu: self.session.mtu,
            encode: self.encode_options(),
            probe: self.probe_settings(),
        }
    }
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        config.session_config()
    }
}
