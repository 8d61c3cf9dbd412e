// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Device configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! [server]
//! pool_capacity = 50
//! pool_slot_size = 32768
//! auth_realm = "ONVIF Server"
//! nonce_validity_seconds = 300
//! session_timeout_seconds = 600
//!
//! [imaging]
//! brightness = 10
//! contrast = 0
//!
//! [day_night]
//! mode = "auto"
//! day_to_night_threshold = 30
//! night_to_day_threshold = 70
//! ```

use crate::day_night::AutoDayNightConfig;
use crate::error::ConfigError;
use crate::imaging::ImagingSettings;
use std::path::Path;

/// Server-side resource and auth tuning.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Number of response buffer slots.
    pub pool_capacity: usize,
    /// Size of each response buffer slot in bytes.
    pub pool_slot_size: usize,
    /// Digest authentication realm.
    pub auth_realm: String,
    /// Nonce lifetime in seconds.
    pub nonce_validity_seconds: u64,
    /// Idle auth-session lifetime in seconds.
    pub session_timeout_seconds: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            pool_capacity: 50,
            pool_slot_size: 32 * 1024,
            auth_realm: "ONVIF Server".to_string(),
            nonce_validity_seconds: 300,
            session_timeout_seconds: 600,
        }
    }
}

/// Complete persisted device configuration.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    pub server: ServerSettings,
    pub imaging: ImagingSettings,
    pub day_night: AutoDayNightConfig,
}

impl DeviceConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_toml(&content)?;
        tracing::debug!(path = %path.display(), "device config loaded");
        Ok(config)
    }

    /// Parses configuration from a TOML string and validates it.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Writes configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "device config saved");
        Ok(())
    }

    /// Validates every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.imaging.validate()?;
        self.day_night.validate()?;
        Ok(())
    }
}
