//! Configuration file format.

use super::ProtectionRegion;
use crate::protection::{ProtectionRule, ProtectionTable};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Configuration loading errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    FileReadError(String),
    #[error("failed to parse config file: {0}")]
    ParseError(String),
    #[error("protection for camera {logical_id} has an empty path")]
    EmptyProtectionPath { logical_id: String },
}

/// Full configuration file format.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    /// Packages whose camera sessions never trigger protection.
    #[serde(default)]
    pub excluded_packages: PackageList,
    /// Protected cameras, in match priority order.
    #[serde(default, rename = "protection")]
    pub protections: Vec<ProtectionEntry>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Excluded packages, either as one comma-separated string or an array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PackageList {
    Csv(String),
    List(Vec<String>),
}

impl Default for PackageList {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl PackageList {
    /// Trimmed, non-empty package ids.
    pub fn to_set(&self) -> HashSet<String> {
        let ids: Vec<&str> = match self {
            Self::Csv(joined) => joined.split(',').collect(),
            Self::List(ids) => ids.iter().map(String::as_str).collect(),
        };
        ids.into_iter()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// One protected camera slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtectionEntry {
    /// Logical camera id. An empty id leaves the slot unused.
    #[serde(default)]
    pub logical_id: String,
    /// Physical sensor id. Empty or missing means any sensor.
    #[serde(default)]
    pub physical_id: Option<String>,
    /// Region name reported to listeners. Defaults to the camera ids.
    #[serde(default)]
    pub region: Option<String>,
    /// Raw cutout path data.
    #[serde(default)]
    pub path: String,
}

impl ProtectionEntry {
    fn is_configured(&self) -> bool {
        !self.logical_id.trim().is_empty()
    }

    fn physical_id(&self) -> Option<&str> {
        self.physical_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    fn region_name(&self) -> String {
        match (&self.region, self.physical_id()) {
            (Some(name), _) if !name.trim().is_empty() => name.trim().to_string(),
            (_, Some(physical)) => format!("{}:{}", self.logical_id.trim(), physical),
            (_, None) => self.logical_id.trim().to_string(),
        }
    }

    fn to_rule(&self) -> Result<ProtectionRule<ProtectionRegion>, ConfigError> {
        let logical_id = self.logical_id.trim();
        let path = self.path.trim();
        if path.is_empty() {
            return Err(ConfigError::EmptyProtectionPath {
                logical_id: logical_id.to_string(),
            });
        }

        let region = ProtectionRegion::new(self.region_name(), path);
        Ok(match self.physical_id() {
            Some(physical) => ProtectionRule::physical(logical_id, physical, region),
            None => ProtectionRule::logical(logical_id, region),
        })
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl FileConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: FileConfig =
            toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every configured slot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.configured().try_for_each(|entry| entry.to_rule().map(drop))
    }

    /// Builds the rule table. Unused slots are skipped; order is kept.
    pub fn protection_table(&self) -> Result<ProtectionTable<ProtectionRegion>, ConfigError> {
        let rules = self
            .configured()
            .map(ProtectionEntry::to_rule)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ProtectionTable::new(rules).with_excluded_packages(self.excluded_packages.to_set()))
    }

    fn configured(&self) -> impl Iterator<Item = &ProtectionEntry> {
        self.protections.iter().filter(|entry| entry.is_configured())
    }
}
