//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs.
//! The config path itself may be overridden with `PRICE_POLL_CONFIG`.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;

use crate::types::Currency;

/// Env var that overrides the config file location.
pub const CONFIG_PATH_ENV: &str = "PRICE_POLL_CONFIG";

/// Config file used when `PRICE_POLL_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub contest: ContestConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContestConfig {
    pub name: String,
    /// Path to the JSON contest record.
    pub data_file: String,
    /// Which price field of the record to score against.
    #[serde(default)]
    pub currency: Currency,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportConfig {
    #[serde(default = "default_true")]
    pub show_yearly: bool,
    /// Optional JSON snapshot of the standings written after each run.
    #[serde(default)]
    pub export_standings: Option<String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            show_yearly: true,
            export_standings: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub enabled: bool,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            port: 8000,
        }
    }
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse config file: {path}"))
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Config path from `PRICE_POLL_CONFIG`, or the default.
    pub fn path_from_env() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }
}
