//! Application configuration management.
//!
//! This module handles loading and saving the application configuration:
//! upstream base URL, catalog target counts, the normalization sample
//! bound, the inter-page delay and the failure policy.
//!
//! Configuration is stored at `~/.config/dexcache/config.json`.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::normalize::FailurePolicy;

/// Application name used for config/data/cache directory paths
const APP_NAME: &str = "dexcache";

/// Config file name
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upstream catalog base URL.
    pub api_base: String,
    /// Target record count for the "pokemon" catalog index.
    pub pokemon_count: u64,
    /// Target record count for the "ability" catalog index.
    pub ability_count: u64,
    /// Upper bound on entries resolved per dashboard session.
    pub sample_size: usize,
    /// Delay between listing page requests, in milliseconds.
    pub page_delay_ms: u64,
    /// Whether skipped entries are reported or silent.
    pub failure_policy: FailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base: "https://pokeapi.co/api/v2".to_string(),
            pokemon_count: 1302,
            ability_count: 367,
            sample_size: 151,
            page_delay_ms: 1000,
            failure_policy: FailurePolicy::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&contents)?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Where catalog snapshots live.
    pub fn data_dir(&self) -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?;
        Ok(data_dir.join(APP_NAME))
    }

    /// Where memoized tables live.
    pub fn memo_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME).join("memo"))
    }
}
