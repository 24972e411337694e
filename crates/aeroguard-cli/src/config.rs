//! `aeroguard.toml` loading

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use aeroguard_agent::{ProviderConfig, TelemetryConfig};
use aeroguard_core::{PipelineConfig, Sector, SectorRegistry};

pub const DEFAULT_CONFIG_FILE: &str = "aeroguard.toml";
pub const CONFIG_ENV: &str = "AEROGUARD_CONFIG";

/// Whole application configuration; every section is optional
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub completion: ProviderConfig,
    pub telemetry: TelemetryConfig,
    pub pipeline: PipelineConfig,
    /// Replaces the built-in sectors when non-empty
    pub sectors: Vec<Sector>,
}

impl AppConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse AeroGuard config")
    }

    /// Explicit path, then `AEROGUARD_CONFIG`, then `./aeroguard.toml` if present.
    /// An explicitly named file must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match dotenvy::var(CONFIG_ENV) {
                Ok(path) if !path.trim().is_empty() => (PathBuf::from(path), true),
                _ => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
            },
        };

        if !path.exists() {
            if required {
                anyhow::bail!("Config file {} not found", path.display());
            }
            tracing::debug!("No config file, using built-in defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config in {}", path.display()))?;
        tracing::info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn registry(&self) -> Result<SectorRegistry> {
        if self.sectors.is_empty() {
            return Ok(SectorRegistry::builtin());
        }
        let registry = SectorRegistry::new(self.sectors.clone())
            .map_err(|e| e.context("Invalid [[sectors]] in config"))?;
        Ok(registry)
    }
}
