//! Telemetry gateway
//!
//! Pulls the latest hotspot from FIRMS and the current wind from Open-Meteo.
//! Neither call ever fails outward: fire lookups degrade to `None` (or the
//! simulated hotspot without a credential) and wind degrades to a zeroed vector.

pub mod firms;
pub mod open_meteo;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use aeroguard_core::{FireObservation, WindObservation};

use open_meteo::ForecastResponse;

pub const DEFAULT_FIRMS_URL: &str = "https://firms.modaps.eosdis.nasa.gov";
pub const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com";
pub const DEFAULT_FIRMS_KEY_ENV: &str = "AEROGUARD_FIRMS_KEY";

/// Marker left in sample configs in place of a real FIRMS map key
const PLACEHOLDER_KEY_MARKER: &str = "YOUR_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// FIRMS map key; falls back to `firms_key_env`
    pub firms_key: Option<String>,
    pub firms_key_env: Option<String>,
    pub firms_base_url: String,
    pub firms_product: String,
    /// Bounding box `west,south,east,north`
    pub firms_area: String,
    pub firms_days: u32,
    pub weather_base_url: String,
    pub fire_timeout_secs: u64,
    pub weather_timeout_secs: u64,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            firms_key: None,
            firms_key_env: Some(DEFAULT_FIRMS_KEY_ENV.to_string()),
            firms_base_url: DEFAULT_FIRMS_URL.to_string(),
            firms_product: "VIIRS_SNPP_NRT".to_string(),
            firms_area: "-124.4,32.5,-114.1,42.0".to_string(),
            firms_days: 1,
            weather_base_url: DEFAULT_WEATHER_URL.to_string(),
            fire_timeout_secs: 10,
            weather_timeout_secs: 5,
        }
    }
}

impl TelemetryConfig {
    /// Configured key, else the environment (and `.env`) variable
    pub fn resolved_firms_key(&self) -> Option<String> {
        if let Some(key) = self.firms_key.as_ref().filter(|k| !k.trim().is_empty()) {
            return Some(key.clone());
        }
        let env_name = self.firms_key_env.as_ref()?;
        dotenvy::var(env_name).ok().filter(|k| !k.trim().is_empty())
    }
}

/// True for a missing, blank or sample-placeholder credential
pub fn is_placeholder_key(key: Option<&str>) -> bool {
    match key {
        None => true,
        Some(k) => k.trim().is_empty() || k.contains(PLACEHOLDER_KEY_MARKER),
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryGateway {
    config: TelemetryConfig,
    firms_key: Option<String>,
    http_client: reqwest::Client,
}

impl TelemetryGateway {
    pub fn new(config: TelemetryConfig) -> Self {
        let firms_key = config.resolved_firms_key();
        Self {
            config,
            firms_key,
            http_client: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &TelemetryConfig {
        &self.config
    }

    pub fn is_simulated(&self) -> bool {
        is_placeholder_key(self.firms_key.as_deref())
    }

    fn firms_url(&self, key: &str) -> String {
        format!(
            "{}/api/area/csv/{}/{}/{}/{}",
            self.config.firms_base_url.trim_end_matches('/'),
            key,
            self.config.firms_product,
            self.config.firms_area,
            self.config.firms_days
        )
    }

    /// Hottest qualifying hotspot in the configured area
    pub async fn latest_fire(&self) -> Option<FireObservation> {
        let key = match self.firms_key.as_deref() {
            Some(key) if !is_placeholder_key(Some(key)) => key,
            _ => {
                tracing::info!("No FIRMS credential configured, using simulated hotspot");
                return Some(FireObservation::simulated());
            }
        };

        match self.fetch_fire(key).await {
            Ok(Some(fire)) => {
                tracing::info!(
                    latitude = fire.latitude,
                    longitude = fire.longitude,
                    brightness = fire.brightness,
                    "Satellite hotspot acquired"
                );
                Some(fire)
            }
            Ok(None) => {
                tracing::info!("No qualifying satellite hotspots");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Fire telemetry unavailable");
                None
            }
        }
    }

    async fn fetch_fire(&self, key: &str) -> Result<Option<FireObservation>> {
        let response = self
            .http_client
            .get(self.firms_url(key))
            .timeout(Duration::from_secs(self.config.fire_timeout_secs))
            .send()
            .await
            .context("Failed to reach FIRMS")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("FIRMS returned HTTP {}", status);
        }

        let body = response.text().await.context("Failed to read FIRMS body")?;
        if firms::is_no_data(&body) {
            return Ok(None);
        }

        let hotspots = firms::parse_hotspots(&body)?;
        Ok(firms::hottest_qualifying(hotspots).map(firms::Hotspot::into_observation))
    }

    /// Current wind at a point; zeroed when the weather service is unavailable
    pub async fn current_wind(&self, latitude: f64, longitude: f64) -> WindObservation {
        match self.fetch_wind(latitude, longitude).await {
            Ok(wind) => {
                tracing::info!(
                    bearing = wind.bearing_degrees(),
                    speed = wind.speed(),
                    "Wind telemetry acquired"
                );
                wind
            }
            Err(e) => {
                tracing::warn!(error = %e, "Wind telemetry unavailable, using zeroed vector");
                WindObservation::zeroed()
            }
        }
    }

    async fn fetch_wind(&self, latitude: f64, longitude: f64) -> Result<WindObservation> {
        let url = format!(
            "{}/v1/forecast",
            self.config.weather_base_url.trim_end_matches('/')
        );
        let response = self
            .http_client
            .get(url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", open_meteo::CURRENT_VARIABLES.to_string()),
            ])
            .timeout(Duration::from_secs(self.config.weather_timeout_secs))
            .send()
            .await
            .context("Failed to reach Open-Meteo")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Open-Meteo returned HTTP {}", status);
        }

        let forecast: ForecastResponse = response
            .json()
            .await
            .context("Failed to parse Open-Meteo response")?;
        Ok(forecast.into_wind())
    }
}

impl Default for TelemetryGateway {
    fn default() -> Self {
        Self::new(TelemetryConfig::default())
    }
}
