//! Wiring of configuration into the pipeline and telemetry gateway

use anyhow::Result;

use aeroguard_agent::{build_provider, TelemetryGateway};
use aeroguard_core::{DecisionPipeline, Sector, SectorRegistry, WindObservation};

use crate::config::AppConfig;

/// Where the wind for a run comes from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WindSource {
    /// The sector's configured default vector
    SectorDefault,
    /// Open-Meteo current conditions at the sector centre
    Live,
    /// Validated operator override
    Manual(WindObservation),
}

impl WindSource {
    /// Resolve command-line wind options. A lone bearing or speed keeps the
    /// sector default for the other component.
    pub fn from_args(
        sector: &Sector,
        bearing: Option<f64>,
        speed: Option<f64>,
        live: bool,
    ) -> Result<Self> {
        if live {
            return Ok(WindSource::Live);
        }
        if bearing.is_none() && speed.is_none() {
            return Ok(WindSource::SectorDefault);
        }
        let wind = WindObservation::from_operator(
            bearing.unwrap_or(sector.default_wind_bearing),
            speed.unwrap_or(sector.default_wind_speed),
        )?;
        Ok(WindSource::Manual(wind))
    }

    pub fn label(&self) -> &'static str {
        match self {
            WindSource::SectorDefault => "sector default",
            WindSource::Live => "live (Open-Meteo)",
            WindSource::Manual(_) => "operator override",
        }
    }
}

pub struct App {
    pub registry: SectorRegistry,
    pub pipeline: DecisionPipeline,
    pub gateway: TelemetryGateway,
}

impl App {
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let completion = build_provider(&config.completion)?;
        Ok(Self {
            registry: config.registry()?,
            pipeline: DecisionPipeline::new(completion)
                .with_config(config.pipeline.clone()),
            gateway: TelemetryGateway::new(config.telemetry.clone()),
        })
    }

    pub async fn wind_for(&self, sector: &Sector, source: WindSource) -> WindObservation {
        match source {
            WindSource::SectorDefault => {
                WindObservation::new(sector.default_wind_bearing, sector.default_wind_speed)
            }
            WindSource::Live => {
                self.gateway
                    .current_wind(sector.latitude, sector.longitude)
                    .await
            }
            WindSource::Manual(wind) => wind,
        }
    }
}
