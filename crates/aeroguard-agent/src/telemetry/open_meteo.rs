//! Open-Meteo current wind

use serde::Deserialize;

use aeroguard_core::WindObservation;

/// Variables requested from the forecast endpoint
pub const CURRENT_VARIABLES: &str = "wind_speed_10m,wind_direction_10m";

#[derive(Debug, Deserialize)]
pub(crate) struct ForecastResponse {
    #[serde(default)]
    current: Option<CurrentConditions>,
}

#[derive(Debug, Default, Deserialize)]
struct CurrentConditions {
    #[serde(default)]
    wind_speed_10m: Option<f64>,
    #[serde(default)]
    wind_direction_10m: Option<f64>,
}

impl ForecastResponse {
    /// Missing fields read as zero
    pub(crate) fn into_wind(self) -> WindObservation {
        let current = self.current.unwrap_or_default();
        WindObservation::new(
            current.wind_direction_10m.unwrap_or(0.0),
            current.wind_speed_10m.unwrap_or(0.0),
        )
    }
}
