//! Telemetry records
//!
//! Stable record shapes produced by the telemetry gateway. Fire observations
//! are display-only evidence; wind observations drive the decision pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AeroGuardError, Result};
use crate::geometry::normalize_bearing;

/// Upper bound accepted for an operator wind-speed override (km/h)
pub const MAX_OPERATOR_WIND_SPEED: f64 = 100.0;

/// Wind vector for one decision cycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawWind")]
pub struct WindObservation {
    /// Direction the wind blows FROM, normalized to [0, 360)
    bearing_degrees: f64,
    /// Non-negative speed (km/h)
    speed: f64,
}

/// Unchecked wire shape; deserialization goes through `WindObservation::new`
#[derive(Deserialize)]
struct RawWind {
    bearing_degrees: f64,
    speed: f64,
}

impl From<RawWind> for WindObservation {
    fn from(raw: RawWind) -> Self {
        WindObservation::new(raw.bearing_degrees, raw.speed)
    }
}

impl WindObservation {
    /// Build from arbitrary telemetry values. Bearing is normalized and a
    /// negative or non-finite speed becomes zero.
    pub fn new(bearing_degrees: f64, speed: f64) -> Self {
        let speed = if speed.is_finite() && speed > 0.0 { speed } else { 0.0 };
        Self {
            bearing_degrees: normalize_bearing(bearing_degrees),
            speed,
        }
    }

    /// Fail-safe default used when weather telemetry is unavailable
    pub fn zeroed() -> Self {
        Self {
            bearing_degrees: 0.0,
            speed: 0.0,
        }
    }

    /// Validate an operator override: bearing in [0, 360], speed in [0, 100]
    pub fn from_operator(bearing_degrees: f64, speed: f64) -> Result<Self> {
        if !(0.0..=360.0).contains(&bearing_degrees) {
            return Err(AeroGuardError::InvalidWind(format!(
                "bearing {bearing_degrees} outside [0, 360]"
            )));
        }
        if !(0.0..=MAX_OPERATOR_WIND_SPEED).contains(&speed) {
            return Err(AeroGuardError::InvalidWind(format!(
                "speed {speed} outside [0, {MAX_OPERATOR_WIND_SPEED}]"
            )));
        }
        Ok(Self::new(bearing_degrees, speed))
    }

    pub fn bearing_degrees(&self) -> f64 {
        self.bearing_degrees
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn is_zeroed(&self) -> bool {
        self.bearing_degrees == 0.0 && self.speed == 0.0
    }
}

/// Provenance of a fire observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ObservationSource {
    /// Deterministic stand-in used without a sensor credential
    SimulationMode,
    /// Live VIIRS hotspot from the FIRMS service
    NasaViirsSatellite,
}

impl fmt::Display for ObservationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservationSource::SimulationMode => f.write_str("SIMULATION_MODE"),
            ObservationSource::NasaViirsSatellite => f.write_str("NASA_VIIRS_SATELLITE"),
        }
    }
}

/// Single thermal hotspot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireObservation {
    pub latitude: f64,
    pub longitude: f64,
    /// Brightness temperature (Kelvin)
    pub brightness: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<String>,
    pub source: ObservationSource,
}

impl FireObservation {
    /// Fixed hotspot in the Angeles National Forest
    pub fn simulated() -> Self {
        Self {
            latitude: 34.2437,
            longitude: -118.1522,
            brightness: 450.5,
            confidence: Some("high".to_string()),
            source: ObservationSource::SimulationMode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wind_normalizes() {
        let wind = WindObservation::new(450.0, -3.0);
        assert_eq!(wind.bearing_degrees(), 90.0);
        assert_eq!(wind.speed(), 0.0);

        let wind = WindObservation::new(360.0, 12.5);
        assert_eq!(wind.bearing_degrees(), 0.0);
        assert_eq!(wind.speed(), 12.5);
    }

    #[test]
    fn test_operator_ranges() {
        assert!(WindObservation::from_operator(360.0, 100.0).is_ok());
        assert!(WindObservation::from_operator(0.0, 0.0).is_ok());
        assert!(matches!(
            WindObservation::from_operator(361.0, 10.0),
            Err(AeroGuardError::InvalidWind(_))
        ));
        assert!(matches!(
            WindObservation::from_operator(10.0, 100.5),
            Err(AeroGuardError::InvalidWind(_))
        ));
        assert!(WindObservation::from_operator(f64::NAN, 10.0).is_err());
    }

    #[test]
    fn test_deserialize_normalizes() {
        let wind: WindObservation =
            serde_json::from_str(r#"{"bearing_degrees": -90.0, "speed": -4.0}"#).unwrap();
        assert_eq!(wind.bearing_degrees(), 270.0);
        assert_eq!(wind.speed(), 0.0);

        let wind: WindObservation =
            serde_json::from_str(r#"{"bearing_degrees": 725.0, "speed": 12.0}"#).unwrap();
        assert_eq!(wind, WindObservation::new(5.0, 12.0));
    }

    #[test]
    fn test_zeroed() {
        assert!(WindObservation::zeroed().is_zeroed());
        assert!(!WindObservation::new(10.0, 0.0).is_zeroed());
    }

    #[test]
    fn test_source_tags() {
        let fire = FireObservation::simulated();
        let json = serde_json::to_value(&fire).unwrap();
        assert_eq!(json["source"], "SIMULATION_MODE");
        assert_eq!(
            ObservationSource::NasaViirsSatellite.to_string(),
            "NASA_VIIRS_SATELLITE"
        );
    }
}
