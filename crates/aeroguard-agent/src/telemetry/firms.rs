//! FIRMS area CSV (VIIRS hotspots)

use anyhow::{Context, Result};

use aeroguard_core::{FireObservation, ObservationSource};

/// One parsed hotspot row
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    pub latitude: f64,
    pub longitude: f64,
    pub brightness: f64,
    pub confidence: String,
}

impl Hotspot {
    /// VIIRS reports l/n/h; older products spell the level out
    pub fn is_low_confidence(&self) -> bool {
        let c = self.confidence.trim();
        c.eq_ignore_ascii_case("l") || c.eq_ignore_ascii_case("low")
    }

    pub fn into_observation(self) -> FireObservation {
        FireObservation {
            latitude: self.latitude,
            longitude: self.longitude,
            brightness: self.brightness,
            confidence: Some(self.confidence),
            source: ObservationSource::NasaViirsSatellite,
        }
    }
}

/// Empty-result marker FIRMS returns instead of a CSV body
pub fn is_no_data(body: &str) -> bool {
    body.contains("No Data")
}

fn column(header: &[&str], names: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|h| names.iter().any(|n| h.trim().eq_ignore_ascii_case(n)))
}

/// Parse a FIRMS area CSV. Rows with unreadable coordinates or brightness
/// are skipped; a header without the required columns is an error.
pub fn parse_hotspots(csv: &str) -> Result<Vec<Hotspot>> {
    let mut lines = csv.lines().filter(|l| !l.trim().is_empty());
    let header: Vec<&str> = lines
        .next()
        .context("FIRMS payload is empty")?
        .split(',')
        .collect();

    let lat = column(&header, &["latitude"])
        .context("FIRMS payload has no latitude column")?;
    let lon = column(&header, &["longitude"])
        .context("FIRMS payload has no longitude column")?;
    let bright = column(&header, &["bright_ti4", "brightness"])
        .context("FIRMS payload has no brightness column")?;
    let conf = column(&header, &["confidence"]);

    let mut hotspots = Vec::new();
    for line in lines {
        let fields: Vec<&str> = line.split(',').collect();
        let number = |idx: usize| fields.get(idx).and_then(|f| f.trim().parse::<f64>().ok());
        let (Some(latitude), Some(longitude), Some(brightness)) =
            (number(lat), number(lon), number(bright))
        else {
            tracing::debug!(row = %line, "Skipping unreadable FIRMS row");
            continue;
        };
        let confidence = conf
            .and_then(|idx| fields.get(idx))
            .map(|c| c.trim().to_string())
            .unwrap_or_default();
        hotspots.push(Hotspot {
            latitude,
            longitude,
            brightness,
            confidence,
        });
    }
    Ok(hotspots)
}

/// Hottest hotspot that is not low-confidence
pub fn hottest_qualifying(hotspots: Vec<Hotspot>) -> Option<Hotspot> {
    hotspots
        .into_iter()
        .filter(|h| !h.is_low_confidence() && h.brightness.is_finite())
        .max_by(|a, b| a.brightness.total_cmp(&b.brightness))
}
