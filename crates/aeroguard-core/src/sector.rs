//! Sectors - static operating theatres with their route catalogs

use serde::{Deserialize, Serialize};

use crate::catalog::RouteCatalog;
use crate::error::{AeroGuardError, Result, ResultExt};
use crate::geometry::Octant;

/// Geographic sector. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    /// Short identifier used on the command line
    pub id: String,
    /// Display name
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// UI default only
    #[serde(default)]
    pub default_wind_bearing: f64,
    /// UI default only
    #[serde(default)]
    pub default_wind_speed: f64,
    /// Thermal intensity label, e.g. "450K"
    #[serde(default)]
    pub intensity: String,
    #[serde(default)]
    pub routes: RouteCatalog,
}

/// The configured set of sectors. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorRegistry {
    sectors: Vec<Sector>,
}

#[derive(Deserialize)]
struct SectorFile {
    #[serde(default)]
    sectors: Vec<Sector>,
}

impl SectorRegistry {
    /// Registry over an explicit sector list. Ids must be unique and non-empty.
    pub fn new(sectors: Vec<Sector>) -> Result<Self> {
        if sectors.is_empty() {
            return Err(AeroGuardError::Config("no sectors configured".to_string()));
        }
        for (i, sector) in sectors.iter().enumerate() {
            if sector.id.trim().is_empty() {
                return Err(AeroGuardError::Config(format!(
                    "sector '{}' has an empty id",
                    sector.name
                )));
            }
            if sectors[..i].iter().any(|s| s.id == sector.id) {
                return Err(AeroGuardError::Config(format!(
                    "duplicate sector id '{}'",
                    sector.id
                )));
            }
        }
        Ok(Self { sectors })
    }

    /// Parse `[[sectors]]` tables from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: SectorFile = toml::from_str::<SectorFile>(content)
            .map_err(AeroGuardError::from)
            .context("Failed to parse [[sectors]] tables")?;
        Self::new(file.sectors).context("Invalid sector table")
    }

    /// Sector by id, or by display name (case-insensitive)
    pub fn get(&self, key: &str) -> Result<&Sector> {
        let key = key.trim();
        self.sectors
            .iter()
            .find(|s| s.id.eq_ignore_ascii_case(key))
            .or_else(|| {
                self.sectors
                    .iter()
                    .find(|s| s.name.eq_ignore_ascii_case(key))
            })
            .ok_or_else(|| AeroGuardError::UnknownSector(key.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sector> {
        self.sectors.iter()
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// First configured sector
    pub fn first(&self) -> &Sector {
        &self.sectors[0]
    }

    /// The three reference theatres shipped with AeroGuard
    pub fn builtin() -> Self {
        Self {
            sectors: vec![angeles(), blue_mountains(), attica()],
        }
    }
}

impl Default for SectorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn catalog(routes: [(Octant, &str); 8]) -> RouteCatalog {
    // Every built-in table names each octant exactly once
    RouteCatalog::new(routes).unwrap_or_default()
}

fn angeles() -> Sector {
    Sector {
        id: "angeles".to_string(),
        name: "Angeles National Forest, USA".to_string(),
        latitude: 34.24,
        longitude: -118.15,
        default_wind_bearing: 270.0,
        default_wind_speed: 45.0,
        intensity: "450K".to_string(),
        routes: catalog([
            (Octant::North, "Angeles Forest Hwy towards Palmdale"),
            (Octant::NorthEast, "Pearblossom Hwy towards Victorville"),
            (Octant::East, "CA-39 towards Crystal Lake"),
            (Octant::SouthEast, "San Gabriel Canyon Rd towards Azusa"),
            (Octant::South, "CA-2 South towards Glendale"),
            (Octant::SouthWest, "I-210 West towards Pasadena"),
            (Octant::West, "Big Tujunga Canyon Rd towards Sunland"),
            (Octant::NorthWest, "Soledad Canyon Rd towards Santa Clarita"),
        ]),
    }
}

fn blue_mountains() -> Sector {
    Sector {
        id: "blue-mountains".to_string(),
        name: "Blue Mountains, Australia (NSW)".to_string(),
        latitude: -33.71,
        longitude: 150.31,
        default_wind_bearing: 90.0,
        default_wind_speed: 60.0,
        intensity: "500K".to_string(),
        routes: catalog([
            (Octant::North, "Bells Line of Road towards Kurrajong"),
            (Octant::NorthEast, "Hawkesbury Rd towards Springwood"),
            (Octant::East, "M4 Motorway towards Sydney"),
            (Octant::SouthEast, "Mulgoa Rd towards Penrith"),
            (Octant::South, "Great Western Hwy towards Penrith"),
            (Octant::SouthWest, "Jenolan Caves Rd towards Oberon"),
            (Octant::West, "Great Western Hwy towards Lithgow"),
            (Octant::NorthWest, "Chifley Rd towards Clarence"),
        ]),
    }
}

fn attica() -> Sector {
    Sector {
        id: "attica".to_string(),
        name: "Attica Region, Greece".to_string(),
        latitude: 38.04,
        longitude: 23.86,
        default_wind_bearing: 315.0,
        default_wind_speed: 55.0,
        intensity: "420K".to_string(),
        routes: catalog([
            (Octant::North, "E75 Highway towards Lamia"),
            (Octant::NorthEast, "Dionysou Avenue towards Dionysos"),
            (Octant::East, "Marathonos Avenue towards Nea Makri"),
            (Octant::SouthEast, "Mesogeion Avenue towards Airport"),
            (Octant::South, "Attiki Odos towards Athens Center"),
            (Octant::SouthWest, "Kymis Avenue towards Galatsi"),
            (Octant::West, "Leoforos Kifisias towards Marousi"),
            (Octant::NorthWest, "Tatoiou Avenue towards Acharnes"),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalogs_are_complete() {
        let registry = SectorRegistry::builtin();
        assert_eq!(registry.len(), 3);
        for sector in registry.iter() {
            assert_eq!(sector.routes.len(), 8, "sector {}", sector.id);
        }
    }

    #[test]
    fn test_lookup_by_id_and_name() {
        let registry = SectorRegistry::builtin();
        assert_eq!(
            registry.get("attica").unwrap().name,
            "Attica Region, Greece"
        );
        assert_eq!(
            registry.get("blue mountains, australia (nsw)").unwrap().id,
            "blue-mountains"
        );
        assert!(matches!(
            registry.get("sierra"),
            Err(AeroGuardError::UnknownSector(_))
        ));
    }

    #[test]
    fn test_from_toml() {
        let registry = SectorRegistry::from_toml_str(
            r#"
            [[sectors]]
            id = "test"
            name = "Test Sector"
            latitude = 1.0
            longitude = 2.0

            [sectors.routes]
            NORTH = "Hwy A"
            SOUTH = "Hwy B"
            "#,
        )
        .unwrap();
        let sector = registry.get("test").unwrap();
        assert_eq!(sector.routes.len(), 2);
        assert_eq!(sector.default_wind_speed, 0.0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let sector = angeles();
        let err = SectorRegistry::new(vec![sector.clone(), sector]).unwrap_err();
        assert!(err.to_string().contains("duplicate sector id"));
        assert!(SectorRegistry::new(Vec::new()).is_err());
    }

    #[test]
    fn test_toml_errors_carry_context() {
        let err = SectorRegistry::from_toml_str("[[sectors]]\nid = 7").unwrap_err();
        assert!(matches!(err, AeroGuardError::WithContext { .. }));
        assert!(err.to_string().starts_with("Failed to parse [[sectors]] tables"));

        let err = SectorRegistry::from_toml_str("").unwrap_err();
        let rendered = err.to_string();
        assert!(rendered.contains("Invalid sector table"));
        assert!(rendered.contains("no sectors configured"));
    }
}
