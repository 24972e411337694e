//! Direction Resolver
//!
//! Buckets a wind bearing into one of eight compass octants. Bearings are
//! meteorological: the direction the wind is blowing FROM. The safe evacuation
//! octant is the octant of the source bearing itself; the hazard advances
//! toward its antipode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CatalogError;

/// Width of one octant in degrees
pub const SECTOR_WIDTH: f64 = 45.0;

/// Half-sector offset so that each octant is centred on its compass point
pub const HALF_SECTOR: f64 = SECTOR_WIDTH / 2.0;

/// One of the eight compass octants, ordered clockwise from North
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Octant {
    #[serde(rename = "NORTH", alias = "N")]
    North,
    #[serde(rename = "NORTH-EAST", alias = "NE")]
    NorthEast,
    #[serde(rename = "EAST", alias = "E")]
    East,
    #[serde(rename = "SOUTH-EAST", alias = "SE")]
    SouthEast,
    #[serde(rename = "SOUTH", alias = "S")]
    South,
    #[serde(rename = "SOUTH-WEST", alias = "SW")]
    SouthWest,
    #[serde(rename = "WEST", alias = "W")]
    West,
    #[serde(rename = "NORTH-WEST", alias = "NW")]
    NorthWest,
}

impl Octant {
    /// All octants in clockwise order starting at North
    pub const ALL: [Octant; 8] = [
        Octant::North,
        Octant::NorthEast,
        Octant::East,
        Octant::SouthEast,
        Octant::South,
        Octant::SouthWest,
        Octant::West,
        Octant::NorthWest,
    ];

    /// Clockwise position, North = 0
    pub fn index(self) -> usize {
        self as usize
    }

    /// Octant at a clockwise position (wraps modulo 8)
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    /// Long label, as used in route catalogs and prompts
    pub fn name(self) -> &'static str {
        match self {
            Octant::North => "NORTH",
            Octant::NorthEast => "NORTH-EAST",
            Octant::East => "EAST",
            Octant::SouthEast => "SOUTH-EAST",
            Octant::South => "SOUTH",
            Octant::SouthWest => "SOUTH-WEST",
            Octant::West => "WEST",
            Octant::NorthWest => "NORTH-WEST",
        }
    }

    /// Abbreviated label (N, NE, ...)
    pub fn abbreviation(self) -> &'static str {
        match self {
            Octant::North => "N",
            Octant::NorthEast => "NE",
            Octant::East => "E",
            Octant::SouthEast => "SE",
            Octant::South => "S",
            Octant::SouthWest => "SW",
            Octant::West => "W",
            Octant::NorthWest => "NW",
        }
    }

    /// Compass bearing at the centre of this octant
    pub fn center_bearing(self) -> f64 {
        self.index() as f64 * SECTOR_WIDTH
    }

    /// The octant 180 degrees across the circle
    pub fn opposite(self) -> Self {
        Self::from_index(self.index() + 4)
    }
}

impl fmt::Display for Octant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Octant {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s
            .trim()
            .replace(|c: char| c == '_' || c == ' ', "-");
        Self::ALL
            .iter()
            .copied()
            .find(|o| {
                wanted.eq_ignore_ascii_case(o.name())
                    || wanted.eq_ignore_ascii_case(o.abbreviation())
            })
            .ok_or_else(|| CatalogError::UnknownOctant(s.to_string()))
    }
}

/// Reduce any bearing to [0, 360). Non-finite input maps to 0 (North).
pub fn normalize_bearing(bearing_degrees: f64) -> f64 {
    if !bearing_degrees.is_finite() {
        return 0.0;
    }
    let b = bearing_degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if b >= 360.0 {
        0.0
    } else {
        b
    }
}

/// Resolve a wind source bearing to its compass octant
pub fn octant_of(bearing_degrees: f64) -> Octant {
    let bearing = normalize_bearing(bearing_degrees);
    let index = ((bearing + HALF_SECTOR) / SECTOR_WIDTH) as usize;
    Octant::from_index(index)
}

/// The octant 180 degrees across the circle
pub fn opposite(octant: Octant) -> Octant {
    octant.opposite()
}
