//! Route Catalog
//!
//! Per-sector mapping from compass octant to a named evacuation route. Lookups
//! are total: an octant without a named route yields a generated fallback.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::CatalogError;
use crate::geometry::{octant_of, Octant};
use crate::telemetry::WindObservation;

/// Immutable octant -> route description table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct RouteCatalog {
    routes: BTreeMap<Octant, String>,
}

impl RouteCatalog {
    /// Build a catalog from octant/route pairs. Later duplicates are rejected.
    pub fn new<I, S>(routes: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = (Octant, S)>,
        S: Into<String>,
    {
        let mut table = BTreeMap::new();
        for (octant, route) in routes {
            if table.insert(octant, route.into()).is_some() {
                return Err(CatalogError::DuplicateOctant(octant.name().to_string()));
            }
        }
        Ok(Self { routes: table })
    }

    /// Catalog with no named routes; every lookup falls back
    pub fn empty() -> Self {
        Self::default()
    }

    /// Named route for an octant, if the catalog has one
    pub fn named_route(&self, octant: Octant) -> Option<&str> {
        self.routes.get(&octant).map(String::as_str)
    }

    /// Number of octants with a named route
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Iterate named routes in clockwise order
    pub fn iter(&self) -> impl Iterator<Item = (Octant, &str)> {
        self.routes.iter().map(|(o, r)| (*o, r.as_str()))
    }
}

impl TryFrom<BTreeMap<String, String>> for RouteCatalog {
    type Error = CatalogError;

    fn try_from(raw: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut parsed = Vec::with_capacity(raw.len());
        for (key, route) in raw {
            parsed.push((key.parse::<Octant>()?, route));
        }
        Self::new(parsed)
    }
}

impl From<RouteCatalog> for BTreeMap<String, String> {
    fn from(catalog: RouteCatalog) -> Self {
        catalog
            .routes
            .into_iter()
            .map(|(o, r)| (o.name().to_string(), r))
            .collect()
    }
}

/// Fallback text for an octant without a named route
pub fn fallback_route(octant: Octant) -> String {
    format!("Evacuate {} (General Route)", octant.name())
}

/// Route description for an octant. Never fails.
pub fn route_for(catalog: &RouteCatalog, octant: Octant) -> String {
    catalog
        .named_route(octant)
        .map(str::to_string)
        .unwrap_or_else(|| fallback_route(octant))
}

/// The two mutually exclusive evacuation options for one decision cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRoutePair {
    /// Octant of the wind source; evacuating toward it moves upwind
    pub safe_octant: Octant,
    pub safe_route: String,
    /// Antipode of the safe octant; the direction the fire front advances
    pub unsafe_octant: Octant,
    pub unsafe_route: String,
}

impl CandidateRoutePair {
    /// Derive the pair from a wind observation and a catalog
    pub fn resolve(wind: &WindObservation, catalog: &RouteCatalog) -> Self {
        let safe_octant = octant_of(wind.bearing_degrees());
        let unsafe_octant = safe_octant.opposite();
        Self {
            safe_octant,
            safe_route: route_for(catalog, safe_octant),
            unsafe_octant,
            unsafe_route: route_for(catalog, unsafe_octant),
        }
    }
}
