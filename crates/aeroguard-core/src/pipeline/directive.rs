//! The terminal artifact of a decision cycle

use serde::{Deserialize, Serialize};

use crate::geometry::Octant;

/// Outcome of one pipeline run. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Directive {
    /// Verified upwind route
    Authorized { route: String, rationale: String },
    /// Verification failed or could not complete; manual control required
    Locked { reason: String },
}

impl Directive {
    pub fn authorized(route: impl Into<String>, safe_octant: Octant) -> Self {
        Directive::Authorized {
            route: route.into(),
            rationale: rationale_for(safe_octant),
        }
    }

    pub fn locked(reason: impl Into<String>) -> Self {
        Directive::Locked {
            reason: reason.into(),
        }
    }

    pub fn is_authorized(&self) -> bool {
        matches!(self, Directive::Authorized { .. })
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Directive::Locked { .. })
    }

    /// Authorized route text, if any
    pub fn route(&self) -> Option<&str> {
        match self {
            Directive::Authorized { route, .. } => Some(route),
            Directive::Locked { .. } => None,
        }
    }
}

/// Strategic rationale attached to an authorized route
pub fn rationale_for(safe_octant: Octant) -> String {
    format!(
        "Atmospheric data indicates wind source from {}. Proceeding via this route maintains separation from the advancing thermal front.",
        safe_octant
    )
}
