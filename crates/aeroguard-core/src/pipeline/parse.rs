//! Pure interpretation of raw completion text

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::catalog::CandidateRoutePair;
use crate::geometry::Octant;

/// Token whose presence (case-insensitive) approves a proposal
pub const APPROVAL_TOKEN: &str = "APPROVED";

lazy_static! {
    static ref OPTION_LABEL: Regex =
        Regex::new(r"(?i)\boption\s+[ab]\b\s*[:.)\-]?\s*")
            .expect("static option-label pattern");
}

/// Auditor outcome after interpretation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditVerdict {
    Approved,
    Rejected,
}

impl AuditVerdict {
    /// Interpret a raw auditor response. Anything without the approval
    /// token, including empty text, is a rejection.
    pub fn from_response(raw: &str) -> Self {
        if is_approved(raw) {
            AuditVerdict::Approved
        } else {
            AuditVerdict::Rejected
        }
    }

    pub fn is_approved(self) -> bool {
        matches!(self, AuditVerdict::Approved)
    }
}

/// Trim surrounding whitespace from a completion
pub fn normalize_response(raw: &str) -> String {
    raw.trim().to_string()
}

/// Case-insensitive containment of the approval token
pub fn is_approved(raw: &str) -> bool {
    raw.trim().to_uppercase().contains(APPROVAL_TOKEN)
}

/// Remove "Option A:" / "Option B:" markers a commander may echo back
pub fn strip_option_labels(text: &str) -> String {
    let stripped = OPTION_LABEL.replace_all(text, "");
    stripped
        .trim()
        .trim_start_matches(|c: char| c == '-' || c == '*' || c.is_whitespace())
        .trim()
        .to_string()
}

/// Whole-token mention of an octant label (hyphenated labels stay intact,
/// so "NORTH" does not match inside "NORTH-EAST")
pub fn mentions_octant(text: &str, octant: Octant) -> bool {
    text.split(|c: char| !(c.is_alphanumeric() || c == '-'))
        .any(|token| token.eq_ignore_ascii_case(octant.name()))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim();
    !needle.is_empty() && haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Containment rule: the proposal names the safe octant or carries the safe
/// route text, and does not carry the unsafe route text. The exact safe route
/// always passes, and the unsafe-route exclusion is skipped when the unsafe
/// route text is part of the safe route text itself.
pub fn references_safe_vector(proposal: &str, candidates: &CandidateRoutePair) -> bool {
    let proposal = proposal.trim();
    let safe_route = candidates.safe_route.trim();
    if !safe_route.is_empty() && proposal.to_lowercase() == safe_route.to_lowercase() {
        return true;
    }

    let points_upwind = mentions_octant(proposal, candidates.safe_octant)
        || contains_ignore_case(proposal, safe_route);
    let unsafe_within_safe = contains_ignore_case(safe_route, &candidates.unsafe_route);
    points_upwind
        && (unsafe_within_safe || !contains_ignore_case(proposal, &candidates.unsafe_route))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RouteCatalog;
    use crate::telemetry::WindObservation;

    fn north_pair() -> CandidateRoutePair {
        let catalog =
            RouteCatalog::new([(Octant::North, "Hwy A"), (Octant::South, "Hwy B")]).unwrap();
        CandidateRoutePair::resolve(&WindObservation::new(0.0, 20.0), &catalog)
    }

    #[test]
    fn test_approval_is_case_insensitive_containment() {
        assert!(is_approved("APPROVED"));
        assert!(is_approved("  approved!! this is correct \n"));
        assert!(is_approved("Verdict: Approved."));
        assert!(!is_approved("REJECTED - wrong direction"));
        assert!(!is_approved(""));
        assert!(!is_approved("APPROVE"));
        assert_eq!(AuditVerdict::from_response("   "), AuditVerdict::Rejected);
    }

    #[test]
    fn test_strip_option_labels() {
        assert_eq!(strip_option_labels("OPTION A: Hwy A"), "Hwy A");
        assert_eq!(strip_option_labels("option b: Hwy B"), "Hwy B");
        assert_eq!(strip_option_labels("- Option A - Hwy A "), "Hwy A");
        assert_eq!(strip_option_labels("Hwy A"), "Hwy A");
        assert_eq!(
            strip_option_labels("CA-2 South towards Glendale"),
            "CA-2 South towards Glendale"
        );
    }

    #[test]
    fn test_mentions_octant_whole_token() {
        assert!(mentions_octant("evacuate north now", Octant::North));
        assert!(mentions_octant("Head NORTH-EAST.", Octant::NorthEast));
        assert!(!mentions_octant("Head NORTH-EAST.", Octant::North));
        assert!(!mentions_octant("Northbound traffic", Octant::North));
    }

    #[test]
    fn test_containment_rule() {
        let pair = north_pair();
        assert!(references_safe_vector("Hwy A", &pair));
        assert!(references_safe_vector("Take hwy a toward the NORTH", &pair));
        assert!(references_safe_vector("Evacuate NORTH", &pair));
        assert!(!references_safe_vector("Hwy B", &pair));
        assert!(!references_safe_vector("Hwy A or Hwy B", &pair));
        assert!(!references_safe_vector("", &pair));
    }

    fn pair_with(safe: &str, unsafe_route: &str) -> CandidateRoutePair {
        let catalog =
            RouteCatalog::new([(Octant::North, safe), (Octant::South, unsafe_route)]).unwrap();
        CandidateRoutePair::resolve(&WindObservation::new(0.0, 20.0), &catalog)
    }

    #[test]
    fn test_unsafe_route_nested_in_safe_route() {
        let pair = pair_with("Route 66 North", "Route 66");
        assert!(references_safe_vector("Route 66 North", &pair));
        assert!(references_safe_vector("route 66 north", &pair));
        assert!(!references_safe_vector("Route 66", &pair));
    }

    #[test]
    fn test_same_highway_both_directions() {
        let catalog = RouteCatalog::new([(Octant::East, "I-5"), (Octant::West, "I-5")]).unwrap();
        let pair = CandidateRoutePair::resolve(&WindObservation::new(90.0, 20.0), &catalog);
        assert!(references_safe_vector("I-5", &pair));
        assert!(references_safe_vector("Take I-5 EAST", &pair));
    }

    #[test]
    fn test_safe_route_text_always_passes_rule() {
        let catalog = crate::sector::SectorRegistry::builtin();
        for sector in catalog.iter() {
            for octant in Octant::ALL {
                let pair = CandidateRoutePair::resolve(
                    &WindObservation::new(octant.center_bearing(), 30.0),
                    &sector.routes,
                );
                assert!(
                    references_safe_vector(&pair.safe_route, &pair),
                    "{} {}",
                    sector.id,
                    octant
                );
            }
        }
    }
}
