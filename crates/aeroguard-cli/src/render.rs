//! Terminal and JSON rendering of directives and telemetry

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde_json::json;

use aeroguard_core::{
    CandidateRoutePair, DecisionOutcome, Directive, FireObservation, Sector, WindObservation,
};

/// Display-only authorization id, `SIM-<unix seconds>`
pub fn authorization_id(at: DateTime<Utc>) -> String {
    format!("SIM-{}", at.timestamp())
}

/// Route text as shown on the action line: upper-cased, option labels dropped
pub fn action_text(route: &str) -> String {
    route
        .to_uppercase()
        .replace("OPTION A:", "")
        .replace("OPTION B:", "")
        .trim()
        .to_string()
}

pub fn directive_card(sector: &Sector, directive: &Directive, authorization: &str) -> String {
    match directive {
        Directive::Authorized { route, rationale } => format!(
            "{}\n  {} {}\n  {} {}\n\n  {} {}\n\n  {} {}\n  {}",
            "EVACUATION ORDER AUTHORIZED".bold().green(),
            "SECTOR:".bold(),
            sector.name,
            "AUTHORIZATION ID:".bold(),
            authorization,
            "ACTION:".bold(),
            action_text(route).bold().white(),
            "STRATEGIC RATIONALE:".bold(),
            rationale,
            "Route verified by AeroGuard Autonomous Safety System.".dimmed()
        ),
        Directive::Locked { reason } => format!(
            "{}\n  The system detected a high-risk logical conflict in the evacuation path.\n  {} {}\n  {} FALLBACK TO MANUAL RADIO COMMAND.",
            "AUTOMATIC SAFETY LOCKDOWN".bold().red(),
            "REASON:".bold(),
            reason.yellow(),
            "ACTION:".bold()
        ),
    }
}

pub fn candidates_block(candidates: &CandidateRoutePair) -> String {
    format!(
        "  {} {} -> {}\n  {} {} -> {}",
        "SAFE  ".green().bold(),
        candidates.safe_octant,
        candidates.safe_route,
        "UNSAFE".red().bold(),
        candidates.unsafe_octant,
        candidates.unsafe_route
    )
}

pub fn wind_line(wind: &WindObservation) -> String {
    format!(
        "{} {:.0}° ({}) at {:.1} km/h",
        "WIND:".bold(),
        wind.bearing_degrees(),
        aeroguard_core::octant_of(wind.bearing_degrees()),
        wind.speed()
    )
}

pub fn fire_line(fire: Option<&FireObservation>) -> String {
    match fire {
        Some(fire) => format!(
            "{} {:.4}, {:.4} at {:.1}K [{}]",
            "FIRE:".bold(),
            fire.latitude,
            fire.longitude,
            fire.brightness,
            fire.source
        ),
        None => format!("{} no qualifying hotspot", "FIRE:".bold()),
    }
}

pub fn outcome_text(sector: &Sector, outcome: &DecisionOutcome, at: DateTime<Utc>) -> String {
    let mut out = String::new();
    out.push_str(&wind_line(&outcome.wind));
    out.push('\n');
    out.push_str(&candidates_block(&outcome.candidates));
    out.push('\n');
    if let Some(proposal) = &outcome.proposal {
        out.push_str(&format!("{} {}\n", "DRAFT STRATEGY:".bold(), proposal));
    }
    if let Some(audit) = &outcome.audit_response {
        out.push_str(&format!("{} {}\n", "AUDIT:".bold(), audit));
    }
    out.push('\n');
    out.push_str(&directive_card(
        sector,
        &outcome.directive,
        &authorization_id(at),
    ));
    out
}

pub fn outcome_json(outcome: &DecisionOutcome, at: DateTime<Utc>) -> serde_json::Value {
    let authorization = outcome
        .directive
        .is_authorized()
        .then(|| authorization_id(at));
    json!({
        "outcome": outcome,
        "authorization_id": authorization,
    })
}
