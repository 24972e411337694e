//! Prompt construction for the Commander and Auditor stages

use crate::catalog::CandidateRoutePair;
use crate::telemetry::WindObservation;

/// Proposal request: wind source, resolved safe octant, and the two routes as
/// mutually exclusive options. Option A is always the upwind route.
pub fn commander_prompt(wind: &WindObservation, candidates: &CandidateRoutePair) -> String {
    format!(
        "[ROLE] Incident Commander.\n\
         [TELEMETRY] Wind Source: {bearing:.0}° ({safe}). Wind Speed: {speed:.0} km/h.\n\
         [PROTOCOL] Evacuate UPWIND, towards the wind source.\n\
         [AVAILABLE ROUTES]\n\
         - OPTION A: {safe_route}\n\
         - OPTION B: {unsafe_route}\n\
         \n\
         [TASK] Select the correct evacuation route.\n\
         OUTPUT: Return ONLY the route text of the correct option. Do not include the option label (\"Option A\" or \"Option B\").",
        bearing = wind.bearing_degrees(),
        safe = candidates.safe_octant,
        speed = wind.speed(),
        safe_route = candidates.safe_route,
        unsafe_route = candidates.unsafe_route,
    )
}

/// Audit request: the proposal text judged against the safe vector
pub fn auditor_prompt(proposal: &str, candidates: &CandidateRoutePair) -> String {
    format!(
        "[ROLE] Safety Auditor.\n\
         [INPUT] \"{proposal}\"\n\
         [SAFE VECTOR] \"{safe}\"\n\
         [SAFE ROUTE] \"{safe_route}\"\n\
         \n\
         [LOGIC]\n\
         - Does the input mention \"{safe}\" or the safe route \"{safe_route}\"? -> APPROVED\n\
         - Otherwise -> REJECTED\n\
         \n\
         OUTPUT: Return ONLY \"APPROVED\" or \"REJECTED\".",
        safe = candidates.safe_octant,
        safe_route = candidates.safe_route,
    )
}
