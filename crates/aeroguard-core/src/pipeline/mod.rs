//! Decision Pipeline - Commander proposes, Auditor verifies, gate decides
//!
//! Every run starts at `Idle` and walks
//! `Idle -> Proposed -> Audited(verdict) -> Final(Authorized | Locked)`.
//! The two completion calls run strictly in sequence and there is no retry:
//! a rejected audit is final for the cycle. Any failure of the completion
//! capability, and an elapsed cycle timeout, end in `Locked`.

pub mod directive;
pub mod parse;
pub mod prompts;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::catalog::CandidateRoutePair;
use crate::completion::TextCompletion;
use crate::sector::Sector;
use crate::telemetry::WindObservation;

pub use directive::Directive;
pub use parse::AuditVerdict;

/// Pipeline tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Upper bound for the whole two-call cycle; `None` or 0 disables it
    pub timeout_secs: Option<u64>,
    /// Re-check an approved proposal with the local containment rule
    pub strict_audit: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timeout_secs: Some(120),
            strict_audit: false,
        }
    }
}

impl PipelineConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

/// Terminal state of a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinalState {
    Authorized,
    Locked,
}

/// Pipeline states in the order a run visits them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "result", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelinePhase {
    Idle,
    Proposed,
    Audited(AuditVerdict),
    Final(FinalState),
}

/// Full record of one decision cycle
#[derive(Debug, Clone, Serialize)]
pub struct DecisionOutcome {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub sector_id: String,
    pub wind: WindObservation,
    pub candidates: CandidateRoutePair,
    /// Trimmed Commander response
    pub proposal: Option<String>,
    /// Trimmed Auditor response
    pub audit_response: Option<String>,
    pub verdict: Option<AuditVerdict>,
    pub trail: Vec<PipelinePhase>,
    pub directive: Directive,
}

/// Mutable bookkeeping for a single run
struct Cycle {
    run_id: Uuid,
    wind: WindObservation,
    candidates: CandidateRoutePair,
    proposal: Option<String>,
    audit_response: Option<String>,
    verdict: Option<AuditVerdict>,
    trail: Vec<PipelinePhase>,
}

impl Cycle {
    fn new(wind: WindObservation, candidates: CandidateRoutePair) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            wind,
            candidates,
            proposal: None,
            audit_response: None,
            verdict: None,
            trail: vec![PipelinePhase::Idle],
        }
    }

    fn proposed(&mut self, proposal: String) {
        self.proposal = Some(proposal);
        self.trail.push(PipelinePhase::Proposed);
    }

    fn audited(&mut self, response: String, verdict: AuditVerdict) {
        self.audit_response = Some(response);
        self.verdict = Some(verdict);
        self.trail.push(PipelinePhase::Audited(verdict));
    }

    fn finish(&mut self, directive: Directive) -> Directive {
        let state = if directive.is_authorized() {
            FinalState::Authorized
        } else {
            FinalState::Locked
        };
        self.trail.push(PipelinePhase::Final(state));
        directive
    }
}

/// Gate an audited proposal into a directive. Pure; the only place an
/// `Authorized` directive is constructed.
pub fn finalize(
    candidates: &CandidateRoutePair,
    proposal: &str,
    audit_response: &str,
    strict_audit: bool,
) -> Directive {
    if !AuditVerdict::from_response(audit_response).is_approved() {
        if audit_response.trim().is_empty() {
            return Directive::locked("REJECTED (empty auditor response)");
        }
        return Directive::locked(audit_response.trim());
    }

    let route = parse::strip_option_labels(proposal);
    if route.is_empty() {
        return Directive::locked("Auditor approved an empty proposal");
    }
    if strict_audit && !parse::references_safe_vector(&route, candidates) {
        return Directive::locked(format!(
            "Approved proposal \"{}\" does not reference the {} vector",
            route, candidates.safe_octant
        ));
    }

    Directive::authorized(route, candidates.safe_octant)
}

/// Propose-then-verify orchestrator over an injected completion capability
#[derive(Debug, Clone)]
pub struct DecisionPipeline {
    completion: Arc<dyn TextCompletion>,
    config: PipelineConfig,
}

impl DecisionPipeline {
    pub fn new(completion: Arc<dyn TextCompletion>) -> Self {
        Self {
            completion,
            config: PipelineConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PipelineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run one fresh decision cycle for a sector under the given wind
    pub async fn run(&self, sector: &Sector, wind: WindObservation) -> DecisionOutcome {
        let started_at = Utc::now();
        let candidates = CandidateRoutePair::resolve(&wind, &sector.routes);
        let mut cycle = Cycle::new(wind, candidates);

        info!(
            run_id = %cycle.run_id,
            sector = %sector.id,
            bearing = wind.bearing_degrees(),
            safe = %cycle.candidates.safe_octant,
            "Decision cycle started"
        );

        let directive = match self.config.timeout() {
            Some(limit) => {
                let result = tokio::time::timeout(limit, self.drive(&mut cycle)).await;
                match result {
                    Ok(directive) => directive,
                    Err(_) => {
                        warn!(run_id = %cycle.run_id, ?limit, "Decision cycle timed out");
                        cycle.finish(Directive::locked(format!(
                            "Decision cycle timed out after {}s",
                            limit.as_secs()
                        )))
                    }
                }
            }
            None => self.drive(&mut cycle).await,
        };

        info!(
            run_id = %cycle.run_id,
            authorized = directive.is_authorized(),
            "Decision cycle finished"
        );

        DecisionOutcome {
            run_id: cycle.run_id,
            started_at,
            sector_id: sector.id.clone(),
            wind: cycle.wind,
            candidates: cycle.candidates,
            proposal: cycle.proposal,
            audit_response: cycle.audit_response,
            verdict: cycle.verdict,
            trail: cycle.trail,
            directive,
        }
    }

    async fn drive(&self, cycle: &mut Cycle) -> Directive {
        // IDLE -> PROPOSED
        let prompt = prompts::commander_prompt(&cycle.wind, &cycle.candidates);
        debug!(run_id = %cycle.run_id, %prompt, "Commander prompt");
        let proposal = match self.completion.complete(&prompt).await {
            Ok(raw) => parse::normalize_response(&raw),
            Err(err) => {
                warn!(
                    run_id = %cycle.run_id,
                    provider = self.completion.name(),
                    error = %err,
                    "Commander call failed"
                );
                return cycle.finish(Directive::locked(format!("Commander unavailable: {err}")));
            }
        };
        info!(run_id = %cycle.run_id, %proposal, "Commander proposal received");
        cycle.proposed(proposal.clone());

        // PROPOSED -> AUDITED
        let prompt = prompts::auditor_prompt(&proposal, &cycle.candidates);
        debug!(run_id = %cycle.run_id, %prompt, "Auditor prompt");
        let audit_response = match self.completion.complete(&prompt).await {
            Ok(raw) => parse::normalize_response(&raw),
            Err(err) => {
                warn!(
                    run_id = %cycle.run_id,
                    provider = self.completion.name(),
                    error = %err,
                    "Auditor call failed"
                );
                return cycle.finish(Directive::locked(format!("Auditor unavailable: {err}")));
            }
        };
        let verdict = AuditVerdict::from_response(&audit_response);
        if verdict.is_approved() {
            info!(run_id = %cycle.run_id, "Auditor approved proposal");
        } else {
            warn!(
                run_id = %cycle.run_id,
                response = %audit_response,
                "Auditor rejected proposal"
            );
        }
        cycle.audited(audit_response.clone(), verdict);

        // AUDITED -> FINAL
        let directive = finalize(
            &cycle.candidates,
            &proposal,
            &audit_response,
            self.config.strict_audit,
        );
        cycle.finish(directive)
    }
}
