//! End-to-end decision cycles over scripted completion capabilities

use aeroguard_core::pipeline::parse::references_safe_vector;
use aeroguard_core::{
    AuditVerdict, CandidateRoutePair, DecisionPipeline, Directive, FinalState, Octant,
    OperatorSession, PipelineConfig, PipelinePhase, RouteCatalog, Sector, SectorRegistry,
    TextCompletion, WindObservation,
};
use anyhow::{anyhow, Result};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, Notify};
use tokio::time::{sleep, Duration};

/// Replays canned responses in order and records every prompt it sees
#[derive(Debug)]
struct ScriptedCompletion {
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedCompletion {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| Ok(r.to_string())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn failing_after(responses: &[&str], error: &str) -> Self {
        let scripted = Self::new(responses);
        scripted
            .responses
            .try_lock()
            .expect("fresh mutex")
            .push_back(Err(error.to_string()));
        scripted
    }

    async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }
}

#[async_trait::async_trait]
impl TextCompletion for ScriptedCompletion {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().await.push(prompt.to_string());
        match self.responses.lock().await.pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(error)) => Err(anyhow!(error)),
            None => Err(anyhow!("script exhausted")),
        }
    }
}

/// Commander answers with a fixed text; Auditor applies the containment rule
/// to whatever the audit prompt carries.
#[derive(Debug)]
struct ProtocolCompletion {
    commander_answer: String,
    candidates: CandidateRoutePair,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl TextCompletion for ProtocolCompletion {
    fn name(&self) -> &str {
        "protocol"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if prompt.contains("[ROLE] Incident Commander") {
            return Ok(format!("  {}\n", self.commander_answer));
        }
        let input = prompt
            .lines()
            .find_map(|line| line.strip_prefix("[INPUT] "))
            .map(|quoted| quoted.trim_matches('"').to_string())
            .ok_or_else(|| anyhow!("audit prompt without input"))?;
        if references_safe_vector(&input, &self.candidates) {
            Ok("APPROVED".to_string())
        } else {
            Ok("REJECTED".to_string())
        }
    }
}

/// Never answers within a reasonable time
#[derive(Debug)]
struct StalledCompletion;

#[async_trait::async_trait]
impl TextCompletion for StalledCompletion {
    fn name(&self) -> &str {
        "stalled"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        sleep(Duration::from_secs(30)).await;
        Ok("APPROVED".to_string())
    }
}

/// Parks the first call until released, then delegates
#[derive(Debug)]
struct GatedCompletion {
    inner: Arc<ProtocolCompletion>,
    started: Notify,
    release: Notify,
    opened: AtomicBool,
}

impl GatedCompletion {
    fn new(inner: Arc<ProtocolCompletion>) -> Self {
        Self {
            inner,
            started: Notify::new(),
            release: Notify::new(),
            opened: AtomicBool::new(false),
        }
    }
}

#[async_trait::async_trait]
impl TextCompletion for GatedCompletion {
    fn name(&self) -> &str {
        "gated"
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        if !self.opened.swap(true, Ordering::SeqCst) {
            self.started.notify_one();
            self.release.notified().await;
        }
        self.inner.complete(prompt).await
    }
}

fn north_sector() -> Sector {
    Sector {
        id: "test".to_string(),
        name: "Test Sector".to_string(),
        latitude: 0.0,
        longitude: 0.0,
        default_wind_bearing: 0.0,
        default_wind_speed: 30.0,
        intensity: "400K".to_string(),
        routes: RouteCatalog::new([(Octant::North, "Hwy A"), (Octant::South, "Hwy B")]).unwrap(),
    }
}

fn north_wind() -> WindObservation {
    WindObservation::new(0.0, 30.0)
}

fn protocol(answer: &str) -> Arc<ProtocolCompletion> {
    Arc::new(ProtocolCompletion {
        commander_answer: answer.to_string(),
        candidates: CandidateRoutePair::resolve(&north_wind(), &north_sector().routes),
        calls: AtomicUsize::new(0),
    })
}

#[tokio::test]
async fn e2e_correct_proposal_is_authorized() {
    let completion = protocol("Hwy A");
    let pipeline = DecisionPipeline::new(completion.clone());

    let outcome = pipeline.run(&north_sector(), north_wind()).await;

    match &outcome.directive {
        Directive::Authorized { route, rationale } => {
            assert_eq!(route, "Hwy A");
            assert!(rationale.contains("NORTH"));
        }
        other => panic!("expected authorization, got {other:?}"),
    }
    assert_eq!(outcome.proposal.as_deref(), Some("Hwy A"));
    assert_eq!(outcome.verdict, Some(AuditVerdict::Approved));
    assert_eq!(
        outcome.trail,
        vec![
            PipelinePhase::Idle,
            PipelinePhase::Proposed,
            PipelinePhase::Audited(AuditVerdict::Approved),
            PipelinePhase::Final(FinalState::Authorized),
        ]
    );
    assert_eq!(completion.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn e2e_wrong_proposal_is_locked() {
    let completion = protocol("Hwy B");
    let pipeline = DecisionPipeline::new(completion.clone());

    let outcome = pipeline.run(&north_sector(), north_wind()).await;

    assert_eq!(outcome.directive, Directive::locked("REJECTED"));
    assert_eq!(
        outcome.trail.last(),
        Some(&PipelinePhase::Final(FinalState::Locked))
    );
    // No retry after a rejection
    assert_eq!(completion.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn e2e_auditor_sees_commander_output() {
    let scripted = Arc::new(ScriptedCompletion::new(&["  OPTION A: Hwy A ", "APPROVED"]));
    let pipeline = DecisionPipeline::new(scripted.clone());

    let outcome = pipeline.run(&north_sector(), north_wind()).await;

    let prompts = scripted.prompts().await;
    assert_eq!(prompts.len(), 2);
    assert!(prompts[0].contains("OPTION A: Hwy A"));
    assert!(prompts[0].contains("OPTION B: Hwy B"));
    assert!(prompts[1].contains("[INPUT] \"OPTION A: Hwy A\""));
    assert!(prompts[1].contains("[SAFE VECTOR] \"NORTH\""));
    assert_eq!(outcome.directive.route(), Some("Hwy A"));
}

#[tokio::test]
async fn e2e_rejection_reason_is_raw_auditor_text() {
    let scripted = Arc::new(ScriptedCompletion::new(&["Hwy A", "REJECTED - wrong direction"]));
    let outcome = DecisionPipeline::new(scripted)
        .run(&north_sector(), north_wind())
        .await;

    assert_eq!(
        outcome.directive,
        Directive::locked("REJECTED - wrong direction")
    );
    assert_eq!(outcome.verdict, Some(AuditVerdict::Rejected));
}

#[tokio::test]
async fn e2e_loose_approval_is_accepted() {
    let scripted = Arc::new(ScriptedCompletion::new(&["Hwy A", "approved!! this is correct"]));
    let outcome = DecisionPipeline::new(scripted)
        .run(&north_sector(), north_wind())
        .await;

    assert!(outcome.directive.is_authorized());
}

#[tokio::test]
async fn e2e_commander_failure_fails_closed() {
    let scripted = Arc::new(ScriptedCompletion::failing_after(&[], "connection refused"));
    let outcome = DecisionPipeline::new(scripted.clone())
        .run(&north_sector(), north_wind())
        .await;

    match &outcome.directive {
        Directive::Locked { reason } => assert!(reason.contains("connection refused")),
        other => panic!("expected lockdown, got {other:?}"),
    }
    assert!(outcome.proposal.is_none());
    assert_eq!(
        outcome.trail,
        vec![PipelinePhase::Idle, PipelinePhase::Final(FinalState::Locked)]
    );
    assert_eq!(scripted.prompts().await.len(), 1);
}

#[tokio::test]
async fn e2e_auditor_failure_fails_closed() {
    let scripted = Arc::new(ScriptedCompletion::failing_after(&["Hwy A"], "model crashed"));
    let outcome = DecisionPipeline::new(scripted)
        .run(&north_sector(), north_wind())
        .await;

    assert!(outcome.directive.is_locked());
    assert_eq!(outcome.proposal.as_deref(), Some("Hwy A"));
    assert!(outcome.verdict.is_none());
}

#[tokio::test]
async fn e2e_empty_auditor_response_locks() {
    let scripted = Arc::new(ScriptedCompletion::new(&["Hwy A", "   "]));
    let outcome = DecisionPipeline::new(scripted)
        .run(&north_sector(), north_wind())
        .await;

    assert!(outcome.directive.is_locked());
}

#[tokio::test]
async fn e2e_cycle_timeout_locks() {
    let config = PipelineConfig {
        timeout_secs: Some(1),
        strict_audit: false,
    };
    let stalled = Arc::new(StalledCompletion);
    let pipeline = DecisionPipeline::new(stalled).with_config(config);

    let outcome = pipeline.run(&north_sector(), north_wind()).await;

    match &outcome.directive {
        Directive::Locked { reason } => assert!(reason.contains("timed out")),
        other => panic!("expected lockdown, got {other:?}"),
    }
}

#[tokio::test]
async fn e2e_strict_audit_catches_careless_auditor() {
    let scripted = Arc::new(ScriptedCompletion::new(&["Hwy B", "APPROVED"]));
    let pipeline = DecisionPipeline::new(scripted).with_config(PipelineConfig {
        timeout_secs: None,
        strict_audit: true,
    });

    let outcome = pipeline.run(&north_sector(), north_wind()).await;

    assert!(outcome.directive.is_locked());
    assert_eq!(outcome.verdict, Some(AuditVerdict::Approved));
}

#[tokio::test]
async fn e2e_repeated_runs_are_identical() {
    let pipeline = DecisionPipeline::new(protocol("Hwy A"));

    let first = pipeline.run(&north_sector(), north_wind()).await;
    let second = pipeline.run(&north_sector(), north_wind()).await;

    assert_eq!(first.directive, second.directive);
    assert_ne!(first.run_id, second.run_id);
}

#[tokio::test]
async fn e2e_builtin_sector_with_faithful_commander() {
    let registry = SectorRegistry::builtin();
    let sector = registry.get("blue-mountains").unwrap();
    let wind = WindObservation::new(sector.default_wind_bearing, sector.default_wind_speed);
    let candidates = CandidateRoutePair::resolve(&wind, &sector.routes);

    let completion = Arc::new(ProtocolCompletion {
        commander_answer: candidates.safe_route.clone(),
        candidates: candidates.clone(),
        calls: AtomicUsize::new(0),
    });
    let outcome = DecisionPipeline::new(completion).run(sector, wind).await;

    assert_eq!(candidates.safe_octant, Octant::East);
    assert_eq!(
        outcome.directive.route(),
        Some("M4 Motorway towards Sydney")
    );
}

#[tokio::test]
async fn e2e_sector_switch_discards_in_flight_directive() {
    let registry = SectorRegistry::builtin();
    let gated = Arc::new(GatedCompletion::new(protocol("Hwy A")));
    let pipeline = DecisionPipeline::new(gated.clone());

    let mut session = OperatorSession::new("test");
    let ticket = session.trigger();

    let sector = north_sector();
    let running = tokio::spawn(async move {
        pipeline.run(&sector, north_wind()).await
    });

    // Commander call is now parked; operator switches sector mid-run
    gated.started.notified().await;
    assert!(session.is_current(&ticket));
    assert!(session.select_sector(&registry.get("attica").unwrap().id));
    gated.release.notify_one();

    let outcome = running.await.unwrap();
    assert_eq!(outcome.directive.route(), Some("Hwy A"));
    assert!(session.deliver(&ticket, outcome.directive.clone()).is_err());
    assert!(session.last_directive().is_none());

    // A fresh run on the new sector is accepted
    let fresh = session.trigger();
    assert!(session.deliver(&fresh, outcome.directive).is_ok());
}
