//! Operator session - explicit control-shell state
//!
//! A session is a plain value owned by whoever drives the operator surface.
//! Every sector change or trigger bumps the run generation, so a directive
//! computed for an earlier generation can never be shown afterwards.

use serde::{Deserialize, Serialize};

use crate::error::{AeroGuardError, Result};
use crate::pipeline::Directive;

/// Whether a decision run is in effect for the active sector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Sector loaded, waiting for command authorization
    Standby,
    /// A run was triggered for the active sector
    Active,
}

/// Proof that a run was started for a given sector and generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunTicket {
    sector_id: String,
    generation: u64,
}

impl RunTicket {
    pub fn sector_id(&self) -> &str {
        &self.sector_id
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Operator-facing session state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorSession {
    sector_id: String,
    mode: SessionMode,
    generation: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    last_directive: Option<Directive>,
}

impl OperatorSession {
    /// Fresh session in standby on a sector
    pub fn new(sector_id: impl Into<String>) -> Self {
        Self {
            sector_id: sector_id.into(),
            mode: SessionMode::Standby,
            generation: 0,
            last_directive: None,
        }
    }

    pub fn sector_id(&self) -> &str {
        &self.sector_id
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Latest directive accepted for the active sector
    pub fn last_directive(&self) -> Option<&Directive> {
        self.last_directive.as_ref()
    }

    /// Switch sectors. A different sector forces standby and invalidates any
    /// run in flight. Returns whether the sector changed.
    pub fn select_sector(&mut self, sector_id: &str) -> bool {
        if self.sector_id == sector_id {
            return false;
        }
        self.sector_id = sector_id.to_string();
        self.reset();
        true
    }

    /// Drop back to standby, invalidating any run in flight
    pub fn reset(&mut self) {
        self.mode = SessionMode::Standby;
        self.generation += 1;
        self.last_directive = None;
    }

    /// Start a run for the active sector. Supersedes any earlier ticket.
    pub fn trigger(&mut self) -> RunTicket {
        self.mode = SessionMode::Active;
        self.generation += 1;
        self.last_directive = None;
        RunTicket {
            sector_id: self.sector_id.clone(),
            generation: self.generation,
        }
    }

    /// Whether a ticket still refers to the current run
    pub fn is_current(&self, ticket: &RunTicket) -> bool {
        self.mode == SessionMode::Active
            && ticket.generation == self.generation
            && ticket.sector_id == self.sector_id
    }

    /// Accept a directive for a ticket. Stale tickets are refused.
    pub fn deliver(&mut self, ticket: &RunTicket, directive: Directive) -> Result<&Directive> {
        if !self.is_current(ticket) {
            return Err(AeroGuardError::StaleRun {
                sector: ticket.sector_id.clone(),
                generation: ticket.generation,
                current_sector: self.sector_id.clone(),
                current_generation: self.generation,
            });
        }
        let shown: &Directive = self.last_directive.insert(directive);
        Ok(shown)
    }
}
