//! AeroGuard Core - propose/verify decision engine for wildfire evacuation routing
//!
//! Given a sector, a wind observation and the sector's route catalog, AeroGuard
//! proposes an upwind evacuation route and then independently verifies that the
//! proposal points toward the wind source before anything is shown to an
//! operator. When the two stages disagree, or verification cannot complete, the
//! recommendation is locked.
//!
//! # Architecture
//!
//! 1. **Direction Resolver** (`geometry`): bearing -> compass octant, antipodes
//! 2. **Route Catalog** (`catalog`): octant -> named route, with total fallback
//! 3. **Telemetry records** (`telemetry`): wind and fire observation shapes
//! 4. **Decision Pipeline** (`pipeline`): Commander -> Auditor -> gated `Directive`
//! 5. **Operator Session** (`session`): standby/active state and stale-run guard
//!
//! # Quick Start
//!
//! ```
//! use aeroguard_core::{octant_of, route_for, Octant, SectorRegistry};
//!
//! let registry = SectorRegistry::builtin();
//! let sector = registry.get("angeles").unwrap();
//!
//! let safe = octant_of(270.0);
//! assert_eq!(safe, Octant::West);
//! assert_eq!(
//!     route_for(&sector.routes, safe),
//!     "Big Tujunga Canyon Rd towards Sunland"
//! );
//! ```

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations, clippy::all)]

pub mod catalog;
pub mod completion;
pub mod error;
pub mod geometry;
pub mod pipeline;
pub mod sector;
pub mod session;
pub mod telemetry;

pub use catalog::{fallback_route, route_for, CandidateRoutePair, RouteCatalog};
pub use completion::TextCompletion;
pub use error::{AeroGuardError, CatalogError, Result, ResultExt};
pub use geometry::{normalize_bearing, octant_of, opposite, Octant};
pub use pipeline::{
    AuditVerdict, DecisionOutcome, DecisionPipeline, Directive, FinalState, PipelineConfig,
    PipelinePhase,
};
pub use sector::{Sector, SectorRegistry};
pub use session::{OperatorSession, RunTicket, SessionMode};
pub use telemetry::{FireObservation, ObservationSource, WindObservation};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
