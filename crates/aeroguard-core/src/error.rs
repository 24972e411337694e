//! Error types for AeroGuard Core
//!
//! Telemetry degradation and auditor rejection are not errors in this crate:
//! the first is absorbed by fallback records, the second is a `Locked`
//! directive. What remains here are configuration and operator-input faults.

use thiserror::Error;

/// Result type alias for AeroGuard operations
pub type Result<T> = std::result::Result<T, AeroGuardError>;

/// Main error type for AeroGuard operations
#[derive(Error, Debug)]
pub enum AeroGuardError {
    /// No sector with this identifier is configured
    #[error("Unknown sector: {0}")]
    UnknownSector(String),

    /// Operator wind override outside its accepted range
    #[error("Invalid wind input: {0}")]
    InvalidWind(String),

    /// Route catalog construction errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Directive produced for a run the session no longer expects
    #[error(
        "Stale run discarded: ticket for sector '{sector}' generation {generation}, \
         session at '{current_sector}' generation {current_generation}"
    )]
    StaleRun {
        sector: String,
        generation: u64,
        current_sector: String,
        current_generation: u64,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parse errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        source: Box<AeroGuardError>,
    },
}

/// Errors raised while building a route catalog
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Unrecognised compass octant: '{0}'")]
    UnknownOctant(String),

    #[error("Duplicate route for octant {0}")]
    DuplicateOctant(String),
}

impl AeroGuardError {
    /// Add context to an error
    pub fn context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to a Result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add lazy context to a Result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.context(f()))
    }
}
