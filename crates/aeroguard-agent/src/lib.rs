//! AeroGuard Agent - network edges for the decision engine
//!
//! Text-completion providers (Ollama, OpenAI-compatible) behind the core
//! `TextCompletion` seam, and the telemetry gateway for FIRMS hotspots and
//! Open-Meteo wind.

#![deny(unsafe_code)]
#![warn(rust_2018_idioms, missing_debug_implementations)]

pub mod providers;
pub mod telemetry;

pub use providers::{
    build_provider, provider_from_toml, OllamaClient, OpenAICompatibleClient, ProviderConfig,
};
pub use telemetry::{TelemetryConfig, TelemetryGateway};
