pub mod ollama;
pub mod openai_compatible;

pub use ollama::OllamaClient;
pub use openai_compatible::OpenAICompatibleClient;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use aeroguard_core::TextCompletion;

/// Text-completion provider selection, `type`-tagged in TOML
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderConfig {
    Ollama {
        model: Option<String>,
        base_url: Option<String>,
        temperature: Option<f64>,
        max_tokens: Option<u32>,
        timeout_secs: Option<u64>,
    },
    #[serde(rename = "openai_compatible")]
    OpenAICompatible {
        name: Option<String>,
        api_key: Option<String>,
        api_key_env: Option<String>,
        base_url: String,
        model: String,
        temperature: Option<f64>,
        max_tokens: Option<u32>,
        timeout_secs: Option<u64>,
        headers: Option<HashMap<String, String>>,
    },
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig::Ollama {
            model: None,
            base_url: None,
            temperature: None,
            max_tokens: None,
            timeout_secs: None,
        }
    }
}

fn resolve_api_key(api_key: &Option<String>, api_key_env: &Option<String>) -> Option<String> {
    if let Some(key) = api_key.as_ref().filter(|k| !k.trim().is_empty()) {
        return Some(key.clone());
    }
    let env_name = api_key_env.as_ref()?;
    dotenvy::var(env_name).ok().filter(|k| !k.trim().is_empty())
}

/// Build the configured completion capability
pub fn build_provider(config: &ProviderConfig) -> Result<Arc<dyn TextCompletion>> {
    match config {
        ProviderConfig::Ollama {
            model,
            base_url,
            temperature,
            max_tokens,
            timeout_secs,
        } => {
            let mut client = OllamaClient::new(
                base_url.as_deref().unwrap_or(ollama::DEFAULT_OLLAMA_URL),
                model.as_deref().unwrap_or(ollama::DEFAULT_OLLAMA_MODEL),
            )
            .with_temperature(temperature.unwrap_or(0.0));
            if let Some(max_tokens) = max_tokens {
                client = client.with_max_tokens(*max_tokens);
            }
            if let Some(secs) = timeout_secs {
                client = client.with_timeout(Duration::from_secs(*secs));
            }
            tracing::info!(model = client.model(), "Configured Ollama provider");
            Ok(Arc::new(client))
        }
        ProviderConfig::OpenAICompatible {
            name,
            api_key,
            api_key_env,
            base_url,
            model,
            temperature,
            max_tokens,
            timeout_secs,
            headers,
        } => {
            if base_url.trim().is_empty() {
                anyhow::bail!("openai_compatible provider requires a base_url");
            }
            let api_key = resolve_api_key(api_key, api_key_env);
            if api_key.is_none() {
                if let Some(env_name) = api_key_env {
                    tracing::warn!(env = %env_name, "API key environment variable is not set");
                }
            }
            let mut client = OpenAICompatibleClient::new(
                name.clone().unwrap_or_else(|| "openai_compatible".to_string()),
                api_key,
                base_url.clone(),
                model.clone(),
            )
            .with_temperature(temperature.unwrap_or(0.0));
            if let Some(max_tokens) = max_tokens {
                client = client.with_max_tokens(*max_tokens);
            }
            if let Some(secs) = timeout_secs {
                client = client.with_timeout(Duration::from_secs(*secs));
            }
            for (key, value) in headers.iter().flatten() {
                client = client.with_header(key.clone(), value.clone());
            }
            tracing::info!(provider = %client.name, "Configured OpenAI-compatible provider");
            Ok(Arc::new(client))
        }
    }
}

/// Parse a provider table on its own, e.g. from a `[completion]` section
pub fn provider_from_toml(content: &str) -> Result<ProviderConfig> {
    toml::from_str(content).context("Failed to parse completion provider config")
}
