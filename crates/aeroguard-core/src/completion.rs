//! Text-completion seam
//!
//! The pipeline's only non-deterministic dependency. Providers live in the
//! agent crate; tests script responses through the same trait.

use anyhow::Result;
use async_trait::async_trait;

/// Opaque free-text completion capability: prompt in, text out
#[async_trait]
pub trait TextCompletion: Send + Sync + std::fmt::Debug {
    /// Provider label for logs
    fn name(&self) -> &str;

    /// Complete a single prompt. Errors are treated as an unverified stage.
    async fn complete(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: TextCompletion + ?Sized> TextCompletion for std::sync::Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn complete(&self, prompt: &str) -> Result<String> {
        (**self).complete(prompt).await
    }
}
