use anyhow::Result;
use async_trait::async_trait;

/// A chat-completion backend: one synchronous (awaited) round trip per call.
///
/// Delivery surfaces depend on this trait rather than the Azure client so
/// tests can substitute a stub backend.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Issue one completion request and return the first candidate's text.
    ///
    /// `n` is the number of candidates the service should generate; only the
    /// first is ever consumed. Transport and API failures propagate unhandled.
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        n: u32,
    ) -> Result<String>;
}
