// Outbound queue delivery for completion text

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::sync::Arc;

use chatrelay_llm::TokenProvider;

/// Destination queue for completion replies.
pub const OUTPUT_QUEUE: &str = "outqueue";

/// Token audience for Azure Queue Storage.
pub const STORAGE_SCOPE: &str = "https://storage.azure.com/.default";

const STORAGE_API_VERSION: &str = "2021-12-02";

/// Abstract outbound message sink. The downstream consumer is unspecified;
/// the handler only promises one message per successful invocation.
#[async_trait]
pub trait MessagePublisher: Send + Sync {
    async fn publish(&self, payload: &str) -> Result<()>;
}

/// Publishes messages to an Azure Queue Storage queue over its REST surface,
/// authenticating with bearer tokens scoped to the storage audience.
pub struct StorageQueuePublisher {
    http_client: reqwest::Client,
    queue_url: String,
    provider: Arc<dyn TokenProvider>,
}

impl StorageQueuePublisher {
    /// `service_url` is the account base, e.g.
    /// https://myaccount.queue.core.windows.net
    pub fn new(service_url: &str, provider: Arc<dyn TokenProvider>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            queue_url: format!(
                "{}/{}/messages",
                service_url.trim_end_matches('/'),
                OUTPUT_QUEUE
            ),
            provider,
        }
    }
}

#[async_trait]
impl MessagePublisher for StorageQueuePublisher {
    async fn publish(&self, payload: &str) -> Result<()> {
        let token = self.provider.token().await?;

        // Queue Storage wraps message text in XML, base64-encoded.
        let body = format!(
            "<QueueMessage><MessageText>{}</MessageText></QueueMessage>",
            BASE64.encode(payload)
        );

        let response = self
            .http_client
            .post(&self.queue_url)
            .bearer_auth(token)
            .header("x-ms-version", STORAGE_API_VERSION)
            .header("content-type", "application/xml")
            .body(body)
            .send()
            .await
            .context("Failed to send queue message")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Queue storage error ({}): {}", status, error_text);
        }

        tracing::debug!(queue = OUTPUT_QUEUE, "Enqueued completion text");
        Ok(())
    }
}
