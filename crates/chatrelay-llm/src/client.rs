// Azure OpenAI chat completion client (HTTP direct, no SDK)

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};

use crate::credential::Credential;
use crate::traits::ChatClient;
use crate::types::Message;

/// API version pinned for every request.
pub const DEFAULT_API_VERSION: &str = "2024-03-01-preview";

/// Azure OpenAI client.
///
/// Azure differs from plain OpenAI in endpoint structure and authentication:
/// - URL: https://{resource}.openai.azure.com/openai/deployments/{deployment}/...
/// - Auth: either an `api-key` header or `Authorization: Bearer` with an
///   Entra ID token, depending on the resolved credential
#[derive(Debug)]
pub struct AzureChatClient {
    http_client: reqwest::Client,
    endpoint: String,
    deployment: String,
    api_version: String,
    credential: Credential,
}

impl AzureChatClient {
    /// Create a new client with the builder pattern.
    pub fn builder() -> AzureChatClientBuilder {
        AzureChatClientBuilder::default()
    }

    fn build_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }

    /// Attach the active credential to an outgoing request. Bearer tokens are
    /// fetched fresh from the provider on every call.
    async fn authorize(&self, request: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        match &self.credential {
            Credential::ApiKey(key) => Ok(request.header("api-key", key)),
            Credential::Bearer(provider) => {
                let token = provider.token().await?;
                Ok(request.bearer_auth(token))
            }
        }
    }
}

#[async_trait]
impl ChatClient for AzureChatClient {
    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        n: u32,
    ) -> Result<String> {
        let payload = ChatCompletionRequest {
            messages: vec![Message::system(system_prompt), Message::user(user_prompt)],
            temperature,
            n,
        };

        let url = self.build_url();
        tracing::debug!(deployment = %self.deployment, "Sending chat completion request");

        let request = self.http_client.post(&url).json(&payload);
        let response = self
            .authorize(request)
            .await?
            .send()
            .await
            .context("Failed to send request")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Azure OpenAI API error ({}): {}", status, error_text);
        }

        let raw: ChatCompletionResponse = response
            .json()
            .await
            .context("Failed to parse response")?;

        // An empty candidate list means the service returned nothing usable;
        // surface that instead of silently producing an empty reply.
        let choice = raw
            .choices
            .into_iter()
            .next()
            .context("Response contained no completion candidates")?;

        Ok(choice.message.content.unwrap_or_default())
    }
}

/// Builder for [`AzureChatClient`].
#[derive(Default)]
pub struct AzureChatClientBuilder {
    resource_name: Option<String>,
    endpoint: Option<String>,
    deployment: Option<String>,
    api_version: Option<String>,
    credential: Option<Credential>,
}

impl AzureChatClientBuilder {
    /// Set the Azure OpenAI resource name. The endpoint becomes
    /// `https://{resource}.openai.azure.com`.
    pub fn resource_name(mut self, resource_name: impl Into<String>) -> Self {
        self.resource_name = Some(resource_name.into());
        self
    }

    /// Override the full endpoint base URL. Takes precedence over
    /// `resource_name`; used to point the client at a stub server in tests.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the deployment name answering completion requests.
    pub fn deployment(mut self, deployment: impl Into<String>) -> Self {
        self.deployment = Some(deployment.into());
        self
    }

    /// Override the pinned API version.
    pub fn api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    pub fn credential(mut self, credential: Credential) -> Self {
        self.credential = Some(credential);
        self
    }

    pub fn build(self) -> Result<AzureChatClient> {
        let endpoint = match (self.endpoint, self.resource_name) {
            (Some(endpoint), _) => endpoint.trim_end_matches('/').to_string(),
            (None, Some(resource)) => format!("https://{}.openai.azure.com", resource),
            (None, None) => anyhow::bail!("Endpoint or resource name is required"),
        };
        let deployment = self.deployment.context("Deployment name is required")?;
        let credential = self.credential.context("Credential is required")?;
        let api_version = self
            .api_version
            .unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(AzureChatClient {
            http_client,
            endpoint,
            deployment,
            api_version,
            credential,
        })
    }
}

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    messages: Vec<Message>,
    temperature: f32,
    n: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}
