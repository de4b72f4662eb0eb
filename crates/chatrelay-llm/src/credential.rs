// Credential strategy selection: static API key vs managed-identity bearer tokens

use anyhow::{Context, Result};
use async_trait::async_trait;
use azure_core::auth::TokenCredential;
use azure_identity::{DefaultAzureCredential, TokenCredentialOptions};
use std::sync::Arc;

use crate::settings::Settings;

/// Token audience for Azure OpenAI when authenticating with Entra ID.
pub const COGNITIVE_SERVICES_SCOPE: &str = "https://cognitiveservices.azure.com/.default";

/// Produces a bearer token on demand.
///
/// Implementations are expected to hand back a token that is valid right now;
/// caching and refresh are the provider's concern, not the caller's.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    async fn token(&self) -> Result<String>;
}

/// Bearer-token provider backed by the Entra ID default credential chain
/// (environment, workload identity, managed identity, CLI).
pub struct EntraTokenProvider {
    credential: Arc<DefaultAzureCredential>,
    scope: String,
}

impl EntraTokenProvider {
    /// Build a provider for the given audience scope.
    ///
    /// The chain selects which managed identity to authenticate as from
    /// `AZURE_CLIENT_ID`; exporting that variable is the binary's concern,
    /// done once at startup before any provider exists.
    pub fn new(scope: impl Into<String>) -> Result<Self> {
        let credential = DefaultAzureCredential::create(TokenCredentialOptions::default())
            .context("Failed to build Entra ID credential chain")?;

        Ok(Self {
            credential: Arc::new(credential),
            scope: scope.into(),
        })
    }
}

#[async_trait]
impl TokenProvider for EntraTokenProvider {
    async fn token(&self) -> Result<String> {
        let response = self
            .credential
            .get_token(&[self.scope.as_str()])
            .await
            .context("Failed to acquire Entra ID token")?;

        Ok(response.token.secret().to_string())
    }
}

/// The active authentication strategy. Exactly one variant is selected per
/// invocation, based on which settings are present.
#[derive(Clone)]
pub enum Credential {
    /// Static opaque secret, sent as the `api-key` header.
    ApiKey(String),
    /// Short-lived bearer token fetched from the provider on each request.
    Bearer(Arc<dyn TokenProvider>),
}

impl Credential {
    /// Select a strategy from the settings: a configured API key wins,
    /// otherwise fall back to managed-identity token acquisition scoped to
    /// the cognitive-services audience.
    pub fn resolve(settings: &Settings) -> Result<Self> {
        match &settings.api_key {
            Some(key) => {
                tracing::debug!("Authenticating with static API key");
                Ok(Self::ApiKey(key.clone()))
            }
            None => {
                tracing::debug!("Authenticating with managed-identity bearer tokens");
                let provider = EntraTokenProvider::new(COGNITIVE_SERVICES_SCOPE)?;
                Ok(Self::Bearer(Arc::new(provider)))
            }
        }
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("Credential::ApiKey(..)"),
            Self::Bearer(_) => f.write_str("Credential::Bearer(..)"),
        }
    }
}
