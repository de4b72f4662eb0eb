// Environment-backed configuration for the chat client and its delivery surfaces

use anyhow::{anyhow, Result};

/// Environment variable holding the Azure OpenAI resource (service) name.
pub const SERVICE_VAR: &str = "AZURE_OPENAI_SERVICE";
/// Environment variable holding the chat deployment name.
pub const DEPLOYMENT_VAR: &str = "AZURE_OPENAI_GPT_DEPLOYMENT";
/// Environment variable holding the optional static API key.
pub const API_KEY_VAR: &str = "AZURE_OPENAI_API_KEY";
/// Environment variable holding the optional managed-identity client id.
pub const MSI_ID_VAR: &str = "AZURE_MSI_ID";

/// Resolved process configuration, loaded once at startup and passed by
/// reference into each component. Immutable after construction.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Azure OpenAI resource name, e.g. "my-resource" in
    /// https://my-resource.openai.azure.com
    pub service: String,
    /// Deployment name answering completion requests.
    pub deployment: String,
    /// Static API key. When present it wins over managed identity.
    pub api_key: Option<String>,
    /// Managed-identity client id, forwarded to the credential chain.
    pub client_id: Option<String>,
}

impl Settings {
    /// Load settings from the process environment.
    ///
    /// Missing service or deployment is a fatal precondition: callers are
    /// expected to log the error and terminate rather than continue degraded.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through a lookup closure. Lets tests supply a fixed
    /// environment without touching process state.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let service = require(&lookup, SERVICE_VAR)?;
        let deployment = require(&lookup, DEPLOYMENT_VAR)?;

        Ok(Self {
            service,
            deployment,
            api_key: optional(&lookup, API_KEY_VAR),
            client_id: optional(&lookup, MSI_ID_VAR),
        })
    }
}

fn require<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, name)
        .ok_or_else(|| anyhow!("{} environment variable is empty. See README.", name))
}

// Empty strings count as absent, matching the original falsy-check semantics.
fn optional<F>(lookup: &F, name: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(name).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn load(pairs: &[(&str, &str)]) -> Result<Settings> {
        let map = env(pairs);
        Settings::from_lookup(|name| map.get(name).cloned())
    }

    #[test]
    fn test_full_settings() {
        let settings = load(&[
            (SERVICE_VAR, "my-resource"),
            (DEPLOYMENT_VAR, "gpt-deploy"),
            (API_KEY_VAR, "secret"),
            (MSI_ID_VAR, "msi-123"),
        ])
        .unwrap();

        assert_eq!(settings.service, "my-resource");
        assert_eq!(settings.deployment, "gpt-deploy");
        assert_eq!(settings.api_key.as_deref(), Some("secret"));
        assert_eq!(settings.client_id.as_deref(), Some("msi-123"));
    }

    #[test]
    fn test_optional_fields_absent() {
        let settings = load(&[(SERVICE_VAR, "my-resource"), (DEPLOYMENT_VAR, "gpt")]).unwrap();

        assert!(settings.api_key.is_none());
        assert!(settings.client_id.is_none());
    }

    #[test]
    fn test_missing_service_fails() {
        let result = load(&[(DEPLOYMENT_VAR, "gpt")]);

        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains(SERVICE_VAR));
    }

    #[test]
    fn test_missing_deployment_fails() {
        let result = load(&[(SERVICE_VAR, "my-resource")]);

        assert!(result.is_err());
        assert!(result.err().unwrap().to_string().contains(DEPLOYMENT_VAR));
    }

    #[test]
    fn test_empty_value_counts_as_absent() {
        let result = load(&[(SERVICE_VAR, ""), (DEPLOYMENT_VAR, "gpt")]);

        assert!(result.is_err());
    }
}
