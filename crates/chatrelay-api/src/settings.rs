use anyhow::{anyhow, Context, Result};

/// Environment variable holding the queue service base URL, e.g.
/// https://myaccount.queue.core.windows.net
pub const QUEUE_SERVICE_URL_VAR: &str = "AZURE_QUEUE_SERVICE_URL";
/// Environment variable overriding the listen port.
pub const PORT_VAR: &str = "PORT";

const DEFAULT_PORT: u16 = 8080;

/// Settings specific to the HTTP delivery surface.
#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub queue_service_url: String,
    pub port: u16,
}

impl ApiSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let queue_service_url = lookup(QUEUE_SERVICE_URL_VAR)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "{} environment variable is empty. See README.",
                    QUEUE_SERVICE_URL_VAR
                )
            })?;

        let port = match lookup(PORT_VAR).filter(|v| !v.is_empty()) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("{} is not a valid port: {}", PORT_VAR, raw))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            queue_service_url: queue_service_url.trim_end_matches('/').to_string(),
            port,
        })
    }
}
