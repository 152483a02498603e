use anyhow::{anyhow, Context as _, Result};
use asana_client::{AsanaClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use std::fmt;
use std::time::Duration;

pub const ACCESS_TOKEN_ENV: &str = "ASANA_ACCESS_TOKEN";
pub const BASE_URL_ENV: &str = "ASANA_BASE_URL";
pub const TIMEOUT_ENV: &str = "ASANA_TIMEOUT_MS";

/// Process configuration, read once at startup.
#[derive(Clone)]
pub struct ServerConfig {
    pub access_token: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("access_token", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let access_token = non_empty(lookup(ACCESS_TOKEN_ENV))
            .ok_or_else(|| anyhow!("{ACCESS_TOKEN_ENV} must be set to an Asana personal access token"))?;

        let base_url = non_empty(lookup(BASE_URL_ENV))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = match non_empty(lookup(TIMEOUT_ENV)) {
            Some(raw) => {
                let millis: u64 = raw
                    .parse()
                    .with_context(|| format!("{TIMEOUT_ENV} must be a number of milliseconds, got {raw:?}"))?;
                if millis == 0 {
                    anyhow::bail!("{TIMEOUT_ENV} must be greater than zero");
                }
                Duration::from_millis(millis)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            access_token,
            base_url,
            timeout,
        })
    }

    pub fn client_config(&self) -> AsanaClientConfig {
        AsanaClientConfig {
            access_token: self.access_token.clone(),
            base_url: self.base_url.clone(),
            timeout: self.timeout,
        }
    }
}
