use serde::Deserialize;

use crate::error::ProviderError;
use crate::truenas::TrueNasClient;

pub const BASE_URL_ENV: &str = "TRUENAS_BASE_URL";
pub const API_KEY_ENV: &str = "TRUENAS_API_KEY";

/// Connection settings for the TrueNAS API.
#[derive(Clone, Deserialize)]
pub struct ProviderConfig {
    /// API root including the version prefix, e.g. `https://nas.local/api/v2.0`.
    pub base_url: String,
    pub api_key: String,
}

impl ProviderConfig {
    pub fn new(base_url: Option<String>, api_key: Option<String>) -> Result<Self, ProviderError> {
        let base_url = base_url.ok_or_else(|| {
            ProviderError::Config(format!(
                "No base URL provided. Set {} or use --base-url flag",
                BASE_URL_ENV
            ))
        })?;
        let api_key = api_key.ok_or_else(|| {
            ProviderError::Config(format!(
                "No API key provided. Set {} or use --api-key flag",
                API_KEY_ENV
            ))
        })?;

        let config = Self { base_url, api_key };
        config.validate()?;
        Ok(config)
    }

    /// Decodes a provider configuration block.
    pub fn from_json(value: serde_json::Value) -> Result<Self, ProviderError> {
        let config: Self = serde_json::from_value(value)
            .map_err(|e| ProviderError::Config(format!("invalid provider block: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.api_key.trim().is_empty() {
            return Err(ProviderError::Config("api_key must not be empty".to_string()));
        }

        let base_url = self.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(ProviderError::Config(format!(
                "base_url must be an http(s) URL, got '{}'",
                self.base_url
            )));
        }

        Ok(())
    }

    pub fn client(&self) -> Result<TrueNasClient, ProviderError> {
        Ok(TrueNasClient::new(self.base_url.trim(), &self.api_key)?)
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}
