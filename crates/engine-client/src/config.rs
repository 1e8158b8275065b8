//! Engine connection configuration.
//!
//! Resolved once at process startup and passed into [`EngineClient`]; the
//! client never reads environment variables itself.
//!
//! [`EngineClient`]: crate::EngineClient

use std::time::Duration;

use crate::{EngineError, EngineResult};

/// Default base URL of the diagnosis engine API.
pub const DEFAULT_ENGINE_BASE_URL: &str = "https://api.infermedica.com/v3";

/// Default inference model requested from the engine.
pub const DEFAULT_ENGINE_MODEL: &str = "infermedica-en";

/// Default outbound request timeout.
pub const DEFAULT_ENGINE_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the diagnosis engine.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    base_url: String,
    app_id: String,
    app_key: String,
    model: String,
    timeout: Duration,
}

impl EngineConfig {
    /// Create a new `EngineConfig` with the default 30-second timeout.
    ///
    /// A trailing slash on `base_url` is trimmed so path joining stays
    /// predictable.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the base URL, credentials,
    /// or model name are blank.
    pub fn new(
        base_url: impl Into<String>,
        app_id: impl Into<String>,
        app_key: impl Into<String>,
        model: impl Into<String>,
    ) -> EngineResult<Self> {
        let base_url = base_url.into();
        let app_id = app_id.into();
        let app_key = app_key.into();
        let model = model.into();

        if base_url.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "engine base URL cannot be empty".into(),
            ));
        }
        if app_id.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "engine app id cannot be empty".into(),
            ));
        }
        if app_key.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "engine app key cannot be empty".into(),
            ));
        }
        if model.trim().is_empty() {
            return Err(EngineError::InvalidConfig(
                "engine model cannot be empty".into(),
            ));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            app_id,
            app_key,
            model,
            timeout: DEFAULT_ENGINE_TIMEOUT,
        })
    }

    /// Override the outbound request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn app_key(&self) -> &str {
        &self.app_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_trailing_slash_from_base_url() {
        let config = EngineConfig::new("https://engine.example/v3/", "id", "key", "model")
            .expect("valid config");
        assert_eq!(config.base_url(), "https://engine.example/v3");
    }

    #[test]
    fn defaults_to_thirty_second_timeout() {
        let config =
            EngineConfig::new("https://engine.example/v3", "id", "key", "model").expect("config");
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn rejects_blank_credentials() {
        assert!(EngineConfig::new("https://engine.example/v3", " ", "key", "model").is_err());
        assert!(EngineConfig::new("https://engine.example/v3", "id", "", "model").is_err());
        assert!(EngineConfig::new("", "id", "key", "model").is_err());
        assert!(EngineConfig::new("https://engine.example/v3", "id", "key", " ").is_err());
    }
}
