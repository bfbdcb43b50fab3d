//! Connection settings for one GeoServer instance.

use std::time::Duration;

use reqwest::Url;
use serde::{Deserialize, Serialize};

use ogc_common::{GeoServerError, GeoServerResult};

/// Settings for one logical GeoServer connection.
///
/// Loads from YAML or JSON with the defaults below, or from `GEOSERVER_*`
/// environment variables via [`GeoServerConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoServerConfig {
    /// Absolute URL of the GeoServer root, e.g. `http://localhost:8080/geoserver`.
    pub base_url: String,

    /// Default workspace for unqualified layer names.
    #[serde(default)]
    pub workspace: Option<String>,

    #[serde(default)]
    pub username: Option<String>,

    #[serde(default, skip_serializing)]
    pub password: Option<String>,

    /// Per-attempt request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries after a timed-out attempt. Other failures are never retried.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_max_retries() -> u32 {
    3
}

impl GeoServerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            workspace: None,
            username: None,
            password: None,
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }

    pub fn with_workspace(mut self, workspace: impl Into<String>) -> Self {
        self.workspace = Some(workspace.into());
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Read settings from `GEOSERVER_URL`, `GEOSERVER_WORKSPACE`,
    /// `GEOSERVER_USERNAME`, `GEOSERVER_PASSWORD`, `GEOSERVER_TIMEOUT_MS` and
    /// `GEOSERVER_MAX_RETRIES`. Only the URL is required.
    pub fn from_env() -> GeoServerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> GeoServerResult<Self> {
        let base_url = lookup("GEOSERVER_URL")
            .ok_or_else(|| GeoServerError::InvalidConfig("GEOSERVER_URL is not set".to_string()))?;

        let mut config = Self::new(base_url);
        config.workspace = lookup("GEOSERVER_WORKSPACE");
        config.username = lookup("GEOSERVER_USERNAME");
        config.password = lookup("GEOSERVER_PASSWORD");
        if let Some(raw) = lookup("GEOSERVER_TIMEOUT_MS") {
            config.timeout_ms = parse_number("GEOSERVER_TIMEOUT_MS", &raw)?;
        }
        if let Some(raw) = lookup("GEOSERVER_MAX_RETRIES") {
            config.max_retries = parse_number("GEOSERVER_MAX_RETRIES", &raw)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the client cannot work with.
    pub fn validate(&self) -> GeoServerResult<()> {
        let url = Url::parse(&self.base_url).map_err(|e| {
            GeoServerError::InvalidConfig(format!("base_url '{}': {}", self.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(GeoServerError::InvalidConfig(format!(
                "base_url '{}' must be an absolute http(s) URL",
                self.base_url
            )));
        }
        if self.timeout_ms == 0 {
            return Err(GeoServerError::InvalidConfig(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Basic-auth credentials, only when both halves are set.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (self.username.as_deref(), self.password.as_deref()) {
            (Some(user), Some(password)) if !user.is_empty() && !password.is_empty() => {
                Some((user, password))
            }
            _ => None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, raw: &str) -> GeoServerResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| GeoServerError::InvalidConfig(format!("{} is not a number: '{}'", key, raw)))
}
