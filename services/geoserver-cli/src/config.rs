//! Connection settings for the CLI.
//!
//! Settings come from an optional YAML file holding a [`GeoServerConfig`].
//! Command-line flags (and their `GEOSERVER_*` environment fallbacks)
//! override whatever the file sets.

use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::Args;
use geoserver_client::GeoServerConfig;

/// Connection flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// GeoServer root URL, e.g. http://localhost:8080/geoserver
    #[arg(long, global = true, env = "GEOSERVER_URL")]
    pub url: Option<String>,

    /// Default workspace for unqualified layer names
    #[arg(long, global = true, env = "GEOSERVER_WORKSPACE")]
    pub workspace: Option<String>,

    /// Basic-auth user name
    #[arg(long, global = true, env = "GEOSERVER_USERNAME")]
    pub username: Option<String>,

    /// Basic-auth password
    #[arg(long, global = true, env = "GEOSERVER_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Per-attempt request timeout in milliseconds
    #[arg(long, global = true, env = "GEOSERVER_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Retries after a timed-out attempt
    #[arg(long, global = true, env = "GEOSERVER_MAX_RETRIES")]
    pub max_retries: Option<u32>,
}

/// Load a config file, if given, and apply flag overrides on top.
pub fn resolve(file: Option<&Path>, args: &ConnectionArgs) -> Result<GeoServerConfig> {
    let mut config = match file {
        Some(path) => Some(load_file(path)?),
        None => None,
    };

    if let Some(url) = &args.url {
        config = Some(match config {
            Some(mut config) => {
                config.base_url = url.clone();
                config
            }
            None => GeoServerConfig::new(url.clone()),
        });
    }

    let Some(mut config) = config else {
        bail!("No GeoServer URL: pass --url, set GEOSERVER_URL or use --config");
    };

    if let Some(workspace) = &args.workspace {
        config.workspace = Some(workspace.clone());
    }
    if let Some(username) = &args.username {
        config.username = Some(username.clone());
    }
    if let Some(password) = &args.password {
        config.password = Some(password.clone());
    }
    if let Some(timeout_ms) = args.timeout_ms {
        config.timeout_ms = timeout_ms;
    }
    if let Some(max_retries) = args.max_retries {
        config.max_retries = max_retries;
    }

    config.validate().context("Invalid GeoServer settings")?;
    Ok(config)
}

fn load_file(path: &Path) -> Result<GeoServerConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read: {:?}", path))?;
    let config: GeoServerConfig = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse: {:?}", path))?;
    tracing::debug!(path = ?path, base_url = %config.base_url, "Loaded config file");
    Ok(config)
}
