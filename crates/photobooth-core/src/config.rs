use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::transport::CurlOptions;

pub const DEFAULT_BACKEND_ORIGIN: &str = "https://ai-photobooth-production.up.railway.app";

/// Global configuration loaded from `~/.config/photobooth/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoothConfig {
    /// Base origin of the image backend; both endpoints live under it and
    /// loopback/placeholder locators are rewritten onto it.
    pub backend_origin: String,
    /// Hosts the backend uses as stand-ins for its public origin.
    #[serde(default = "default_placeholder_hosts")]
    pub placeholder_hosts: Vec<String>,
    /// Connect timeout in seconds for every request.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Optional whole-request timeout in seconds (None = wait for the server).
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_placeholder_hosts() -> Vec<String> {
    crate::locator::DEFAULT_PLACEHOLDER_HOSTS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_connect_timeout_secs() -> u64 {
    15
}

impl Default for BoothConfig {
    fn default() -> Self {
        Self {
            backend_origin: DEFAULT_BACKEND_ORIGIN.to_string(),
            placeholder_hosts: default_placeholder_hosts(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: None,
        }
    }
}

impl BoothConfig {
    /// Transport timeouts derived from this config.
    pub fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: self.request_timeout_secs.map(Duration::from_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("photobooth")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BoothConfig> {
    load_or_init_at(&config_path()?)
}

pub fn load_or_init_at(path: &Path) -> Result<BoothConfig> {
    if !path.exists() {
        let default_cfg = BoothConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: BoothConfig = toml::from_str(&data)?;
    Ok(cfg)
}
