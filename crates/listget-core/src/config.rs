use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::FetchOptions;

/// Global configuration loaded from `~/.config/listget/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListgetConfig {
    /// How many downloads run at once within a batch.
    pub concurrent_downloads: usize,
    /// TCP connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout in seconds, body transfer included.
    pub request_timeout_secs: u64,
    /// Optional record file path; default is `records.txt` in the working
    /// directory.
    #[serde(default)]
    pub records_file: Option<PathBuf>,
}

impl Default for ListgetConfig {
    fn default() -> Self {
        Self {
            concurrent_downloads: 2,
            connect_timeout_secs: 30,
            request_timeout_secs: 3600,
            records_file: None,
        }
    }
}

impl ListgetConfig {
    /// Transport options for the fetcher, from the configured timeouts.
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("listget")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ListgetConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ListgetConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ListgetConfig = toml::from_str(&data)?;
    Ok(cfg)
}
