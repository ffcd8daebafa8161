//! Configuration loading
//!
//! Gitlink reads a single TOML file:
//!
//! ```toml
//! # ~/.config/gitlink/config.toml
//! default-branch = "main"
//! auto-sync = true
//! repos-root = "/home/user/repos"
//! network-timeout-secs = 120
//! ```
//!
//! A missing file yields defaults; a malformed file is an error (silently
//! ignoring a typo'd config is worse than failing). The `GITLINK_CONFIG_PATH`
//! environment variable overrides the lookup, which tests rely on.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use etcetera::BaseStrategy;
use serde::{Deserialize, Serialize};

/// User configuration, all fields optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GitlinkConfig {
    /// Branch assumed when a link carries no branch segment.
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Whether to run the sync pass at all. When false, links open against
    /// whatever state the local checkout is in.
    #[serde(default = "default_auto_sync")]
    pub auto_sync: bool,

    /// Root directory for managed clones. Defaults to `~/repos`.
    #[serde(default)]
    pub repos_root: Option<PathBuf>,

    /// Deadline in seconds for network-bound git commands.
    #[serde(default = "default_network_timeout_secs")]
    pub network_timeout_secs: u64,
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_auto_sync() -> bool {
    true
}

fn default_network_timeout_secs() -> u64 {
    120
}

impl Default for GitlinkConfig {
    fn default() -> Self {
        Self {
            default_branch: default_branch(),
            auto_sync: default_auto_sync(),
            repos_root: None,
            network_timeout_secs: default_network_timeout_secs(),
        }
    }
}

impl GitlinkConfig {
    /// Load configuration from the standard location.
    ///
    /// `GITLINK_CONFIG_PATH` overrides the platform config directory. A
    /// missing file is not an error.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Load from an explicit path; missing file yields defaults.
    pub fn load_from(path: &std::path::Path) -> anyhow::Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the config file path (env override, then platform default).
    pub fn config_path() -> anyhow::Result<PathBuf> {
        if let Ok(path) = std::env::var("GITLINK_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }
        let strategy =
            etcetera::choose_base_strategy().context("Failed to determine config directory")?;
        Ok(strategy.config_dir().join("gitlink").join("config.toml"))
    }

    /// The directory clones live under: configured root or `~/repos`.
    pub fn repos_root(&self) -> PathBuf {
        self.repos_root.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("repos")
        })
    }

    /// Network deadline as a [`Duration`].
    pub fn network_timeout(&self) -> Duration {
        Duration::from_secs(self.network_timeout_secs)
    }
}
