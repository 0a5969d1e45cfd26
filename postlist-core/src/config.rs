//! src/config.rs
//! ============================================================================
//! # Config: List-Session Configuration Loader and Saver
//!
//! User-editable settings for the post-list coordinator, loaded and saved as
//! TOML from the proper cross-platform config path using the
//! [`directories`](https://docs.rs/directories) crate. Falls back to robust
//! defaults when no config file exists yet.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::fs as TokioFs;
use tracing::info;

/// Size limits for the per-item derived caches. The caches live for one list
/// session only, so these are churn guards, not memory budgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheLimits {
    /// Maximum upload status snapshots held at once.
    pub upload_status_max_entries: usize,

    /// Maximum resolved featured-image URLs held at once.
    pub featured_image_max_entries: usize,
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self {
            upload_status_max_entries: 2048,
            featured_image_max_entries: 2048,
        }
    }
}

/// Main configuration struct for the coordinator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// How long an undo-capable notice stays on screen before auto-dismiss.
    #[serde(with = "humantime_serde")]
    pub snackbar_auto_dismiss: Duration,

    #[serde(default)]
    pub cache: CacheLimits,

    /// Directory for rolling log files.
    pub log_dir: PathBuf,

    /// Default tracing filter directive (overridden by `RUST_LOG`).
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snackbar_auto_dismiss: Duration::from_secs(6),
            cache: CacheLimits::default(),
            log_dir: PathBuf::from("logs"),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads config from the TOML file at the XDG-compliant app config dir,
    /// or writes and returns defaults when none exists.
    pub async fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?).await
    }

    /// Saves config to the TOML file at the XDG-compliant app config dir.
    pub async fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?).await
    }

    /// Loads config from `path`, or writes and returns defaults when the
    /// file does not exist yet.
    pub async fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            info!("Loading config from {}", path.display());
            let text = TokioFs::read_to_string(path).await?;
            let cfg: Self = toml::from_str(&text)?;

            Ok(cfg)
        } else {
            info!(
                "No config file found at {}, using default configuration. Creating it now.",
                path.display()
            );

            let default_config = Self::default();
            default_config.save_to(path).await?;

            Ok(default_config)
        }
    }

    /// Saves config as pretty TOML to `path`, creating parent directories.
    pub async fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        info!("Saving config to {}", path.display());

        if let Some(parent) = path.parent() {
            TokioFs::create_dir_all(parent).await?;
        }

        let toml_str = toml::to_string_pretty(self)?;
        TokioFs::write(path, toml_str).await?;

        Ok(())
    }

    /// Canonical config file path via `directories::ProjectDirs`.
    pub fn config_path() -> anyhow::Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("org", "example", "PostList")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory."))?;
        Ok(proj_dirs.config_dir().join("config.toml"))
    }
}
