use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// What to do when a bookmark fails (download, parse or both tag attempts).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Record the failure and move on to the next bookmark/folder.
    #[default]
    Continue,
    /// Record the failure and stop the entire run.
    Abort,
}

/// Global configuration loaded from `~/.config/tunemark/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TunemarkConfig {
    /// Path to the Firefox places.sqlite database (the bookmark store).
    /// Must be set here or via `--places` before a run can start.
    #[serde(default)]
    pub places_db: Option<PathBuf>,
    /// Folder titles from the store's top level down to the folder to mirror.
    pub root_folder: Vec<String>,
    /// Failure policy: "continue" (default) or "abort".
    #[serde(default)]
    pub on_error: ErrorPolicy,
    /// Downloader program (yt-dlp compatible command line).
    #[serde(default = "default_downloader")]
    pub downloader: String,
    /// Tagger/transcoder program (ffmpeg compatible command line).
    #[serde(default = "default_tagger")]
    pub tagger: String,
    /// Scratch directory for raw downloads; the system temp dir if unset.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
    /// Optional per-tool timeout in seconds. Unset means downloads and
    /// transcodes may run unbounded.
    #[serde(default)]
    pub tool_timeout_secs: Option<u64>,
    /// Keep an untagged copy in the destination when both tag attempts fail.
    /// The bookmark is still reported failed either way.
    #[serde(default)]
    pub salvage_untagged: bool,
}

fn default_downloader() -> String {
    "yt-dlp".to_string()
}

fn default_tagger() -> String {
    "ffmpeg".to_string()
}

impl Default for TunemarkConfig {
    fn default() -> Self {
        Self {
            places_db: None,
            root_folder: vec!["Bookmarks Toolbar".to_string(), "music".to_string()],
            on_error: ErrorPolicy::Continue,
            downloader: default_downloader(),
            tagger: default_tagger(),
            scratch_dir: None,
            tool_timeout_secs: None,
            salvage_untagged: false,
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tunemark")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TunemarkConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TunemarkConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: TunemarkConfig = toml::from_str(&data)?;
    Ok(cfg)
}
