use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Looked for in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "skald.json";

/// Optional defaults from a config file. CLI flags override every field.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub out_dir: Option<PathBuf>,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

/// Load config. An explicit `--config` path must exist and parse; the
/// implicit default file is optional but must parse when present.
pub fn load(explicit: Option<&Path>, repo_root: &Path) -> Result<FileConfig> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let default = repo_root.join(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok(FileConfig::default());
            }
            default
        }
    };
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read config at {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("malformed config at {}", path.display()))
}
