use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::content_type::ContentType;

/// Default number of fetcher processes running at once.
pub const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Per-content-type fetcher paths (optional `[fetchers]` section in config.toml).
/// Any entry set here wins over `scripts_dir`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetcherPaths {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ctx: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hirise_edr: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hirise_rdr: Option<PathBuf>,
}

impl FetcherPaths {
    pub fn get(&self, content_type: ContentType) -> Option<&Path> {
        match content_type {
            ContentType::Ctx => self.ctx.as_deref(),
            ContentType::HiriseEdr => self.hirise_edr.as_deref(),
            ContentType::HiriseRdr => self.hirise_rdr.as_deref(),
        }
    }
}

/// Global configuration loaded from `~/.config/batchfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Maximum number of fetcher processes running at once.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,
    /// Directory holding the `download_*.s` fetcher scripts. Relative paths are
    /// resolved against the working directory; if unset, `./code` is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scripts_dir: Option<PathBuf>,
    /// Explicit fetcher executables per content type.
    #[serde(default)]
    pub fetchers: FetcherPaths,
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            scripts_dir: None,
            fetchers: FetcherPaths::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("batchfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<BatchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = BatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<BatchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: BatchConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = BatchConfig::default();
        assert_eq!(cfg.max_concurrent, 5);
        assert!(cfg.scripts_dir.is_none());
        assert_eq!(cfg.fetchers, FetcherPaths::default());
    }

    #[test]
    fn config_toml_roundtrip() {
        let mut cfg = BatchConfig::default();
        cfg.max_concurrent = 3;
        cfg.scripts_dir = Some(PathBuf::from("/opt/fetchers"));
        cfg.fetchers.hirise_rdr = Some(PathBuf::from("/usr/local/bin/get_rdr"));
        let toml = toml::to_string_pretty(&cfg).unwrap();
        let parsed: BatchConfig = toml::from_str(&toml).unwrap();
        assert_eq!(parsed.max_concurrent, 3);
        assert_eq!(parsed.scripts_dir, cfg.scripts_dir);
        assert_eq!(parsed.fetchers, cfg.fetchers);
    }

    #[test]
    fn config_toml_empty_uses_defaults() {
        let cfg: BatchConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert!(cfg.scripts_dir.is_none());
        assert!(cfg.fetchers.get(ContentType::Ctx).is_none());
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            max_concurrent = 8
            scripts_dir = "tools"

            [fetchers]
            ctx = "/srv/fetch/ctx.sh"
        "#;
        let cfg: BatchConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.max_concurrent, 8);
        assert_eq!(cfg.scripts_dir.as_deref(), Some(Path::new("tools")));
        assert_eq!(
            cfg.fetchers.get(ContentType::Ctx),
            Some(Path::new("/srv/fetch/ctx.sh"))
        );
        assert!(cfg.fetchers.get(ContentType::HiriseEdr).is_none());
    }

    #[test]
    fn load_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_concurrent = 2\n").unwrap();
        let cfg = load_from_path(&path).unwrap();
        assert_eq!(cfg.max_concurrent, 2);
    }

    #[test]
    fn load_from_path_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_concurrent = \"many\"\n").unwrap();
        let err = load_from_path(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("parse config"));
    }
}
