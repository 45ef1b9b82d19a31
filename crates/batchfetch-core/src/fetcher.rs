//! Resolve a content type to the fetcher executable that handles it.
//!
//! Resolution happens once per run, before anything is launched. Children run
//! with the download directory as their working directory, so the result is
//! always an absolute path.

use std::path::{Path, PathBuf};

use crate::config::BatchConfig;
use crate::content_type::ContentType;
use crate::error::SetupError;

/// Scripts directory used when neither the config nor the CLI names one.
pub const DEFAULT_SCRIPTS_DIR: &str = "code";

/// Pick the fetcher for `content_type`: an explicit `[fetchers]` entry wins,
/// otherwise `<scripts_dir>/<script_name>`. The path must exist.
pub fn resolve_fetcher(
    content_type: ContentType,
    cfg: &BatchConfig,
    cwd: &Path,
) -> Result<PathBuf, SetupError> {
    let candidate = match cfg.fetchers.get(content_type) {
        Some(path) => absolutize(path, cwd),
        None => {
            let dir = cfg
                .scripts_dir
                .as_deref()
                .unwrap_or_else(|| Path::new(DEFAULT_SCRIPTS_DIR));
            absolutize(dir, cwd).join(content_type.script_name())
        }
    };

    if !candidate.exists() {
        return Err(SetupError::FetcherNotFound { path: candidate });
    }
    tracing::debug!(%content_type, fetcher = %candidate.display(), "resolved fetcher");
    Ok(candidate)
}

fn absolutize(path: &Path, cwd: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
