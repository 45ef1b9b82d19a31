//! Pre-run validation: everything that must hold before the first fetcher
//! is launched. Any failure here leaves the system untouched apart from a
//! possibly created download directory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::BatchConfig;
use crate::content_type::ContentType;
use crate::error::SetupError;
use crate::fetcher::resolve_fetcher;
use crate::item_list::{read_item_list, WorkItem};

/// What the user asked for, before validation.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub content_type: String,
    pub item_list: PathBuf,
    /// Download directory; the working directory when `None`.
    pub download_dir: Option<PathBuf>,
}

/// A validated batch, ready to hand to the dispatcher.
#[derive(Debug, Clone)]
pub struct BatchPlan {
    pub content_type: ContentType,
    pub fetcher: PathBuf,
    pub items: Vec<WorkItem>,
    pub download_dir: PathBuf,
    /// True if the download directory did not exist and was created.
    pub created_dir: bool,
}

impl BatchPlan {
    /// Validate `request` against `cfg`, resolving relative paths against `cwd`.
    ///
    /// Order: content type, fetcher, item list, download directory. The
    /// directory is only created once everything else checked out.
    pub fn prepare(
        request: &BatchRequest,
        cfg: &BatchConfig,
        cwd: &Path,
    ) -> Result<Self, SetupError> {
        let content_type: ContentType = request.content_type.parse()?;
        let fetcher = resolve_fetcher(content_type, cfg, cwd)?;

        let list_path = if request.item_list.is_absolute() {
            request.item_list.clone()
        } else {
            cwd.join(&request.item_list)
        };
        let items = read_item_list(&list_path)?;

        let download_dir = match &request.download_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd.to_path_buf(),
        };
        let created_dir = ensure_dir(&download_dir)?;

        Ok(Self {
            content_type,
            fetcher,
            items,
            download_dir,
            created_dir,
        })
    }

    pub fn total(&self) -> usize {
        self.items.len()
    }
}

/// Create `dir` if missing. Returns whether it was created.
fn ensure_dir(dir: &Path) -> Result<bool, SetupError> {
    if dir.is_dir() {
        return Ok(false);
    }
    fs::create_dir_all(dir).map_err(|source| SetupError::DownloadDir {
        path: dir.to_path_buf(),
        source,
    })?;
    tracing::info!(dir = %dir.display(), "created download directory");
    Ok(true)
}
