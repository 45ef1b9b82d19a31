//! CLI for batchfetch.

mod fetch;
mod progress;

use anyhow::{Context, Result};
use batchfetch_core::config::{self, BatchConfig};
use batchfetch_core::plan::BatchRequest;
use clap::Parser;
use std::path::PathBuf;

use fetch::run_fetch;

const TYPE_HELP: &str = "\
TYPE options:
  ctx        - uses download_ctx.s
  hirise_edr - uses download_hirise_edr.s
  hirise_rdr - uses download_hirise_rdr.s";

/// Top-level CLI: `batchfetch <TYPE> <LIST_FILE> [DIRECTORY]`.
#[derive(Debug, Parser)]
#[command(name = "batchfetch")]
#[command(about = "Fetch a list of items with external fetcher scripts, a few at a time", long_about = None)]
#[command(after_help = TYPE_HELP)]
pub struct Cli {
    /// Content type to fetch (ctx, hirise_edr, hirise_rdr).
    #[arg(value_name = "TYPE")]
    pub content_type: String,

    /// Text file containing the item ids, one per line.
    pub list_file: PathBuf,

    /// Download directory (default: current directory). Created if missing.
    pub directory: Option<PathBuf>,

    /// Run up to N fetchers at once (default from config, 5 if unset).
    #[arg(short = 'j', long, value_name = "N", value_parser = parse_jobs)]
    pub jobs: Option<usize>,

    /// Directory holding the download_*.s fetcher scripts (default: ./code).
    #[arg(long, value_name = "DIR")]
    pub scripts_dir: Option<PathBuf>,

    /// Config file to use instead of ~/.config/batchfetch/config.toml.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

fn parse_jobs(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{}", e))?;
    if n == 0 {
        return Err("must be at least 1".to_string());
    }
    Ok(n)
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        let cfg = match &cli.config {
            Some(path) => config::load_from_path(path)?,
            None => config::load_or_init()?,
        };
        let cfg = cli.apply_overrides(cfg);
        tracing::debug!("loaded config: {:?}", cfg);

        let cwd = std::env::current_dir().context("read current directory")?;
        run_fetch(&cli.request(), &cfg, &cwd).await
    }

    /// Command-line flags win over the config file.
    pub fn apply_overrides(&self, mut cfg: BatchConfig) -> BatchConfig {
        if let Some(jobs) = self.jobs {
            cfg.max_concurrent = jobs;
        }
        if let Some(dir) = &self.scripts_dir {
            cfg.scripts_dir = Some(dir.clone());
        }
        cfg
    }

    pub fn request(&self) -> BatchRequest {
        BatchRequest {
            content_type: self.content_type.clone(),
            item_list: self.list_file.clone(),
            download_dir: self.directory.clone(),
        }
    }
}

#[cfg(test)]
mod tests;
