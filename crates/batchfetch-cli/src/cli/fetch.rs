//! Validate the batch, then run the dispatcher with real processes.

use anyhow::{Context, Result};
use batchfetch_core::config::BatchConfig;
use batchfetch_core::dispatcher::Dispatcher;
use batchfetch_core::launcher::OsLauncher;
use batchfetch_core::plan::{BatchPlan, BatchRequest};
use std::path::Path;

use super::progress;

pub async fn run_fetch(request: &BatchRequest, cfg: &BatchConfig, cwd: &Path) -> Result<()> {
    let plan = BatchPlan::prepare(request, cfg, cwd)?;

    if plan.created_dir {
        println!("Created download directory: {}", plan.download_dir.display());
    }
    println!("Found {} item IDs to download.", plan.total());
    println!("Using: {}", plan.fetcher.display());

    let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
    let printer = tokio::spawn(progress::print_events(events_rx));

    // The dispatch loop blocks in waitpid; keep it off the async workers.
    let dispatcher = Dispatcher::new(cfg.max_concurrent);
    let outcome = tokio::task::spawn_blocking(move || {
        let mut launcher = OsLauncher::new();
        dispatcher.run(
            plan.items,
            &mut launcher,
            &plan.fetcher,
            &plan.download_dir,
            Some(&events_tx),
        )
    })
    .await
    .context("dispatch task join")?;

    // Sender is gone with the blocking task; let the printer drain what was sent.
    let _ = printer.await;

    let result = outcome.context("download run aborted")?;
    tracing::info!(
        "run completed: {} of {} item(s)",
        result.completed,
        result.total
    );
    Ok(())
}
