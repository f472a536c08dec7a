//! `listget run` – download every record in the record file.

use anyhow::Result;
use listget_core::config::ListgetConfig;
use listget_core::record::TextRecordStore;
use listget_core::scheduler;
use std::path::Path;

/// Loads all records and runs the batch scheduler over them.
///
/// A format error in the record file aborts before any download starts (the
/// caller exits nonzero). Individual download failures are printed to stderr
/// and counted; they do not fail the run, so partial failure still exits
/// zero with the count in the summary.
pub async fn run_downloads(
    store: &TextRecordStore,
    cfg: &ListgetConfig,
    download_dir: &Path,
    batch_size: usize,
) -> Result<()> {
    let records = store.load()?;
    if records.is_empty() {
        println!("No download records found.");
        return Ok(());
    }

    let total = records.len();
    println!("Starting downloads...");
    tracing::info!(total, batch_size, "starting downloads");

    let mut on_failure = |record: &listget_core::record::DownloadRecord,
                          err: &listget_core::fetch::FetchError| {
        eprintln!("failed: {} ({}): {}", record.name, record.source, err);
    };
    let report = scheduler::run_all(
        records,
        batch_size,
        download_dir,
        &cfg.fetch_options(),
        Some(&mut on_failure),
    )
    .await?;

    let failed = report.failure_count();
    if failed == 0 {
        println!("Downloaded {} file(s).", total);
    } else {
        println!("{} of {} downloads failed.", failed, total);
    }
    Ok(())
}
