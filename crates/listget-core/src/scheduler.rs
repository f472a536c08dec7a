//! Batch scheduler: drives fetches in fixed-size concurrent groups.
//!
//! Groups are sequential; within a group every fetch runs at once on the
//! blocking pool, so the batch size is the only admission control. One job's
//! failure never cancels its siblings or later groups; failures surface
//! through the per-job outcome and the optional callback, never as an error
//! from `run_all`.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;

use crate::batch::{batch_count, batch_range};
use crate::fetch::{fetch_one, FetchError, FetchOptions};
use crate::record::DownloadRecord;

/// Terminal outcome of one job: the record it belongs to plus the fetch
/// result (bytes written on success).
#[derive(Debug)]
pub struct JobOutcome {
    pub record: DownloadRecord,
    pub result: Result<u64, FetchError>,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of a whole run, in original job order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub outcomes: Vec<JobOutcome>,
}

impl RunReport {
    pub fn succeeded(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| o.is_success())
    }

    pub fn failed(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn failure_count(&self) -> usize {
        self.failed().count()
    }
}

/// Per-failure callback: the failed record and the error that sank it.
pub type OnFailure<'a> = &'a mut dyn FnMut(&DownloadRecord, &FetchError);

/// Runs every record, at most `batch_size` fetches in flight at a time.
///
/// Group `k + 1` does not start until all of group `k` has settled and its
/// failures have been reported through `on_failure`. Returns the collected
/// outcomes; errors only for contract violations (`batch_size == 0`) or
/// scheduling failures (a fetch task panicking), never for failed jobs.
pub async fn run_all(
    records: Vec<DownloadRecord>,
    batch_size: usize,
    download_dir: &Path,
    opts: &FetchOptions,
    mut on_failure: Option<OnFailure<'_>>,
) -> Result<RunReport> {
    if batch_size == 0 {
        anyhow::bail!("batch size must be positive, got 0");
    }

    let total = records.len();
    let groups = batch_count(total, batch_size);
    let mut report = RunReport::default();
    let mut remaining = records.into_iter();

    for k in 0..groups {
        let (start, end) = batch_range(k, batch_size, total);
        tracing::debug!("batch {}/{}: jobs {}..{}", k + 1, groups, start + 1, end);

        let group: Vec<DownloadRecord> = remaining.by_ref().take(batch_size).collect();
        let settled = run_group(group, download_dir.to_path_buf(), *opts).await?;

        for outcome in settled {
            if let Err(err) = &outcome.result {
                tracing::warn!(name = %outcome.record.name, url = %outcome.record.source, "download failed: {}", err);
                if let Some(cb) = on_failure.as_mut() {
                    cb(&outcome.record, err);
                }
            }
            report.outcomes.push(outcome);
        }
    }

    Ok(report)
}

/// Runs one group's fetches concurrently and waits for all of them to settle.
/// Outcomes come back in the group's original order.
async fn run_group(
    group: Vec<DownloadRecord>,
    download_dir: PathBuf,
    opts: FetchOptions,
) -> Result<Vec<JobOutcome>> {
    let size = group.len();
    let mut join_set = JoinSet::new();
    for (slot, record) in group.into_iter().enumerate() {
        let dir = download_dir.clone();
        join_set.spawn_blocking(move || {
            let result = fetch_one(&record, &dir, &opts);
            (slot, JobOutcome { record, result })
        });
    }

    let mut settled: Vec<Option<JobOutcome>> = (0..size).map(|_| None).collect();
    while let Some(res) = join_set.join_next().await {
        let (slot, outcome) = res.map_err(|e| anyhow::anyhow!("fetch task join: {}", e))?;
        settled[slot] = Some(outcome);
    }

    Ok(settled.into_iter().map(|o| o.expect("every slot settled")).collect())
}
