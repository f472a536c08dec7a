//! Single-job HTTP fetcher.
//!
//! One GET per invocation, no retries. The body streams into a `.part` file;
//! only a 2xx response is finalized to the real output path, so a failed job
//! leaves no output file.

use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::record::DownloadRecord;
use crate::storage::{temp_path, FileSink};

/// Transport parameters for a single fetch. The defaults mirror a patient
/// bulk-download client; callers load them from config.
#[derive(Debug, Clone, Copy)]
pub struct FetchOptions {
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Whole-request timeout, including body transfer.
    pub request_timeout: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(3600),
        }
    }
}

/// Why one fetch failed. Confined to the job that raised it; the batch
/// scheduler reports these, it never propagates them.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure: DNS, connect, timeout, aborted transfer.
    #[error("{0}")]
    Curl(#[from] curl::Error),
    /// Response status outside the 2xx class.
    #[error("HTTP {0}")]
    Http(u32),
    /// Creating or writing the output file failed.
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),
}

impl FetchError {
    /// True when the server answered but refused (non-2xx), as opposed to a
    /// transport or disk failure.
    pub fn is_http_status(&self) -> bool {
        matches!(self, FetchError::Http(_))
    }
}

/// Downloads `record.source` to its resolved path under `download_dir`.
/// Returns the number of body bytes written. Blocking; the scheduler calls
/// this from the blocking pool.
pub fn fetch_one(
    record: &DownloadRecord,
    download_dir: &Path,
    opts: &FetchOptions,
) -> Result<u64, FetchError> {
    let final_path = record.resolved_path(download_dir);
    if let Some(parent) = final_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp = temp_path(&final_path);
    let sink = FileSink::create(&tmp)?;
    let written = Arc::new(AtomicU64::new(0));

    let mut easy = curl::easy::Easy::new();
    if let Err(e) = configure(&mut easy, record, opts) {
        sink.discard();
        return Err(FetchError::Curl(e));
    }

    {
        let sink_cb = sink.clone();
        let written_cb = Arc::clone(&written);
        let mut transfer = easy.transfer();
        let setup = transfer.write_function(move |data| {
            let off = written_cb.fetch_add(data.len() as u64, Ordering::Relaxed);
            match sink_cb.write_at(off, data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    tracing::warn!("write failed: {}", e);
                    Ok(0) // abort transfer
                }
            }
        });
        let result = setup.and_then(|()| transfer.perform());
        if let Err(e) = result {
            drop(transfer);
            sink.discard();
            return Err(FetchError::Curl(e));
        }
    }

    let code = match easy.response_code() {
        Ok(c) => c,
        Err(e) => {
            sink.discard();
            return Err(FetchError::Curl(e));
        }
    };
    if !(200..300).contains(&code) {
        tracing::debug!(name = %record.name, url = %record.source, code, "non-success status");
        sink.discard();
        return Err(FetchError::Http(code));
    }

    if let Err(e) = sink.sync() {
        sink.discard();
        return Err(FetchError::Io(e));
    }
    sink.finalize(&final_path)?;

    let bytes = written.load(Ordering::Relaxed);
    tracing::info!(name = %record.name, path = %final_path.display(), bytes, "fetched");
    Ok(bytes)
}

fn configure(
    easy: &mut curl::easy::Easy,
    record: &DownloadRecord,
    opts: &FetchOptions,
) -> Result<(), curl::Error> {
    easy.url(record.source.as_str())?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.timeout(opts.request_timeout)?;
    Ok(())
}
