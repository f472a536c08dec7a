//! Download file lifecycle.
//!
//! Bodies stream into a `.part` temp file; a successful fetch fsyncs and
//! atomically renames it to the final name, a failed fetch discards it. No
//! truncated output file is ever left behind under the final name.

use std::fs::File;
use std::io;
#[cfg(unix)]
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Path for the temp file: appends `.part` to the final path
/// (e.g. `file.pdf` → `file.pdf.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(".part");
    PathBuf::from(o)
}

/// Writer for a temp download file. Cloneable; each `write_at` is independent
/// (pwrite-style), so the curl write callback can hold a clone while the
/// fetcher keeps the original for sync/finalize.
#[derive(Clone)]
pub struct FileSink {
    file: Arc<File>,
    temp_path: PathBuf,
}

impl FileSink {
    /// Creates (or truncates) the temp file.
    pub fn create(temp_path: &Path) -> io::Result<Self> {
        let file = File::create(temp_path)?;
        Ok(Self {
            file: Arc::new(file),
            temp_path: temp_path.to_path_buf(),
        })
    }

    /// Write `data` at `offset` without moving a shared cursor.
    #[cfg(unix)]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> io::Result<()> {
        let n = self.file.write_at(data, offset)?;
        if n != data.len() {
            return Err(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("short write: {} of {}", n, data.len()),
            ));
        }
        Ok(())
    }

    /// Non-Unix fallback: seek + write on a cloned handle.
    #[cfg(not(unix))]
    pub fn write_at(&self, offset: u64, data: &[u8]) -> io::Result<()> {
        use std::io::{Seek, SeekFrom, Write};
        let mut f = (*self.file).try_clone()?;
        f.seek(SeekFrom::Start(offset))?;
        f.write_all(data)
    }

    /// Sync file data to disk. Call before `finalize` for durability.
    pub fn sync(&self) -> io::Result<()> {
        self.file.sync_all()
    }

    /// Atomically rename the temp file to `final_path`, consuming the sink.
    pub fn finalize(self, final_path: &Path) -> io::Result<()> {
        let temp_path = self.temp_path.clone();
        drop(self.file);
        std::fs::rename(&temp_path, final_path)
    }

    /// Remove the temp file, best effort. Used after a failed fetch so no
    /// partial output survives.
    pub fn discard(self) {
        let temp_path = self.temp_path.clone();
        drop(self.file);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            tracing::debug!("could not remove {}: {}", temp_path.display(), e);
        }
    }
}
