//! Flat text record source: one record per line, comma-separated.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use super::{parse_record_line, DownloadRecord};

/// Default record file name, resolved against the working directory.
pub const DEFAULT_RECORDS_FILE: &str = "records.txt";

/// Reads and appends download records in the flat text format.
#[derive(Debug, Clone)]
pub struct TextRecordStore {
    path: PathBuf,
}

impl TextRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `records.txt` under `dir`.
    pub fn default_in(dir: &Path) -> Self {
        Self::new(dir.join(DEFAULT_RECORDS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every record in file order. Every line is a record; the first
    /// malformed line (blank ones included) aborts the whole load with
    /// line-number context. There is no partial record list.
    pub fn load(&self) -> Result<Vec<DownloadRecord>> {
        let data = fs::read_to_string(&self.path)
            .with_context(|| format!("could not read record file {}", self.path.display()))?;

        data.lines()
            .enumerate()
            .map(|(i, line)| {
                parse_record_line(line)
                    .with_context(|| format!("{}: line {}", self.path.display(), i + 1))
            })
            .collect()
    }

    /// Appends one record to the file, creating it if missing.
    pub fn append(&self, record: &DownloadRecord) -> Result<()> {
        self.append_all(std::slice::from_ref(record))
    }

    /// Appends records to the file, creating it if missing.
    pub fn append_all(&self, records: &[DownloadRecord]) -> Result<()> {
        let mut out = String::new();
        for record in records {
            out.push_str(&record_to_line(record)?);
            out.push('\n');
        }

        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("could not open record file {}", self.path.display()))?;
        file.write_all(out.as_bytes())
            .and_then(|()| file.flush())
            .with_context(|| format!("could not write record file {}", self.path.display()))?;
        Ok(())
    }
}

/// Serializes a record to its line format. Fails if any field contains a
/// comma or newline; such a line would split into extra fields on the next
/// load. Commas are legal in URL paths and `Url` does not encode them, so
/// the URLs need the same check as the free-text fields.
fn record_to_line(record: &DownloadRecord) -> Result<String> {
    let mut fields = vec![
        ("name", record.name.as_str()),
        ("filename", record.filename.as_str()),
        ("source url", record.source.as_str()),
    ];
    if let Some(dest) = &record.destination {
        fields.push(("destination url", dest.as_str()));
    }
    for (what, value) in &fields {
        if value.contains(',') || value.contains('\n') {
            anyhow::bail!("record {} {:?} must not contain commas or newlines", what, value);
        }
    }
    Ok(fields
        .iter()
        .map(|(_, value)| *value)
        .collect::<Vec<_>>()
        .join(","))
}
