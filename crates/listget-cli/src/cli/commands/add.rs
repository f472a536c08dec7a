//! `listget add` – append a record to the record file.

use anyhow::{Context, Result};
use listget_core::record::{parse_record_line, TextRecordStore};

/// Validates the fields through the same parser the loader uses, then
/// appends the record.
pub fn run_add(
    store: &TextRecordStore,
    name: &str,
    filename: &str,
    url: &str,
    destination: Option<&str>,
) -> Result<()> {
    let mut line = format!("{},{},{}", name, filename, url);
    if let Some(dest) = destination {
        line.push(',');
        line.push_str(dest);
    }
    let record = parse_record_line(&line).context("invalid record")?;

    store.append(&record)?;
    println!(
        "Added record {:?} ({}) to {}",
        record.name,
        record.source,
        store.path().display()
    );
    Ok(())
}
