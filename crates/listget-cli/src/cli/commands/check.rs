//! `listget check` – parse the record file and list it without downloading.

use anyhow::Result;
use listget_core::record::TextRecordStore;

pub fn run_check(store: &TextRecordStore) -> Result<()> {
    let records = store.load()?;
    if records.is_empty() {
        println!("No download records found.");
        return Ok(());
    }

    println!("{:<20} {:<24} {}", "NAME", "FILENAME", "SOURCE");
    for r in &records {
        println!("{:<20} {:<24} {}", r.name, r.filename, r.source);
        if let Some(dest) = &r.destination {
            println!("{:<20} {:<24} -> {}", "", "", dest);
        }
    }
    println!("{} record(s) OK.", records.len());
    Ok(())
}
