//! Download record model and the flat text record source.
//!
//! A record names one download: `name,filename,sourceUrl[,destinationUrl]`.
//! The source URL is validated at parse time (http/https only); fetch code can
//! assume a well-formed record.

mod parse;
mod store;

pub use parse::{parse_record_line, RecordError};
pub use store::{TextRecordStore, DEFAULT_RECORDS_FILE};

use std::path::{Path, PathBuf};
use url::Url;

/// One requested download. Immutable once parsed; the fetch outcome is
/// returned as a value, never written back into the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRecord {
    /// Human-readable label. Not used for correctness.
    pub name: String,
    /// Output file name, used when no explicit destination is set.
    pub filename: String,
    /// Source URL; scheme is http or https, enforced at parse time.
    pub source: Url,
    /// Optional destination URL; its path component overrides `filename`.
    pub destination: Option<Url>,
}

impl DownloadRecord {
    /// Local path the fetched body is written to: the destination URL's path
    /// when set, otherwise `filename` under `download_dir`.
    pub fn resolved_path(&self, download_dir: &Path) -> PathBuf {
        match &self.destination {
            Some(dest) => PathBuf::from(dest.path()),
            None => download_dir.join(&self.filename),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn record(dest: Option<&str>) -> DownloadRecord {
        DownloadRecord {
            name: "test".into(),
            filename: "result.pdf".into(),
            source: Url::parse("https://example.com/a.pdf").unwrap(),
            destination: dest.map(|d| Url::parse(d).unwrap()),
        }
    }

    #[test]
    fn resolved_path_defaults_to_filename_in_download_dir() {
        let r = record(None);
        assert_eq!(
            r.resolved_path(Path::new("/tmp/dl")),
            Path::new("/tmp/dl/result.pdf")
        );
    }

    #[test]
    fn resolved_path_uses_destination_path_when_set() {
        let r = record(Some("file:///srv/mirror/a.pdf"));
        assert_eq!(
            r.resolved_path(Path::new("/tmp/dl")),
            Path::new("/srv/mirror/a.pdf")
        );
    }
}
