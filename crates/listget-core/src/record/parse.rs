//! Record line parsing and validation.

use thiserror::Error;
use url::Url;

use super::DownloadRecord;

/// Format error raised while building a record from a text line. Any of these
/// aborts loading the whole record file; no downloads run against a partially
/// parsed list.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("expected at least 3 comma-separated fields, got {0}")]
    TooFewFields(usize),

    #[error("the url {url:?} is not well formed: {source}")]
    MalformedUrl {
        url: String,
        source: url::ParseError,
    },

    #[error("invalid url scheme {scheme:?}: http and https only")]
    SchemeNotAllowed { scheme: String },
}

/// Parses one `name,filename,sourceUrl[,destinationUrl]` line.
///
/// The source URL must be absolute with an http or https scheme. A 4th field
/// is parsed as the destination URL; no scheme restriction applies to it.
/// Extra fields beyond the 4th are ignored.
pub fn parse_record_line(line: &str) -> Result<DownloadRecord, RecordError> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() < 3 {
        return Err(RecordError::TooFewFields(fields.len()));
    }

    let source = parse_url(fields[2])?;
    match source.scheme() {
        "http" | "https" => {}
        other => {
            return Err(RecordError::SchemeNotAllowed {
                scheme: other.to_string(),
            })
        }
    }

    let destination = match fields.get(3) {
        Some(raw) => Some(parse_url(raw)?),
        None => None,
    };

    Ok(DownloadRecord {
        name: fields[0].to_string(),
        filename: fields[1].to_string(),
        source,
        destination,
    })
}

fn parse_url(raw: &str) -> Result<Url, RecordError> {
    Url::parse(raw).map_err(|source| RecordError::MalformedUrl {
        url: raw.to_string(),
        source,
    })
}
