//! Integration tests: local HTTP server, single fetches and batched runs.
//!
//! Covers success and failure of a single fetch, and the batch scheduler's
//! failure isolation (a failed job never stops its siblings or later
//! batches).

mod common;

use std::path::Path;
use std::time::Duration;

use listget_core::fetch::{fetch_one, FetchError, FetchOptions};
use listget_core::record::DownloadRecord;
use listget_core::scheduler::run_all;
use tempfile::tempdir;
use url::Url;

const BODY: &[u8] = b"listget integration test body";

fn test_options() -> FetchOptions {
    FetchOptions {
        connect_timeout: Duration::from_secs(2),
        request_timeout: Duration::from_secs(10),
    }
}

fn record(name: &str, filename: &str, url: &str) -> DownloadRecord {
    DownloadRecord {
        name: name.to_string(),
        filename: filename.to_string(),
        source: Url::parse(url).unwrap(),
        destination: None,
    }
}

#[test]
fn fetch_one_success_writes_file() {
    let server = common::http_server::start(BODY.to_vec(), &[]);
    let dir = tempdir().unwrap();
    let r = record("ok", "out.bin", &server.url("file.bin"));

    let bytes = fetch_one(&r, dir.path(), &test_options()).expect("fetch");
    assert_eq!(bytes, BODY.len() as u64);
    assert_eq!(std::fs::read(dir.path().join("out.bin")).unwrap(), BODY);
    assert!(
        !dir.path().join("out.bin.part").exists(),
        "temp file is renamed away"
    );
}

#[test]
fn fetch_one_not_found_leaves_no_file() {
    let server = common::http_server::start(BODY.to_vec(), &["gone.bin"]);
    let dir = tempdir().unwrap();
    let r = record("gone", "gone-out.bin", &server.url("gone.bin"));

    let err = fetch_one(&r, dir.path(), &test_options()).unwrap_err();
    match err {
        FetchError::Http(code) => assert_eq!(code, 404),
        other => panic!("expected Http(404), got {:?}", other),
    }
    assert!(!dir.path().join("gone-out.bin").exists());
    assert!(!dir.path().join("gone-out.bin.part").exists());
}

#[test]
fn fetch_one_unreachable_host_leaves_no_file() {
    // Port from a listener that is dropped immediately, so nothing accepts.
    let port = {
        let l = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        l.local_addr().unwrap().port()
    };
    let dir = tempdir().unwrap();
    let r = record(
        "nope",
        "nope.bin",
        &format!("http://127.0.0.1:{}/x", port),
    );

    let err = fetch_one(&r, dir.path(), &test_options()).unwrap_err();
    assert!(matches!(err, FetchError::Curl(_)), "got {:?}", err);
    assert!(!dir.path().join("nope.bin").exists());
    assert!(!dir.path().join("nope.bin.part").exists());
}

#[tokio::test]
async fn run_all_downloads_every_record() {
    let server = common::http_server::start(BODY.to_vec(), &[]);
    let dir = tempdir().unwrap();
    let records: Vec<DownloadRecord> = (1..=3)
        .map(|i| {
            record(
                &format!("job {}", i),
                &format!("result{}.bin", i),
                &server.url(&format!("f{}.bin", i)),
            )
        })
        .collect();

    let report = run_all(records, 2, dir.path(), &test_options(), None)
        .await
        .unwrap();

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.failure_count(), 0);
    for i in 1..=3 {
        assert_eq!(
            std::fs::read(dir.path().join(format!("result{}.bin", i))).unwrap(),
            BODY
        );
    }
}

#[tokio::test]
async fn run_all_isolates_failures_across_batches() {
    // Six jobs, batch size 2; jobs 2, 5 and 6 point at missing paths.
    let server = common::http_server::start(BODY.to_vec(), &["bad2", "bad5", "bad6"]);
    let dir = tempdir().unwrap();
    let paths = ["good1", "bad2", "good3", "good4", "bad5", "bad6"];
    let records: Vec<DownloadRecord> = paths
        .iter()
        .enumerate()
        .map(|(i, p)| {
            record(
                &format!("job {}", i + 1),
                &format!("result{}.bin", i + 1),
                &server.url(p),
            )
        })
        .collect();

    let mut reported = Vec::new();
    let mut cb = |r: &DownloadRecord, e: &FetchError| {
        reported.push((r.name.clone(), e.is_http_status()));
    };
    let report = run_all(records, 2, dir.path(), &test_options(), Some(&mut cb))
        .await
        .unwrap();

    // Every job settled; exactly the three bad ones failed.
    assert_eq!(report.outcomes.len(), 6);
    assert_eq!(report.failure_count(), 3);
    let failed_names: Vec<&str> = report.failed().map(|o| o.record.name.as_str()).collect();
    assert_eq!(failed_names, ["job 2", "job 5", "job 6"]);
    let ok_names: Vec<&str> = report.succeeded().map(|o| o.record.name.as_str()).collect();
    assert_eq!(ok_names, ["job 1", "job 3", "job 4"]);

    // The callback fired once per failed job, never for a success.
    let mut names: Vec<&str> = reported.iter().map(|(n, _)| n.as_str()).collect();
    names.sort();
    assert_eq!(names, ["job 2", "job 5", "job 6"]);
    assert!(reported.iter().all(|(_, is_http)| *is_http));

    // Siblings and later batches still produced their files.
    for good in [1, 3, 4] {
        assert!(dir.path().join(format!("result{}.bin", good)).exists());
    }
    for bad in [2, 5, 6] {
        assert!(!dir.path().join(format!("result{}.bin", bad)).exists());
        assert!(!dir.path().join(format!("result{}.bin.part", bad)).exists());
    }
}

#[tokio::test]
async fn run_all_single_batch_when_batch_size_exceeds_jobs() {
    let server = common::http_server::start(BODY.to_vec(), &[]);
    let dir = tempdir().unwrap();
    let records = vec![
        record("a", "a.bin", &server.url("a")),
        record("b", "b.bin", &server.url("b")),
    ];

    let report = run_all(records, 10, dir.path(), &test_options(), None)
        .await
        .unwrap();
    assert_eq!(report.outcomes.len(), 2);
    assert_eq!(report.failure_count(), 0);
}

#[tokio::test]
async fn run_all_report_preserves_job_order() {
    let server = common::http_server::start(BODY.to_vec(), &["bad"]);
    let dir = tempdir().unwrap();
    let records = vec![
        record("first", "o1.bin", &server.url("x")),
        record("second", "o2.bin", &server.url("bad")),
        record("third", "o3.bin", &server.url("y")),
    ];

    let report = run_all(records, 3, dir.path(), &test_options(), None)
        .await
        .unwrap();
    let names: Vec<&str> = report
        .outcomes
        .iter()
        .map(|o| o.record.name.as_str())
        .collect();
    assert_eq!(names, ["first", "second", "third"]);
    assert!(report.outcomes[0].is_success());
    assert!(!report.outcomes[1].is_success());
    assert!(report.outcomes[2].is_success());
}

#[test]
fn fetch_one_honors_destination_path() {
    let server = common::http_server::start(BODY.to_vec(), &[]);
    let dir = tempdir().unwrap();
    let dest = dir.path().join("explicit/dest.bin");
    let mut r = record("dest", "ignored.bin", &server.url("f.bin"));
    r.destination = Some(Url::parse(&format!("file://{}", dest.display())).unwrap());

    fetch_one(&r, Path::new("/nonexistent-unused"), &test_options()).expect("fetch");
    assert_eq!(std::fs::read(&dest).unwrap(), BODY);
    assert!(!dir.path().join("ignored.bin").exists());
}
