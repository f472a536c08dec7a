//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves a fixed body for every GET except paths registered as missing,
//! which get 404. Runs in a background thread until the process exits.

use std::collections::HashSet;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread;

pub struct TestServer {
    base_url: String,
}

impl TestServer {
    /// URL for `path` on this server (path without leading slash).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Starts a server serving `body` on every path. Paths in `missing` return
/// 404 with a small error page instead.
pub fn start(body: Vec<u8>, missing: &[&str]) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let body = Arc::new(body);
    let missing: Arc<HashSet<String>> = Arc::new(
        missing
            .iter()
            .map(|p| format!("/{}", p.trim_start_matches('/')))
            .collect(),
    );
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let body = Arc::clone(&body);
            let missing = Arc::clone(&missing);
            thread::spawn(move || handle(stream, &body, &missing));
        }
    });
    TestServer {
        base_url: format!("http://127.0.0.1:{}/", port),
    }
}

fn handle(mut stream: std::net::TcpStream, body: &[u8], missing: &HashSet<String>) {
    let _ = stream.set_read_timeout(Some(std::time::Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(std::time::Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let mut parts = request.split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/");

    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\n\r\n");
        return;
    }
    if missing.contains(path) {
        let page = b"not found";
        let response = format!(
            "HTTP/1.1 404 Not Found\r\nContent-Length: {}\r\n\r\n",
            page.len()
        );
        let _ = stream.write_all(response.as_bytes());
        let _ = stream.write_all(page);
        return;
    }
    let response = format!("HTTP/1.1 200 OK\r\nContent-Length: {}\r\n\r\n", body.len());
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.write_all(body);
}
