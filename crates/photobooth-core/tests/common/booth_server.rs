//! Minimal HTTP/1.1 backend for integration tests.
//!
//! Serves `POST /upload` (multipart; answers with a loopback `file_url`
//! built from the uploaded file name) and `POST /generate-photobooth`
//! (JSON; answers with a configurable body). Every request is recorded.

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct BoothServerOptions {
    pub upload_status: u16,
    pub generate_status: u16,
    pub generate_body: String,
}

impl Default for BoothServerOptions {
    fn default() -> Self {
        Self {
            upload_status: 200,
            generate_status: 200,
            generate_body: r#"{"image_url":"http://localhost:3000/out/result.png"}"#.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

pub struct BoothServer {
    /// e.g. "http://127.0.0.1:12345" (no trailing slash).
    pub origin: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl BoothServer {
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }
}

/// Starts the server in a background thread. It runs until the process exits.
pub fn start(opts: BoothServerOptions) -> BoothServer {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&requests);
    let opts = Arc::new(opts);
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let recorded = Arc::clone(&recorded);
            let opts = Arc::clone(&opts);
            thread::spawn(move || handle(stream, &opts, &recorded));
        }
    });
    BoothServer {
        origin: format!("http://127.0.0.1:{}", port),
        requests,
    }
}

/// An origin on which nothing listens.
pub fn dead_origin() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

fn handle(mut stream: TcpStream, opts: &BoothServerOptions, recorded: &Mutex<Vec<Recorded>>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(5)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(5)));
    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };
    recorded.lock().unwrap().push(request.clone());

    let (status, body) = match (request.method.as_str(), request.path.as_str()) {
        ("POST", "/upload") => {
            if opts.upload_status != 200 {
                (opts.upload_status, r#"{"detail":"upload failed"}"#.to_string())
            } else {
                let name = multipart_filename(&request.body).unwrap_or_else(|| "unnamed".into());
                (
                    200,
                    format!(r#"{{"file_url":"http://localhost:3000/files/{}"}}"#, name),
                )
            }
        }
        ("POST", "/generate-photobooth") => {
            if opts.generate_status != 200 {
                (opts.generate_status, "generation backend exploded".to_string())
            } else {
                (200, opts.generate_body.clone())
            }
        }
        _ => (404, "{}".to_string()),
    };

    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason(status),
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
}

fn read_request(stream: &mut TcpStream) -> Option<Recorded> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];
    let header_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos + 4;
        }
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = std::str::from_utf8(&buf[..header_end]).ok()?.to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let mut content_length = 0usize;
    let mut content_type = None;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.parse().unwrap_or(0);
            }
            if name.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.to_string());
            }
        }
    }

    while buf.len() < header_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let end = buf.len().min(header_end + content_length);

    Some(Recorded {
        method,
        path,
        content_type,
        body: buf[header_end..end].to_vec(),
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// `filename="..."` of the first multipart part.
pub fn multipart_filename(body: &[u8]) -> Option<String> {
    let text = String::from_utf8_lossy(body);
    let start = text.find("filename=\"")? + "filename=\"".len();
    let rest = &text[start..];
    let end = rest.find('"')?;
    Some(rest[..end].to_string())
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        422 => "Unprocessable Entity",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
