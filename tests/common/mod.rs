//! Shared utilities for integration testing.
//!
//! Mock upstreams speak raw HTTP/1.1 over TCP so tests can exercise
//! behaviors a well-behaved framework server cannot produce: closing a
//! connection without responding, hanging forever, or streaming an
//! endless body and observing when the gateway aborts it.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use ani_gateway::config::GatewayConfig;
use ani_gateway::http::HttpServer;
use ani_gateway::lifecycle::Shutdown;

/// One request as seen by a mock upstream.
#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub method: String,
    pub path: String,
    pub range: Option<String>,
}

impl ReceivedRequest {
    #[allow(dead_code)]
    pub fn is_probe_get(&self) -> bool {
        self.method == "GET" && self.range.as_deref() == Some("bytes=0-0")
    }
}

pub type RequestLog = Arc<Mutex<Vec<ReceivedRequest>>>;

/// What a mock upstream does with one request.
#[allow(dead_code)]
pub enum MockResponse {
    /// Status line with an empty body.
    Status(u16),
    /// Full response with explicit headers and body. For HEAD requests
    /// only the head is written.
    Full {
        status: u16,
        headers: Vec<(&'static str, String)>,
        body: Vec<u8>,
    },
    /// Drop the connection without writing anything (network error).
    CloseWithoutResponse,
    /// Accept the request and never answer (timeout).
    Hang,
    /// Respond 200 and stream chunks forever; `aborted` flips when the
    /// peer goes away.
    InfiniteBody { aborted: Arc<AtomicBool> },
}

/// Start a mock upstream; the behavior closure decides each response.
/// Returns the bound address and a log of every request received.
pub async fn start_mock_upstream<F>(behavior: F) -> (SocketAddr, RequestLog)
where
    F: Fn(&ReceivedRequest) -> MockResponse + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let log: RequestLog = Arc::new(Mutex::new(Vec::new()));
    let behavior = Arc::new(behavior);

    let task_log = log.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let log = task_log.clone();
            let behavior = behavior.clone();
            tokio::spawn(async move {
                let Some(request) = read_request_head(&mut socket).await else {
                    return;
                };
                let response = behavior(&request);
                let head_only = request.method == "HEAD";
                log.lock().unwrap().push(request);

                match response {
                    MockResponse::Status(status) => {
                        let head = format!(
                            "HTTP/1.1 {} {}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
                            status,
                            reason(status)
                        );
                        let _ = socket.write_all(head.as_bytes()).await;
                        let _ = socket.shutdown().await;
                    }
                    MockResponse::Full {
                        status,
                        headers,
                        body,
                    } => {
                        let mut head = format!("HTTP/1.1 {} {}\r\n", status, reason(status));
                        for (name, value) in &headers {
                            head.push_str(&format!("{}: {}\r\n", name, value));
                        }
                        head.push_str("Connection: close\r\n\r\n");
                        let _ = socket.write_all(head.as_bytes()).await;
                        if !head_only {
                            let _ = socket.write_all(&body).await;
                        }
                        let _ = socket.shutdown().await;
                    }
                    MockResponse::CloseWithoutResponse => {
                        drop(socket);
                    }
                    MockResponse::Hang => {
                        tokio::time::sleep(Duration::from_secs(3600)).await;
                    }
                    MockResponse::InfiniteBody { aborted } => {
                        let head =
                            "HTTP/1.1 200 OK\r\nContent-Type: video/mp4\r\nConnection: close\r\n\r\n";
                        if socket.write_all(head.as_bytes()).await.is_err() {
                            aborted.store(true, Ordering::SeqCst);
                            return;
                        }
                        let chunk = [0u8; 1024];
                        loop {
                            if socket.write_all(&chunk).await.is_err() {
                                aborted.store(true, Ordering::SeqCst);
                                return;
                            }
                            tokio::time::sleep(Duration::from_millis(10)).await;
                        }
                    }
                }
            });
        }
    });

    (addr, log)
}

async fn read_request_head(socket: &mut TcpStream) -> Option<ReceivedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if buf.windows(4).any(|w| w == b"\r\n\r\n") {
            break;
        }
        if buf.len() > 16 * 1024 {
            return None;
        }
    }

    let text = String::from_utf8_lossy(&buf);
    let mut lines = text.lines();
    let request_line = lines.next()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let path = parts.next()?.to_string();

    let mut range = None;
    for line in lines {
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.eq_ignore_ascii_case("range") {
                range = Some(value.trim().to_string());
            }
        }
    }

    Some(ReceivedRequest {
        method,
        path,
        range,
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        206 => "Partial Content",
        400 => "Bad Request",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}

/// An address nothing is listening on (bound and immediately released).
pub async fn unreachable_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// Spawn the gateway on an ephemeral port. The returned `Shutdown`
/// must stay alive for the server's lifetime.
pub async fn spawn_gateway(mut config: GatewayConfig) -> (SocketAddr, Shutdown) {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let receiver = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, receiver).await;
    });

    (addr, shutdown)
}

/// Test client without connection pooling, so every request observes
/// the server fresh.
pub fn test_client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
