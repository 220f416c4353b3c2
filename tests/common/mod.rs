//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use auth_responder::config::{load_policy, ServiceConfig};
use auth_responder::http::HttpServer;
use auth_responder::lifecycle::Shutdown;
use auth_responder::net::Listener;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UnixStream};
use tokio::task::JoinHandle;

pub const ACCESS_DOCUMENT: &str = r#"{
    "admins": ["alice"],
    "hosts": {
        "example.com": {
            "locations": {
                "/private": {"users": ["bob"]},
                "/team": {"users": ["bob", "carol"], "location": "/team"}
            }
        }
    }
}"#;

/// A responder running in the background.
pub struct Running {
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl Running {
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = tokio::time::timeout(Duration::from_secs(5), self.handle).await;
    }
}

fn spawn(listener: Listener) -> Running {
    let policy = Arc::new(load_policy(ACCESS_DOCUMENT.as_bytes()).unwrap());
    let server = HttpServer::new(&ServiceConfig::default(), policy);
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();

    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });
    Running { shutdown, handle }
}

/// Start a responder on an ephemeral TCP port.
pub async fn start_tcp() -> (SocketAddr, Running) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    (addr, spawn(Listener::Tcp(listener)))
}

/// Start a responder on a Unix socket at `path`.
pub fn start_unix(path: &Path) -> Running {
    let listener = Listener::bind_unix(path, 0o770).unwrap();
    spawn(listener)
}

pub fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("auth-responder-it-{}-{}", name, std::process::id()))
}

/// Send a bodyless GET over a Unix socket and return the status code.
pub async fn unix_request(path: &Path, headers: &[(&str, &str)]) -> u16 {
    let mut stream = UnixStream::connect(path).await.unwrap();

    let mut request = String::from("GET /auth HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n");
    for (name, value) in headers {
        request.push_str(&format!("{}: {}\r\n", name, value));
    }
    request.push_str("\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();

    // "HTTP/1.1 200 OK"
    response
        .split_whitespace()
        .nth(1)
        .and_then(|code| code.parse().ok())
        .unwrap()
}
