//! Listener setup.
//!
//! # Responsibilities
//! - Bind a Unix domain socket (default) or a TCP address
//! - Remove a stale socket file before binding
//! - Apply the configured file mode to the socket
//! - Remove the socket file again once the listener is gone

use std::net::SocketAddr;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tokio::net::{TcpListener, UnixListener};

use crate::config::ListenerConfig;

/// Error type for listener operations.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// The TCP bind address did not parse.
    #[error("invalid bind address {address:?}: {source}")]
    InvalidAddress {
        address: String,
        #[source]
        source: std::net::AddrParseError,
    },
    /// Failed to bind to the address or socket path.
    #[error("failed to bind {target}: {source}")]
    Bind {
        target: String,
        #[source]
        source: std::io::Error,
    },
    /// Failed to set the socket file mode.
    #[error("failed to set permissions on {path:?}: {source}")]
    Permissions {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A bound listener, ready to be served.
#[derive(Debug)]
pub enum Listener {
    Tcp(TcpListener),
    Unix(UnixListener, SocketGuard),
}

impl Listener {
    /// Bind according to `config`. TCP wins when `bind_address` is set.
    pub async fn bind(config: &ListenerConfig) -> Result<Self, ListenerError> {
        match &config.bind_address {
            Some(address) => Self::bind_tcp(address).await,
            None => Self::bind_unix(Path::new(&config.socket_path), config.socket_mode),
        }
    }

    async fn bind_tcp(address: &str) -> Result<Self, ListenerError> {
        let addr: SocketAddr = address.parse().map_err(|source| ListenerError::InvalidAddress {
            address: address.to_string(),
            source,
        })?;

        let listener = TcpListener::bind(addr).await.map_err(|source| ListenerError::Bind {
            target: address.to_string(),
            source,
        })?;

        tracing::info!(address = %addr, "TCP listener bound");
        Ok(Self::Tcp(listener))
    }

    /// Bind a Unix socket at `path`, replacing any leftover file.
    pub fn bind_unix(path: &Path, mode: u32) -> Result<Self, ListenerError> {
        // A previous run may have left its socket behind.
        if let Err(e) = std::fs::remove_file(path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(socket = ?path, error = %e, "Could not remove old socket");
            }
        }

        let listener = UnixListener::bind(path).map_err(|source| ListenerError::Bind {
            target: path.display().to_string(),
            source,
        })?;
        let guard = SocketGuard { path: path.to_path_buf() };

        std::fs::set_permissions(path, std::fs::Permissions::from_mode(mode)).map_err(|source| {
            ListenerError::Permissions {
                path: path.to_path_buf(),
                source,
            }
        })?;

        tracing::info!(socket = ?path, mode = %format!("{mode:o}"), "Unix socket bound");
        Ok(Self::Unix(listener, guard))
    }

    /// Human-readable address for logs.
    pub fn describe(&self) -> String {
        match self {
            Self::Tcp(listener) => listener
                .local_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "tcp".to_string()),
            Self::Unix(_, guard) => guard.path.display().to_string(),
        }
    }
}

/// Removes the socket file when dropped.
#[derive(Debug)]
pub struct SocketGuard {
    path: PathBuf,
}

impl Drop for SocketGuard {
    fn drop(&mut self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(socket = ?self.path, "Socket removed"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(socket = ?self.path, error = %e, "Could not remove socket"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_socket(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("auth-responder-{}-{}.sock", name, std::process::id()))
    }

    #[tokio::test]
    async fn test_unix_socket_lifecycle() {
        let path = temp_socket("lifecycle");
        std::fs::write(&path, b"stale").unwrap();

        let listener = Listener::bind_unix(&path, 0o770).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o770);
        assert_eq!(listener.describe(), path.display().to_string());

        drop(listener);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_tcp_bind() {
        let config = ListenerConfig {
            bind_address: Some("127.0.0.1:0".to_string()),
            ..Default::default()
        };
        let listener = Listener::bind(&config).await.unwrap();
        assert!(matches!(listener, Listener::Tcp(_)));
        assert!(listener.describe().starts_with("127.0.0.1:"));
    }

    #[tokio::test]
    async fn test_invalid_tcp_address() {
        let config = ListenerConfig {
            bind_address: Some("not-an-address".to_string()),
            ..Default::default()
        };
        let err = Listener::bind(&config).await.unwrap_err();
        assert!(matches!(err, ListenerError::InvalidAddress { .. }));
    }

    #[tokio::test]
    async fn test_unix_bind_failure() {
        let err = Listener::bind_unix(Path::new("/nonexistent/dir/socket"), 0o770).unwrap_err();
        assert!(matches!(err, ListenerError::Bind { .. }));
    }
}
