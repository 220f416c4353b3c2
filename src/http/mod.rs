//! HTTP boundary.
//!
//! # Data Flow
//! ```text
//! proxy auth subrequest (nginx auth_request / Traefik forwardAuth)
//!     → server.rs (request ID, trace span, timeout)
//!     → auth_handler (REMOTE-USER, X-URI, X-Host, optional X-Cert)
//!     → authz engine
//!     → 200 / 403, or 401 when a mandatory header is missing
//! ```

pub mod server;

pub use server::{AppState, HttpServer};

/// Authenticated user name, set by the proxy.
pub const REMOTE_USER: &str = "remote-user";
/// Original request URI.
pub const X_URI: &str = "x-uri";
/// Original virtual host.
pub const X_HOST: &str = "x-host";
/// Client certificate (PEM, optionally URL-escaped).
pub const X_CERT: &str = "x-cert";
/// Correlation ID, generated when absent.
pub const X_REQUEST_ID: &str = "x-request-id";
