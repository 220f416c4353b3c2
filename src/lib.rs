//! Forward-authorization responder.
//!
//! Answers auth subrequests from a reverse proxy (nginx `auth_request`,
//! Traefik forward-auth) with 200, 403 or 401, based on a JSON access
//! document of admins and per-host location rules.

pub mod authz;
pub mod config;
pub mod http;
pub mod identity;
pub mod lifecycle;
pub mod net;
pub mod observability;

pub use authz::{decide, AccessPolicy, Decision};
pub use config::{load_policy, ServiceConfig};
pub use http::HttpServer;
pub use identity::extract_user;
pub use lifecycle::Shutdown;
