//! Configuration schema definitions.
//!
//! Two documents live here:
//! - the access document (`admins` + `hosts`), read from JSON at startup
//! - the service settings (listener, timeouts, observability), built from
//!   command-line flags
//!
//! The access document types mirror the wire format only. Lookups happen on
//! the compiled [`AccessPolicy`](crate::authz::AccessPolicy).

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Root of the JSON access document.
///
/// ```json
/// {
///   "admins": ["alice"],
///   "hosts": {
///     "example.com": {
///       "locations": {
///         "/private": { "users": ["bob"] }
///       }
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AccessDocument {
    /// Users granted access to every host and URI.
    #[serde(default, deserialize_with = "null_as_default")]
    pub admins: Vec<String>,

    /// Per-host location rules, keyed by exact host name.
    #[serde(default, deserialize_with = "null_as_default")]
    pub hosts: BTreeMap<String, HostDocument>,
}

/// Location rules of a single host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct HostDocument {
    /// Location prefix → allowed users.
    #[serde(default, deserialize_with = "null_as_default")]
    pub locations: BTreeMap<String, LocationDocument>,
}

/// Users allowed below one location prefix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocationDocument {
    #[serde(default, deserialize_with = "null_as_default")]
    pub users: Vec<String>,

    /// Accepted for compatibility with older documents. Not used for matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Treat an explicit JSON `null` the same as a missing member.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Settings of the responder process itself.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Listener configuration (Unix socket or TCP).
    pub listener: ListenerConfig,

    /// Path of the JSON access document.
    pub access_file: String,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl ServiceConfig {
    pub const DEFAULT_ACCESS_FILE: &'static str = "/etc/auth-responder/config.json";
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listener: ListenerConfig::default(),
            access_file: Self::DEFAULT_ACCESS_FILE.to_string(),
            timeouts: TimeoutConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    /// Path of the Unix domain socket.
    pub socket_path: String,

    /// File mode applied to the socket after binding.
    pub socket_mode: u32,

    /// TCP bind address. Takes precedence over `socket_path` when set.
    pub bind_address: Option<String>,
}

impl ListenerConfig {
    pub const DEFAULT_SOCKET_PATH: &'static str = "/run/auth-responder/socket";
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            socket_path: Self::DEFAULT_SOCKET_PATH.to_string(),
            socket_mode: 0o770,
            bind_address: None,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Upper bound for answering a single auth request, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 10 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Default)]
pub struct ObservabilityConfig {
    /// Development logging: pretty output at debug level.
    pub debug: bool,

    /// Prometheus exporter bind address. Metrics are off when unset.
    pub metrics_address: Option<String>,
}
