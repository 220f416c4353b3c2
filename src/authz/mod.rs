//! Authorization subsystem.
//!
//! # Data Flow
//! ```text
//! AccessDocument (JSON, loaded once)
//!     → policy.rs (compile: admin set, per-host rules sorted by prefix)
//!     → AccessPolicy (immutable, shared via Arc)
//!
//! Per request (user, uri, host):
//!     → engine.rs (admin? → host lookup → prefix scan → membership)
//!     → Decision → allow / deny
//! ```
//!
//! # Design Decisions
//! - Policy is immutable after load; readers need no locking
//! - Admin check always wins and ignores host and URI
//! - Rule prefix must be a prefix of the request URI, never the reverse
//! - Rules are scanned in prefix order so diagnostics are reproducible

pub mod engine;
pub mod policy;

pub use engine::{decide, evaluate, AccessRequest, Decision};
pub use policy::{AccessPolicy, HostRules, LocationRule};
