//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! access document (JSON)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (lint, warnings only)
//!     → AccessPolicy (compiled, immutable)
//!     → shared via Arc with the HTTP handlers
//!
//! command-line flags
//!     → ServiceConfig (listener, timeouts, observability)
//! ```
//!
//! # Design Decisions
//! - Loaded once at startup; there is no reload path
//! - Missing collections default to empty, malformed JSON is fatal
//! - Wire types (schema.rs) are kept separate from the compiled policy

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_document_file, load_policy, load_policy_file, parse_document, ConfigError};
pub use schema::{
    AccessDocument, HostDocument, ListenerConfig, LocationDocument, ObservabilityConfig,
    ServiceConfig, TimeoutConfig,
};
pub use validation::{lint_document, ValidationWarning};
