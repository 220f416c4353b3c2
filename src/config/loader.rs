//! Access document loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::authz::AccessPolicy;
use crate::config::schema::AccessDocument;

/// Error type for configuration loading. Both variants are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse access document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a JSON access document.
///
/// Missing or null `admins`/`hosts` yield empty collections. Anything that is
/// not well-formed JSON of the expected shape is an error.
pub fn parse_document(bytes: &[u8]) -> Result<AccessDocument, ConfigError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Parse and compile a JSON access document.
pub fn load_policy(bytes: &[u8]) -> Result<AccessPolicy, ConfigError> {
    parse_document(bytes).map(AccessPolicy::from_document)
}

/// Read and parse the access document at `path`.
pub fn load_document_file(path: &Path) -> Result<AccessDocument, ConfigError> {
    let content = fs::read(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    parse_document(&content)
}

/// Read, parse and compile the access document at `path`.
pub fn load_policy_file(path: &Path) -> Result<AccessPolicy, ConfigError> {
    load_document_file(path).map(AccessPolicy::from_document)
}
