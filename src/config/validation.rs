//! Access document linting.
//!
//! # Responsibilities
//! - Flag entries that parse fine but can never grant anything
//! - Flag location prefixes that cannot match a normal request path
//!
//! # Design Decisions
//! - Returns every finding, not just the first
//! - Findings are warnings only; a parseable document is always accepted
//! - Pure function: AccessDocument → Vec<ValidationWarning>

use std::fmt;

use crate::config::schema::AccessDocument;

/// A suspicious but accepted part of the access document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Host entry without any locations.
    HostWithoutLocations { host: String },
    /// Location entry without any users.
    LocationWithoutUsers { host: String, prefix: String },
    /// Location prefix that does not start with `/`.
    RelativePrefix { host: String, prefix: String },
    /// Empty string listed as admin.
    EmptyAdmin,
    /// Empty string listed as a location user.
    EmptyUser { host: String, prefix: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HostWithoutLocations { host } => write!(f, "host {host:?} has no locations"),
            Self::LocationWithoutUsers { host, prefix } => {
                write!(f, "location {prefix:?} on host {host:?} has no users")
            }
            Self::RelativePrefix { host, prefix } => {
                write!(f, "location {prefix:?} on host {host:?} does not start with '/'")
            }
            Self::EmptyAdmin => write!(f, "admins contains an empty user"),
            Self::EmptyUser { host, prefix } => {
                write!(f, "location {prefix:?} on host {host:?} lists an empty user, which never matches")
            }
        }
    }
}

/// Lint a parsed access document.
pub fn lint_document(document: &AccessDocument) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if document.admins.iter().any(String::is_empty) {
        warnings.push(ValidationWarning::EmptyAdmin);
    }

    for (host, rules) in &document.hosts {
        if rules.locations.is_empty() {
            warnings.push(ValidationWarning::HostWithoutLocations { host: host.clone() });
        }

        for (prefix, location) in &rules.locations {
            if !prefix.is_empty() && !prefix.starts_with('/') {
                warnings.push(ValidationWarning::RelativePrefix {
                    host: host.clone(),
                    prefix: prefix.clone(),
                });
            }
            if location.users.is_empty() {
                warnings.push(ValidationWarning::LocationWithoutUsers {
                    host: host.clone(),
                    prefix: prefix.clone(),
                });
            }
            if location.users.iter().any(String::is_empty) {
                warnings.push(ValidationWarning::EmptyUser {
                    host: host.clone(),
                    prefix: prefix.clone(),
                });
            }
        }
    }

    warnings
}
