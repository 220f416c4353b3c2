//! Authorization decisions.
//!
//! # Evaluation order
//! 1. Admin users are allowed without looking at host or URI.
//! 2. Unknown hosts are denied.
//! 3. Every location rule of the host whose prefix starts the URI is
//!    checked, in prefix order; the first one listing the user allows.
//! 4. Anything else is denied.
//!
//! Evaluation is total and never fails. Tracing events are informational only.

use std::fmt;

use crate::authz::policy::AccessPolicy;

/// The three request attributes handed over by the proxy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRequest<'a> {
    pub user: &'a str,
    pub uri: &'a str,
    pub host: &'a str,
}

impl<'a> AccessRequest<'a> {
    pub fn new(user: &'a str, uri: &'a str, host: &'a str) -> Self {
        Self { user, uri, host }
    }

    /// True when any attribute is empty. Such requests are rejected before
    /// reaching the engine.
    pub fn is_incomplete(&self) -> bool {
        self.user.is_empty() || self.uri.is_empty() || self.host.is_empty()
    }
}

/// Outcome of an evaluation, including which branch decided it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// User is listed in `admins`.
    Admin,
    /// A location rule with this prefix lists the user.
    Location { prefix: String },
    /// The host has no rules.
    UnknownHost,
    /// No matching location rule lists the user.
    NoMatchingRule,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Admin | Decision::Location { .. })
    }

    /// Stable label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Decision::Admin => "admin",
            Decision::Location { .. } => "location",
            Decision::UnknownHost => "unknown_host",
            Decision::NoMatchingRule => "no_matching_rule",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Admin => write!(f, "allow (admin)"),
            Decision::Location { prefix } => write!(f, "allow (location {prefix})"),
            Decision::UnknownHost => write!(f, "deny (unknown host)"),
            Decision::NoMatchingRule => write!(f, "deny (no matching rule)"),
        }
    }
}

/// Evaluate a request against the policy.
pub fn evaluate(policy: &AccessPolicy, request: &AccessRequest<'_>) -> Decision {
    let AccessRequest { user, uri, host } = *request;

    if policy.is_admin(user) {
        tracing::debug!(user = %user, "User is admin");
        return Decision::Admin;
    }

    let Some(rules) = policy.host(host) else {
        tracing::info!(user = %user, host = %host, uri = %uri, "User not authorized: unknown host");
        return Decision::UnknownHost;
    };

    for rule in rules.matching(uri) {
        tracing::debug!(uri = %uri, location = %rule.prefix(), "URI matches location rule");

        if rule.allows(user) {
            tracing::debug!(
                user = %user,
                allowed_users = ?rule.allowed_users().collect::<Vec<_>>(),
                "Authorizing user"
            );
            return Decision::Location {
                prefix: rule.prefix().to_string(),
            };
        }
    }

    tracing::info!(user = %user, host = %host, uri = %uri, "User not authorized");
    Decision::NoMatchingRule
}

/// Boolean verdict for `(user, uri, host)`.
pub fn decide(policy: &AccessPolicy, user: &str, uri: &str, host: &str) -> bool {
    evaluate(policy, &AccessRequest::new(user, uri, host)).is_allowed()
}
