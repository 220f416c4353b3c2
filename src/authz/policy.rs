//! Compiled access policy.
//!
//! Built once from an [`AccessDocument`] and never mutated afterwards, so it
//! can be shared between request handlers behind an `Arc` without locking.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::config::schema::{AccessDocument, HostDocument, LocationDocument};

/// Process-wide access configuration: admins plus per-host location rules.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    admins: HashSet<String>,
    hosts: HashMap<String, HostRules>,
}

impl AccessPolicy {
    /// Compile a parsed access document.
    pub fn from_document(document: AccessDocument) -> Self {
        let admins = document.admins.into_iter().collect();
        let hosts = document
            .hosts
            .into_iter()
            .map(|(host, rules)| (host, HostRules::from_document(rules)))
            .collect();

        Self { admins, hosts }
    }

    /// Exact, case-sensitive admin membership.
    pub fn is_admin(&self, user: &str) -> bool {
        self.admins.contains(user)
    }

    /// Location rules for `host` (exact match).
    pub fn host(&self, host: &str) -> Option<&HostRules> {
        self.hosts.get(host)
    }

    pub fn admin_count(&self) -> usize {
        self.admins.len()
    }

    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    /// Total number of location rules across all hosts.
    pub fn rule_count(&self) -> usize {
        self.hosts.values().map(|h| h.rules.len()).sum()
    }

    /// Rebuild the wire document. Users and admins come out sorted.
    pub fn to_document(&self) -> AccessDocument {
        let mut admins: Vec<String> = self.admins.iter().cloned().collect();
        admins.sort();

        let hosts = self
            .hosts
            .iter()
            .map(|(host, rules)| (host.clone(), rules.to_document()))
            .collect();

        AccessDocument { admins, hosts }
    }
}

/// The location rules of one host, ordered by prefix.
#[derive(Debug, Clone, Default)]
pub struct HostRules {
    rules: Vec<LocationRule>,
}

impl HostRules {
    fn from_document(document: HostDocument) -> Self {
        // BTreeMap iteration already yields prefixes in byte order.
        let rules = document
            .locations
            .into_iter()
            .map(|(prefix, location)| LocationRule::new(prefix, location.users))
            .collect();

        Self { rules }
    }

    fn to_document(&self) -> HostDocument {
        let locations = self
            .rules
            .iter()
            .map(|rule| {
                let location = LocationDocument {
                    users: rule.allowed_users.iter().cloned().collect(),
                    location: None,
                };
                (rule.prefix.clone(), location)
            })
            .collect();

        HostDocument { locations }
    }

    /// Rules in ascending prefix order.
    pub fn rules(&self) -> &[LocationRule] {
        &self.rules
    }

    /// Rules whose prefix matches `uri`, in ascending prefix order.
    pub fn matching<'a>(&'a self, uri: &'a str) -> impl Iterator<Item = &'a LocationRule> + 'a {
        self.rules.iter().filter(move |rule| rule.matches(uri))
    }
}

/// A configured path prefix and the users allowed below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationRule {
    prefix: String,
    allowed_users: BTreeSet<String>,
}

impl LocationRule {
    pub fn new(prefix: impl Into<String>, users: impl IntoIterator<Item = String>) -> Self {
        Self {
            prefix: prefix.into(),
            allowed_users: users.into_iter().collect(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn allowed_users(&self) -> impl Iterator<Item = &str> {
        self.allowed_users.iter().map(String::as_str)
    }

    /// True when the rule prefix is a byte-wise prefix of the request URI.
    ///
    /// The opposite direction (request URI shorter than the rule) never matches:
    /// a rule for `/private/data` says nothing about `/private`.
    pub fn matches(&self, uri: &str) -> bool {
        uri.starts_with(&self.prefix)
    }

    /// Membership test. The empty user is never allowed, even if listed.
    pub fn allows(&self, user: &str) -> bool {
        !user.is_empty() && self.allowed_users.contains(user)
    }
}
