//! Identifier normalization
//!
//! Case-insensitive lookup keys, `service:Operation` parsing and the legacy
//! service alias table. Everything that needs to compare a caller-supplied
//! name against the catalog goes through this module.

use derive_new::new;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::errors::{CatalogError, Result};

/// Pseudo-service that expands to every service in the catalog
pub const ALL_SERVICES: &str = "all";

/// Lowercase lookup key for case-insensitive indices.
#[must_use]
pub fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A `service:Operation` pair as written by callers.
///
/// Parsing only validates shape; the casing is whatever the caller typed.
/// Canonical casing comes from the catalog once the name is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, new)]
pub struct QualifiedName {
    /// Service prefix part
    pub service: String,
    /// Operation name part
    pub operation: String,
}

impl QualifiedName {
    /// Parse a `service:Operation` string.
    ///
    /// # Errors
    /// `CatalogError::MalformedIdentifier` if the input does not contain exactly
    /// one `:` with non-empty text on both sides, or contains whitespace.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::malformed(input, "empty action name"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(CatalogError::malformed(input, "action names cannot contain whitespace"));
        }

        let mut parts = trimmed.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(service), Some(operation), None) if !service.is_empty() && !operation.is_empty() => {
                Ok(Self::new(service.to_string(), operation.to_string()))
            }
            (_, None, _) => Err(CatalogError::malformed(
                input,
                "expected the form 'service:Operation'",
            )),
            (_, Some(_), Some(_)) => Err(CatalogError::malformed(
                input,
                "action names contain exactly one ':'",
            )),
            _ => Err(CatalogError::malformed(
                input,
                "service prefix and operation name must both be non-empty",
            )),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.service, self.operation)
    }
}

/// The legacy service alias table.
///
/// Some logical services are documented under more than one prefix. The
/// catalog keeps every prefix as its own service; this table merges them at
/// query time. Lookups work in both directions: a logical name expands to its
/// member prefixes, and a member prefix maps back to the logical name that is
/// used as the action namespace in qualified names.
#[derive(Debug, Clone, Default)]
pub struct ServiceAliases {
    members: BTreeMap<String, Vec<String>>,
    logical: HashMap<String, String>,
}

impl ServiceAliases {
    /// Build the table from `logical name -> member prefixes`.
    ///
    /// # Errors
    /// `CatalogError::Configuration` when a logical name has no members, or a
    /// member prefix is claimed by two logical names.
    pub fn new(table: &BTreeMap<String, Vec<String>>) -> Result<Self> {
        let mut members = BTreeMap::new();
        let mut logical = HashMap::new();

        for (name, prefixes) in table {
            let name = normalize_key(name);
            if prefixes.is_empty() {
                return Err(CatalogError::configuration(format!(
                    "Legacy alias '{name}' has no member prefixes"
                )));
            }

            let mut expanded = Vec::with_capacity(prefixes.len());
            for prefix in prefixes {
                let prefix = normalize_key(prefix);
                if let Some(previous) = logical.insert(prefix.clone(), name.clone()) {
                    if previous != name {
                        return Err(CatalogError::configuration(format!(
                            "Prefix '{prefix}' is aliased by both '{previous}' and '{name}'"
                        )));
                    }
                    continue;
                }
                expanded.push(prefix);
            }
            members.insert(name, expanded);
        }

        Ok(Self { members, logical })
    }

    /// Member prefixes for a logical name, modern prefix first.
    ///
    /// Returns `None` when the name is not a logical alias.
    #[must_use]
    pub fn members(&self, name: &str) -> Option<&[String]> {
        self.members.get(&normalize_key(name)).map(Vec::as_slice)
    }

    /// The logical name a stored prefix belongs to, or the prefix itself when
    /// it is not part of any alias.
    #[must_use]
    pub fn logical<'a>(&'a self, prefix: &'a str) -> &'a str {
        self.logical
            .get(prefix)
            .map_or(prefix, String::as_str)
    }

    /// Whether the prefix is aliased by some logical name.
    #[must_use]
    pub fn is_member(&self, prefix: &str) -> bool {
        self.logical.contains_key(&normalize_key(prefix))
    }

    /// Logical names in the table.
    pub fn logical_names(&self) -> impl Iterator<Item = &str> {
        self.members.keys().map(String::as_str)
    }
}
