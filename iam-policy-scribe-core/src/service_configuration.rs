//! Service configuration loader.
//!
//! This module loads the embedded service configuration: the legacy service
//! alias table and the documentation roots used to derive API reference
//! links. The configuration is loaded alongside the catalog and travels inside
//! the [`Store`](crate::Store); nothing here is process-global.

use crate::errors::{CatalogError, Result};
use crate::identifiers::ServiceAliases;
use rust_embed::RustEmbed;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};

/// Template used when neither the configuration nor the caller supplies a
/// documentation root. `{service}` is replaced by the service prefix.
pub(crate) const DEFAULT_DOCUMENTATION_ROOT: &str =
    "https://docs.aws.amazon.com/{service}/latest/APIReference";

/// Service configuration
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceConfiguration {
    /// Logical service name to the stored prefixes it merges, modern prefix first
    #[serde(default)]
    pub(crate) legacy_service_aliases: BTreeMap<String, Vec<String>>,
    /// Root used for services without an entry in `documentation_roots`
    #[serde(default = "default_documentation_root")]
    pub(crate) default_documentation_root: String,
    /// Per-service API reference roots
    #[serde(default)]
    pub(crate) documentation_roots: HashMap<String, String>,
}

fn default_documentation_root() -> String {
    DEFAULT_DOCUMENTATION_ROOT.to_string()
}

impl Default for ServiceConfiguration {
    fn default() -> Self {
        Self {
            legacy_service_aliases: BTreeMap::new(),
            default_documentation_root: default_documentation_root(),
            documentation_roots: HashMap::new(),
        }
    }
}

impl ServiceConfiguration {
    /// Load the configuration bundled with the crate.
    ///
    /// # Errors
    /// Returns `CatalogError::Configuration` if the embedded file is missing or
    /// not UTF-8, `CatalogError::JsonParsing` if it does not deserialize, and
    /// any alias-table validation error.
    pub fn embedded() -> Result<Self> {
        let embedded_file = EmbeddedServiceConfig::get(SERVICE_CONFIGURATION_FILE).ok_or_else(
            || CatalogError::configuration("Embedded service configuration file not found"),
        )?;

        let json_str = std::str::from_utf8(&embedded_file.data).map_err(|e| {
            CatalogError::configuration_with_source(
                "Invalid UTF-8 in embedded service configuration",
                e,
            )
        })?;

        Self::from_json(json_str)
    }

    /// Parse a configuration document.
    ///
    /// # Errors
    /// Returns `CatalogError::JsonParsing` for malformed JSON and
    /// `CatalogError::Configuration` for an inconsistent alias table.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CatalogError::json_parsing("service configuration", e))?;
        // Validates the alias table eagerly so a broken table fails at load.
        config.aliases()?;
        Ok(config)
    }

    /// Replace the alias table.
    #[must_use]
    pub fn with_legacy_aliases(mut self, aliases: BTreeMap<String, Vec<String>>) -> Self {
        self.legacy_service_aliases = aliases;
        self
    }

    /// Build the alias table described by this configuration.
    pub(crate) fn aliases(&self) -> Result<ServiceAliases> {
        ServiceAliases::new(&self.legacy_service_aliases)
    }

    /// API reference link for an operation, honoring per-service roots.
    #[must_use]
    pub fn doc_link(&self, service: &str, operation: &str) -> String {
        let root = self
            .documentation_roots
            .get(service)
            .map_or_else(
                || self.default_documentation_root.replace("{service}", service),
                Clone::clone,
            );
        format!("{}/API_{operation}.html", root.trim_end_matches('/'))
    }
}

/// API reference link for an operation using the default documentation root.
///
/// Pure string templating, no network access:
///
/// ```
/// assert_eq!(
///     iam_policy_scribe_core::doc_link("cloud9", "CreateEnvironmentEC2"),
///     "https://docs.aws.amazon.com/cloud9/latest/APIReference/API_CreateEnvironmentEC2.html"
/// );
/// ```
#[must_use]
pub fn doc_link(service: &str, operation: &str) -> String {
    ServiceConfiguration::default().doc_link(service, operation)
}

const SERVICE_CONFIGURATION_FILE: &str = "service-configuration.json";

/// Embedded service configuration data
#[derive(RustEmbed)]
#[folder = "resources/config"]
#[include = "service-configuration.json"]
struct EmbeddedServiceConfig;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_service_configuration_embedded() {
        let config = ServiceConfiguration::embedded().unwrap();

        assert!(!config.legacy_service_aliases.is_empty());

        // Loading twice yields the same content since there is no shared cache.
        let config2 = ServiceConfiguration::embedded().unwrap();
        assert_eq!(
            config.legacy_service_aliases,
            config2.legacy_service_aliases
        );
    }

    #[test]
    fn test_embedded_service_configuration_content() {
        let config = ServiceConfiguration::embedded().unwrap();

        assert_eq!(
            config.legacy_service_aliases.get("elasticloadbalancing"),
            Some(&vec![
                "elasticloadbalancing".to_string(),
                "elasticloadbalancing-v2".to_string()
            ])
        );
        assert_eq!(
            config.doc_link("sns", "ListSubscriptions"),
            "https://docs.aws.amazon.com/sns/latest/api/API_ListSubscriptions.html"
        );
    }

    #[test]
    fn test_doc_link_falls_back_to_default_root() {
        let config = ServiceConfiguration::embedded().unwrap();
        assert_eq!(
            config.doc_link("ram", "TagResource"),
            "https://docs.aws.amazon.com/ram/latest/APIReference/API_TagResource.html"
        );
        assert_eq!(
            doc_link("ram", "TagResource"),
            config.doc_link("ram", "TagResource")
        );
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = ServiceConfiguration::from_json("{}").unwrap();
        assert!(config.legacy_service_aliases.is_empty());
        assert!(config
            .doc_link("kms", "Decrypt")
            .starts_with("https://docs.aws.amazon.com/kms/"));
    }

    #[test]
    fn test_invalid_alias_table_is_rejected() {
        let json = r#"{
            "LegacyServiceAliases": {
                "one": ["a", "shared"],
                "two": ["b", "shared"]
            }
        }"#;
        let err = ServiceConfiguration::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::Configuration { .. }));
    }

    #[test]
    fn test_malformed_configuration_is_a_json_error() {
        let err = ServiceConfiguration::from_json("{ not json").unwrap_err();
        assert!(matches!(err, CatalogError::JsonParsing { .. }));
    }
}
