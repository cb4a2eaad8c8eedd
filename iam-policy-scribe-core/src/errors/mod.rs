//! Error handling module

use std::path::PathBuf;
use thiserror::Error;

use crate::synthesis::SynthesisWarning;

/// Result type alias for operations that can fail with `CatalogError`
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Error type for loading the catalog, querying it and synthesizing policies.
///
/// The first group of variants is the lookup taxonomy surfaced to callers of
/// the query engine and the policy synthesizer. The remaining variants cover
/// loading the catalog and validating caller input.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A service prefix that is not in the catalog
    #[error("Unknown service '{service}'{}", suggestion_suffix(.suggestion.as_deref()))]
    UnknownService {
        /// The service prefix that was requested
        service: String,
        /// Closest known prefix, if one is reasonably similar
        suggestion: Option<String>,
    },

    /// An operation name that does not exist in the named service
    #[error("Unknown action '{action}' in service '{service}'")]
    UnknownAction {
        /// Service prefix that was searched
        service: String,
        /// Operation name as requested
        action: String,
    },

    /// An access level outside of the closed set
    #[error("Unknown access level '{value}'. Expected one of: List, Read, Write, Tagging, Permissions management")]
    UnknownAccessLevel {
        /// The raw value that failed to normalize
        value: String,
    },

    /// A resource type name that does not exist in the named service
    #[error("Unknown resource type '{resource_type}' in service '{service}'")]
    UnknownResourceType {
        /// Service prefix that was searched
        service: String,
        /// Resource type name as requested
        resource_type: String,
    },

    /// A condition key that does not exist in the named service
    #[error("Unknown condition key '{condition_key}' in service '{service}'")]
    UnknownConditionKey {
        /// Service prefix that was searched
        service: String,
        /// Condition key name as requested
        condition_key: String,
    },

    /// Input that is not a well-formed qualified name or resource identifier
    #[error("Malformed identifier '{identifier}': {reason}")]
    MalformedIdentifier {
        /// The offending input
        identifier: String,
        /// What is wrong with it
        reason: String,
    },

    /// A resource identifier that cannot be scoped to any resource type
    #[error("Unable to resolve a resource type for '{identifier}' in service '{service}': {reason}")]
    UnresolvedResourceType {
        /// Service prefix the identifier was matched against
        service: String,
        /// The literal resource identifier
        identifier: String,
        /// Why resolution failed
        reason: String,
    },

    /// A resource identifier that matches several resource types equally well
    #[error("Resource identifier '{identifier}' matches several resource types in service '{service}': {}", .candidates.join(", "))]
    AmbiguousResourceType {
        /// Service prefix the identifier was matched against
        service: String,
        /// The literal resource identifier
        identifier: String,
        /// Names of the equally specific resource types
        candidates: Vec<String>,
    },

    /// File system operation errors with detailed context
    #[error("File system error during {operation} on path '{path}': {source}")]
    FileSystem {
        /// The operation that failed (e.g., "read")
        operation: String,
        /// The file path involved in the operation
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing and serialization errors with context
    #[error("JSON parsing error in {context}: {source}")]
    JsonParsing {
        /// Context where the JSON error occurred (e.g., "catalog", "service configuration")
        context: String,
        /// The underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Catalog content that violates the data model
    #[error("Invalid catalog data for service '{service}': {message}")]
    InvalidCatalog {
        /// Service prefix whose data is invalid
        service: String,
        /// Detailed error message
        message: String,
    },

    /// Configuration validation and setup errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// Detailed error message about the configuration issue
        message: String,
        /// Optional underlying error that caused the configuration failure
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// An operation-name glob that cannot be compiled
    #[error("Invalid name pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as given
        pattern: String,
        /// The underlying glob error
        #[source]
        source: glob::PatternError,
    },

    /// Every specification entry failed, so no statement could be written
    #[error("No policy statements could be synthesized ({} of the specification entries failed)", .failures.len())]
    NothingToGrant {
        /// The per-entry failures
        failures: Vec<SynthesisWarning>,
    },
}

fn suggestion_suffix(suggestion: Option<&str>) -> String {
    suggestion.map_or_else(String::new, |s| format!(". Did you mean '{s}'?"))
}

impl CatalogError {
    /// Create a file system error with operation context
    pub(crate) fn file_system(
        operation: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            operation: operation.into(),
            path: path.into(),
            source,
        }
    }

    /// Create a JSON parsing error with context
    pub(crate) fn json_parsing(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::JsonParsing {
            context: context.into(),
            source,
        }
    }

    /// Create an unknown service error
    pub(crate) fn unknown_service(service: impl Into<String>, suggestion: Option<String>) -> Self {
        Self::UnknownService {
            service: service.into(),
            suggestion,
        }
    }

    /// Create an unknown action error
    pub(crate) fn unknown_action(service: impl Into<String>, action: impl Into<String>) -> Self {
        Self::UnknownAction {
            service: service.into(),
            action: action.into(),
        }
    }

    pub(crate) fn unknown_access_level(value: impl Into<String>) -> Self {
        Self::UnknownAccessLevel {
            value: value.into(),
        }
    }

    pub(crate) fn unknown_resource_type(
        service: impl Into<String>,
        resource_type: impl Into<String>,
    ) -> Self {
        Self::UnknownResourceType {
            service: service.into(),
            resource_type: resource_type.into(),
        }
    }

    pub(crate) fn unknown_condition_key(
        service: impl Into<String>,
        condition_key: impl Into<String>,
    ) -> Self {
        Self::UnknownConditionKey {
            service: service.into(),
            condition_key: condition_key.into(),
        }
    }

    /// Create a malformed identifier error
    pub(crate) fn malformed(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedIdentifier {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Create an unresolved resource type error
    pub(crate) fn unresolved_resource_type(
        service: impl Into<String>,
        identifier: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::UnresolvedResourceType {
            service: service.into(),
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid catalog error
    pub(crate) fn invalid_catalog(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCatalog {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error with source
    pub(crate) fn configuration_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Configuration {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a configuration error
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            source: None,
        }
    }

    /// Whether this error belongs to the lookup taxonomy rather than to
    /// loading or configuration.
    #[must_use]
    pub const fn is_lookup_failure(&self) -> bool {
        matches!(
            self,
            Self::UnknownService { .. }
                | Self::UnknownAction { .. }
                | Self::UnknownAccessLevel { .. }
                | Self::UnknownResourceType { .. }
                | Self::UnknownConditionKey { .. }
                | Self::MalformedIdentifier { .. }
                | Self::UnresolvedResourceType { .. }
                | Self::AmbiguousResourceType { .. }
        )
    }
}

/// Convert common standard library errors to `CatalogError`
impl From<std::io::Error> for CatalogError {
    fn from(error: std::io::Error) -> Self {
        Self::FileSystem {
            operation: "unknown operation".to_string(),
            path: PathBuf::from("unknown path"),
            source: error,
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(error: serde_json::Error) -> Self {
        Self::JsonParsing {
            context: "unknown context".to_string(),
            source: error,
        }
    }
}
