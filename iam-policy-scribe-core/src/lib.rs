//! This crate provides the core logic for IAM Policy Scribe:
//! - Loading the IAM action catalog (services, operations, resource types, condition keys)
//! - Filtered queries over the catalog
//! - Matching literal resource identifiers to resource types
//! - Dependent operation resolution
//! - Least-privilege policy synthesis
//!

pub mod arn;
pub mod catalog;
mod errors;
pub mod identifiers;
pub mod query;
mod service_configuration;
pub mod synthesis;

// Re-exports for a small, focused public API
pub use arn::{match_resource_type, ArnTemplate};
pub use catalog::{
    AccessLevel, CatalogSource, EmbeddedCatalog, JsonBytesSource, JsonFileSource, Operation,
    ResourceType, Service, Store,
};
pub use errors::{CatalogError, Result};
pub use identifiers::{QualifiedName, ServiceAliases, ALL_SERVICES};
pub use query::{
    all_doc_links, dependent_operations_of, operation_record, operations_matching_arn,
    query_condition_keys, query_operation_names, query_operations, query_resource_types,
    query_services, retain_access_level, retain_wildcard_only, OperationFilters,
    OperationRecord,
};
pub use service_configuration::{doc_link, ServiceConfiguration};
pub use synthesis::{
    synthesize_policy, PolicyDocument, PolicySpecification, SpecificationEntry, Statement,
    Synthesis, SynthesisWarning,
};
