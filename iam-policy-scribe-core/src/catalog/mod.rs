//! In-memory catalog model
//!
//! Services, operations, resource types and condition keys as loaded from the
//! catalog dataset. Every type here is immutable once the [`Store`] is built.

mod access_level;
mod source;
mod store;

pub use access_level::AccessLevel;
pub use source::{CatalogSource, EmbeddedCatalog, JsonBytesSource, JsonFileSource};
pub use store::Store;

use std::collections::HashMap;

use crate::arn::ArnTemplate;
use crate::identifiers::normalize_key;

/// Name used for the wildcard binding in records and filters
pub const WILDCARD: &str = "*";

/// One provider namespace and everything documented under it.
#[derive(Debug, Clone)]
pub struct Service {
    pub(crate) prefix: String,
    pub(crate) name: String,
    pub(crate) authorization_url: String,
    pub(crate) operations: Vec<Operation>,
    pub(crate) resource_types: Vec<ResourceType>,
    pub(crate) condition_keys: Vec<ConditionKey>,
    operation_index: HashMap<String, usize>,
    resource_type_index: HashMap<String, usize>,
    condition_key_index: HashMap<String, usize>,
}

impl Service {
    pub(crate) fn new(
        prefix: String,
        name: String,
        authorization_url: String,
        operations: Vec<Operation>,
        resource_types: Vec<ResourceType>,
        condition_keys: Vec<ConditionKey>,
    ) -> Self {
        let operation_index = index_by(&operations, |o| &o.name);
        let resource_type_index = index_by(&resource_types, |r| &r.name);
        let condition_key_index = index_by(&condition_keys, |c| &c.name);
        Self {
            prefix,
            name,
            authorization_url,
            operations,
            resource_types,
            condition_keys,
            operation_index,
            resource_type_index,
            condition_key_index,
        }
    }

    /// Stored prefix, e.g. `s3`
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Display name, e.g. `Amazon S3`
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Link to the service authorization reference page
    #[must_use]
    pub fn authorization_url(&self) -> &str {
        &self.authorization_url
    }

    /// Operations sorted by name
    #[must_use]
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Case-insensitive operation lookup
    #[must_use]
    pub fn operation(&self, name: &str) -> Option<&Operation> {
        self.operation_index
            .get(&normalize_key(name))
            .map(|&i| &self.operations[i])
    }

    /// Resource types sorted by name
    #[must_use]
    pub fn resource_types(&self) -> &[ResourceType] {
        &self.resource_types
    }

    /// Case-insensitive resource type lookup
    #[must_use]
    pub fn resource_type(&self, name: &str) -> Option<&ResourceType> {
        self.resource_type_index
            .get(&normalize_key(name))
            .map(|&i| &self.resource_types[i])
    }

    /// Condition keys sorted by name
    #[must_use]
    pub fn condition_keys(&self) -> &[ConditionKey] {
        &self.condition_keys
    }

    /// Case-insensitive condition key lookup
    #[must_use]
    pub fn condition_key(&self, name: &str) -> Option<&ConditionKey> {
        self.condition_key_index
            .get(&normalize_key(name))
            .map(|&i| &self.condition_keys[i])
    }
}

fn index_by<T>(items: &[T], name: impl Fn(&T) -> &String) -> HashMap<String, usize> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| (normalize_key(name(item)), i))
        .collect()
}

/// One documented API action ("privilege").
#[derive(Debug, Clone)]
pub struct Operation {
    pub(crate) service: String,
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) access_level: AccessLevel,
    pub(crate) bindings: Vec<ResourceBinding>,
    pub(crate) dependent_operations: Vec<String>,
}

impl Operation {
    /// Stored prefix of the owning service
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Canonical operation name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn access_level(&self) -> AccessLevel {
        self.access_level
    }

    /// Resource bindings in catalog order
    #[must_use]
    pub fn bindings(&self) -> &[ResourceBinding] {
        &self.bindings
    }

    /// Union of the dependent operations declared on every binding
    #[must_use]
    pub fn dependent_operations(&self) -> &[String] {
        &self.dependent_operations
    }

    /// True when no binding names a specific resource type.
    ///
    /// Computed from the bindings on every call.
    #[must_use]
    pub fn is_wildcard_only(&self) -> bool {
        self.bindings.iter().all(ResourceBinding::is_wildcard)
    }

    /// True when one of the bindings is the wildcard binding
    #[must_use]
    pub fn has_wildcard_binding(&self) -> bool {
        self.bindings.iter().any(ResourceBinding::is_wildcard)
    }

    /// Binding to the named resource type, compared case-insensitively
    #[must_use]
    pub fn binding_for(&self, resource_type: &str) -> Option<&ResourceBinding> {
        self.bindings.iter().find(|b| {
            b.resource_type()
                .is_some_and(|name| name.eq_ignore_ascii_case(resource_type))
        })
    }

    /// Every condition key valid in any binding
    pub fn condition_keys(&self) -> impl Iterator<Item = &str> {
        self.bindings
            .iter()
            .flat_map(|b| b.condition_keys.iter().map(String::as_str))
    }
}

/// What a binding scopes an operation to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindingScope {
    /// The unscoped binding; only `Resource: "*"` satisfies it
    Wildcard,
    /// A resource type of the owning service, by canonical name
    ResourceType(String),
}

/// Pairing of an operation with a resource type or the wildcard.
#[derive(Debug, Clone)]
pub struct ResourceBinding {
    pub(crate) scope: BindingScope,
    pub(crate) required: bool,
    pub(crate) condition_keys: Vec<String>,
    pub(crate) dependent_operations: Vec<String>,
}

impl ResourceBinding {
    #[must_use]
    pub const fn scope(&self) -> &BindingScope {
        &self.scope
    }

    #[must_use]
    pub const fn is_wildcard(&self) -> bool {
        matches!(self.scope, BindingScope::Wildcard)
    }

    /// Resource type name, `None` for the wildcard binding
    #[must_use]
    pub fn resource_type(&self) -> Option<&str> {
        match &self.scope {
            BindingScope::Wildcard => None,
            BindingScope::ResourceType(name) => Some(name),
        }
    }

    /// Resource type name, or `*` for the wildcard binding
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.resource_type().unwrap_or(WILDCARD)
    }

    /// Whether the catalog marks this resource as required for the operation
    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub fn condition_keys(&self) -> &[String] {
        &self.condition_keys
    }

    #[must_use]
    pub fn dependent_operations(&self) -> &[String] {
        &self.dependent_operations
    }
}

/// A kind of resource a service defines, with its identifier template.
#[derive(Debug, Clone)]
pub struct ResourceType {
    pub(crate) service: String,
    pub(crate) name: String,
    pub(crate) template: ArnTemplate,
    pub(crate) condition_keys: Vec<String>,
}

impl ResourceType {
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier template, e.g. `arn:${Partition}:s3:::${BucketName}`
    #[must_use]
    pub fn arn_format(&self) -> &str {
        self.template.as_str()
    }

    #[must_use]
    pub const fn template(&self) -> &ArnTemplate {
        &self.template
    }

    #[must_use]
    pub fn condition_keys(&self) -> &[String] {
        &self.condition_keys
    }
}

/// A contextual attribute usable in a statement's condition block.
#[derive(Debug, Clone)]
pub struct ConditionKey {
    pub(crate) service: String,
    pub(crate) name: String,
    pub(crate) value_type: String,
    pub(crate) description: String,
}

impl ConditionKey {
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value type tag such as `String`, `ARN` or `ArrayOfString`
    #[must_use]
    pub fn value_type(&self) -> &str {
        &self.value_type
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}
