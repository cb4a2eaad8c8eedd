//! Serializable query results
//!
//! Flat views over catalog entities for callers that render or ship results.
//! Catalog types stay borrow-based; these own their data.

use schemars::JsonSchema;
use serde::Serialize;

use crate::catalog::{
    AccessLevel, ConditionKey, Operation, ResourceBinding, ResourceType, Service, Store, WILDCARD,
};

/// An operation with everything callers ask about it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct OperationRecord {
    /// `namespace:Operation`
    pub name: String,
    /// Stored prefix the operation is documented under
    pub service: String,
    pub description: String,
    pub access_level: AccessLevel,
    pub documentation_link: String,
    pub wildcard_only: bool,
    pub resources: Vec<BindingRecord>,
}

impl OperationRecord {
    /// Record for the qualified name `operation` is written under. When
    /// several alias members define that name, their bindings are
    /// concatenated and the first member supplies the descriptive fields.
    pub(crate) fn new(store: &Store, operation: &Operation) -> Self {
        let members = store.operations_sharing_name(operation);
        let primary = members.first().copied().unwrap_or(operation);

        let mut resources: Vec<BindingRecord> = Vec::new();
        for member in &members {
            for binding in member.bindings() {
                let record = BindingRecord::new(store, member, binding);
                if !resources.contains(&record) {
                    resources.push(record);
                }
            }
        }

        Self {
            name: store.qualified_name(primary),
            service: primary.service().to_string(),
            description: primary.description().to_string(),
            access_level: primary.access_level(),
            documentation_link: store.doc_link(primary),
            wildcard_only: members.iter().all(|member| member.is_wildcard_only()),
            resources,
        }
    }
}

/// One resource binding of an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct BindingRecord {
    /// Resource type name, or `*`
    pub resource_type: String,
    /// Identifier template, or `*`
    pub arn_format: String,
    pub required: bool,
    pub condition_keys: Vec<String>,
    pub dependent_operations: Vec<String>,
}

impl BindingRecord {
    fn new(store: &Store, operation: &Operation, binding: &ResourceBinding) -> Self {
        let arn_format = binding
            .resource_type()
            .and_then(|name| store.resource_type(operation.service(), name))
            .map_or(WILDCARD, ResourceType::arn_format);
        Self {
            resource_type: binding.display_name().to_string(),
            arn_format: arn_format.to_string(),
            required: binding.is_required(),
            condition_keys: binding.condition_keys().to_vec(),
            dependent_operations: binding.dependent_operations().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ResourceTypeRecord {
    pub service: String,
    pub name: String,
    pub arn_format: String,
    /// Placeholder names in the template, in order
    pub placeholders: Vec<String>,
    pub condition_keys: Vec<String>,
}

impl From<&ResourceType> for ResourceTypeRecord {
    fn from(resource_type: &ResourceType) -> Self {
        Self {
            service: resource_type.service().to_string(),
            name: resource_type.name().to_string(),
            arn_format: resource_type.arn_format().to_string(),
            placeholders: resource_type.template().placeholders().to_vec(),
            condition_keys: resource_type.condition_keys().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ConditionKeyRecord {
    pub service: String,
    pub name: String,
    #[serde(rename = "Type")]
    pub value_type: String,
    pub description: String,
}

impl From<&ConditionKey> for ConditionKeyRecord {
    fn from(key: &ConditionKey) -> Self {
        Self {
            service: key.service().to_string(),
            name: key.name().to_string(),
            value_type: key.value_type().to_string(),
            description: key.description().to_string(),
        }
    }
}

/// One row of the service table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceRecord {
    pub prefix: String,
    /// Namespace used in qualified names; differs from the prefix for legacy
    /// alias members
    pub namespace: String,
    pub name: String,
    pub authorization_url: String,
    pub operation_count: usize,
    pub resource_type_count: usize,
    pub condition_key_count: usize,
}

impl ServiceRecord {
    pub(crate) fn new(store: &Store, service: &Service) -> Self {
        Self {
            prefix: service.prefix().to_string(),
            namespace: store.aliases().logical(service.prefix()).to_string(),
            name: service.name().to_string(),
            authorization_url: service.authorization_url().to_string(),
            operation_count: service.operations().len(),
            resource_type_count: service.resource_types().len(),
            condition_key_count: service.condition_keys().len(),
        }
    }
}
