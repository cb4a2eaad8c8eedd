//! Policy specification input
//!
//! A specification lists what the caller wants to grant: a resource (a
//! literal identifier or `*`), the access levels wanted on it and an optional
//! condition block.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::{CatalogError, Result};

/// `operator -> condition key -> value(s)`, e.g.
/// `{"StringEquals": {"aws:RequestedRegion": "us-east-1"}}`
pub type ConditionBlock = BTreeMap<String, BTreeMap<String, ConditionValue>>;

/// A condition value: a single string or a list.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ConditionValue {
    Single(String),
    Many(Vec<String>),
}

/// What an entry grants access to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResourceTarget {
    /// A literal resource identifier
    Arn(String),
    /// `*`: only wildcard-only operations are granted
    Wildcard,
}

impl From<String> for ResourceTarget {
    fn from(value: String) -> Self {
        if value.trim() == "*" {
            Self::Wildcard
        } else {
            Self::Arn(value)
        }
    }
}

impl From<ResourceTarget> for String {
    fn from(target: ResourceTarget) -> Self {
        match target {
            ResourceTarget::Arn(identifier) => identifier,
            ResourceTarget::Wildcard => "*".to_string(),
        }
    }
}

/// One grant request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct SpecificationEntry {
    /// Service prefix or alias. Required for wildcard entries; inferred from
    /// the identifier's service field otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[schemars(with = "String")]
    pub resource: ResourceTarget,
    /// Free-text access levels, e.g. `["Read", "permissions management"]`
    pub access_levels: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionBlock>,
}

impl SpecificationEntry {
    /// Entry for a literal resource identifier.
    #[must_use]
    pub fn scoped<S: Into<String>>(identifier: impl Into<String>, access_levels: impl IntoIterator<Item = S>) -> Self {
        Self {
            service: None,
            resource: ResourceTarget::Arn(identifier.into()),
            access_levels: access_levels.into_iter().map(Into::into).collect(),
            condition: None,
        }
    }

    /// Entry for the wildcard-only operations of a service.
    #[must_use]
    pub fn wildcard<S: Into<String>>(service: impl Into<String>, access_levels: impl IntoIterator<Item = S>) -> Self {
        Self {
            service: Some(service.into()),
            resource: ResourceTarget::Wildcard,
            access_levels: access_levels.into_iter().map(Into::into).collect(),
            condition: None,
        }
    }

    #[must_use]
    pub fn with_service(mut self, service: impl Into<String>) -> Self {
        self.service = Some(service.into());
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: ConditionBlock) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// The full synthesis input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct PolicySpecification {
    pub entries: Vec<SpecificationEntry>,
}

impl PolicySpecification {
    #[must_use]
    pub const fn new(entries: Vec<SpecificationEntry>) -> Self {
        Self { entries }
    }

    /// Parse a JSON specification.
    ///
    /// # Errors
    /// `CatalogError::JsonParsing` for malformed input.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CatalogError::json_parsing("policy specification", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_specification_json() {
        let spec = PolicySpecification::from_json(
            r#"{
                "Entries": [
                    {
                        "Service": "s3",
                        "Resource": "arn:aws:s3:::my-bucket",
                        "AccessLevels": ["Permissions management"]
                    },
                    {
                        "Service": "sns",
                        "Resource": "*",
                        "AccessLevels": ["List"],
                        "Condition": {
                            "StringEquals": {"aws:RequestedRegion": "us-east-1"},
                            "ForAnyValue:StringLike": {"aws:TagKeys": ["team", "env"]}
                        }
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(spec.entries.len(), 2);
        assert_eq!(
            spec.entries[0].resource,
            ResourceTarget::Arn("arn:aws:s3:::my-bucket".to_string())
        );
        assert_eq!(spec.entries[1].resource, ResourceTarget::Wildcard);

        let condition = spec.entries[1].condition.as_ref().unwrap();
        assert_eq!(
            condition["StringEquals"]["aws:RequestedRegion"],
            ConditionValue::Single("us-east-1".to_string())
        );
        assert_eq!(
            condition["ForAnyValue:StringLike"]["aws:TagKeys"],
            ConditionValue::Many(vec!["team".to_string(), "env".to_string()])
        );
    }

    #[test]
    fn test_service_is_optional_for_scoped_entries() {
        let spec = PolicySpecification::from_json(
            r#"{"Entries": [{"Resource": "arn:aws:s3:::b", "AccessLevels": ["Read"]}]}"#,
        )
        .unwrap();
        assert!(spec.entries[0].service.is_none());
    }

    #[test]
    fn test_malformed_specification() {
        let err = PolicySpecification::from_json(r#"{"Entries": [{"Resource": 7}]}"#).unwrap_err();
        assert!(matches!(err, CatalogError::JsonParsing { .. }));
    }

    #[test]
    fn test_wildcard_serializes_as_star() {
        let entry = SpecificationEntry::wildcard("sns", ["List"]);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["Resource"], "*");
        assert!(json.get("Condition").is_none());
    }
}
