//! Catalog queries
//!
//! Filtered listings and specific-entity lookups over a [`Store`]. Listing
//! queries treat an unknown service as "nothing matches" and return an empty
//! result; specific-entity queries report precisely what was not found.
//!
//! Service arguments accept a stored prefix, a legacy alias (which merges its
//! member prefixes) or `all`.

mod dependents;
mod records;

pub use dependents::dependent_operations_of;
pub(crate) use dependents::{resolve_dependents, Dependent};
pub use records::{
    BindingRecord, ConditionKeyRecord, OperationRecord, ResourceTypeRecord, ServiceRecord,
};

use glob::{MatchOptions, Pattern};
use log::debug;
use std::collections::BTreeMap;

use crate::arn::{match_resource_type, service_of};
use crate::catalog::{AccessLevel, Operation, Store, WILDCARD};
use crate::errors::{CatalogError, Result};
use crate::identifiers::{normalize_key, QualifiedName};

const CASE_INSENSITIVE: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Operation filters, combined with AND. The default matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationFilters {
    pub access_level: Option<AccessLevel>,
    /// Resource type name, or `*` for operations with the wildcard binding
    pub resource_type: Option<String>,
    /// Case-insensitive substring of any condition key of any binding
    pub condition_key: Option<String>,
    /// Keep only wildcard-only operations
    pub wildcard_only: bool,
    /// Case-insensitive glob over the operation name, e.g. `List*`
    pub name: Option<String>,
}

impl OperationFilters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_access_level(mut self, level: AccessLevel) -> Self {
        self.access_level = Some(level);
        self
    }

    /// Access level given as free text, e.g. `"permissions management"`.
    ///
    /// # Errors
    /// `CatalogError::UnknownAccessLevel`.
    pub fn with_access_level_named(self, level: &str) -> Result<Self> {
        Ok(self.with_access_level(level.parse()?))
    }

    #[must_use]
    pub fn with_resource_type(mut self, resource_type: impl Into<String>) -> Self {
        self.resource_type = Some(resource_type.into());
        self
    }

    #[must_use]
    pub fn with_condition_key(mut self, condition_key: impl Into<String>) -> Self {
        self.condition_key = Some(condition_key.into());
        self
    }

    #[must_use]
    pub const fn wildcard_only(mut self) -> Self {
        self.wildcard_only = true;
        self
    }

    #[must_use]
    pub fn with_name(mut self, pattern: impl Into<String>) -> Self {
        self.name = Some(pattern.into());
        self
    }

    fn compile(&self) -> Result<CompiledFilters<'_>> {
        let name = self
            .name
            .as_deref()
            .map(|pattern| {
                Pattern::new(pattern).map_err(|source| CatalogError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()?;
        Ok(CompiledFilters {
            filters: self,
            name,
            condition_key: self.condition_key.as_deref().map(normalize_key),
        })
    }
}

struct CompiledFilters<'f> {
    filters: &'f OperationFilters,
    name: Option<Pattern>,
    condition_key: Option<String>,
}

impl CompiledFilters<'_> {
    fn matches(&self, operation: &Operation) -> bool {
        let filters = self.filters;
        if filters
            .access_level
            .is_some_and(|level| operation.access_level() != level)
        {
            return false;
        }
        if filters.wildcard_only && !operation.is_wildcard_only() {
            return false;
        }
        if let Some(resource_type) = filters.resource_type.as_deref() {
            let bound = if resource_type.trim() == WILDCARD {
                operation.has_wildcard_binding()
            } else {
                operation.binding_for(resource_type.trim()).is_some()
            };
            if !bound {
                return false;
            }
        }
        if let Some(needle) = self.condition_key.as_deref() {
            if !operation
                .condition_keys()
                .any(|key| key.to_lowercase().contains(needle))
            {
                return false;
            }
        }
        if let Some(pattern) = &self.name {
            if !pattern.matches_with(operation.name(), CASE_INSENSITIVE) {
                return false;
            }
        }
        true
    }
}

/// Matching operations keyed by qualified name, sorted and de-duplicated.
///
/// Alias members are visited in configuration order, so when two prefixes
/// define the same qualified name the first member wins.
fn select<'s>(
    store: &'s Store,
    service: &str,
    filters: &OperationFilters,
) -> Result<Vec<(String, &'s Operation)>> {
    let compiled = filters.compile()?;
    let mut selected: Vec<(String, &Operation)> = store
        .services_named(service)
        .into_iter()
        .flat_map(|s| s.operations())
        .filter(|operation| compiled.matches(operation))
        .map(|operation| (store.qualified_name(operation), operation))
        .collect();

    selected.sort_by(|a, b| a.0.cmp(&b.0));
    selected.dedup_by(|a, b| a.0 == b.0);
    debug!("{} operations of '{service}' match {filters:?}", selected.len());
    Ok(selected)
}

/// Qualified names of the operations of `service` that pass `filters`.
///
/// # Errors
/// `CatalogError::InvalidPattern` when the name filter is not a valid glob.
pub fn query_operation_names(
    store: &Store,
    service: &str,
    filters: &OperationFilters,
) -> Result<Vec<String>> {
    Ok(select(store, service, filters)?
        .into_iter()
        .map(|(name, _)| name)
        .collect())
}

/// Full records for the operations of `service` that pass `filters`.
///
/// # Errors
/// `CatalogError::InvalidPattern` when the name filter is not a valid glob.
pub fn query_operations(
    store: &Store,
    service: &str,
    filters: &OperationFilters,
) -> Result<Vec<OperationRecord>> {
    Ok(select(store, service, filters)?
        .into_iter()
        .map(|(_, operation)| OperationRecord::new(store, operation))
        .collect())
}

/// Record for one `service:Operation`.
///
/// # Errors
/// `MalformedIdentifier`, `UnknownService` or `UnknownAction`.
pub fn operation_record(store: &Store, qualified_name: &str) -> Result<OperationRecord> {
    let operation = store.lookup_operation(qualified_name)?;
    Ok(OperationRecord::new(store, operation))
}

/// Resource types of `service`, sorted by name.
#[must_use]
pub fn query_resource_types(store: &Store, service: &str) -> Vec<ResourceTypeRecord> {
    let mut records: Vec<ResourceTypeRecord> = store
        .services_named(service)
        .into_iter()
        .flat_map(|s| s.resource_types())
        .map(ResourceTypeRecord::from)
        .collect();
    records.sort_by(|a, b| (&a.name, &a.service).cmp(&(&b.name, &b.service)));
    records
}

/// One resource type by name.
///
/// # Errors
/// `UnknownService` or `UnknownResourceType`.
pub fn resource_type_record(
    store: &Store,
    service: &str,
    resource_type: &str,
) -> Result<ResourceTypeRecord> {
    store
        .resolve_service(service)?
        .into_iter()
        .find_map(|s| s.resource_type(resource_type))
        .map(ResourceTypeRecord::from)
        .ok_or_else(|| CatalogError::unknown_resource_type(service, resource_type))
}

/// Condition keys of `service`, sorted by name. Keys shared by alias members
/// are listed once.
#[must_use]
pub fn query_condition_keys(store: &Store, service: &str) -> Vec<ConditionKeyRecord> {
    let mut records: Vec<ConditionKeyRecord> = store
        .services_named(service)
        .into_iter()
        .flat_map(|s| s.condition_keys())
        .map(ConditionKeyRecord::from)
        .collect();
    records.sort_by(|a, b| a.name.cmp(&b.name));
    records.dedup_by(|a, b| a.name.eq_ignore_ascii_case(&b.name));
    records
}

/// One condition key by name.
///
/// # Errors
/// `UnknownService` or `UnknownConditionKey`.
pub fn condition_key_record(
    store: &Store,
    service: &str,
    condition_key: &str,
) -> Result<ConditionKeyRecord> {
    store
        .resolve_service(service)?
        .into_iter()
        .find_map(|s| s.condition_key(condition_key))
        .map(ConditionKeyRecord::from)
        .ok_or_else(|| CatalogError::unknown_condition_key(service, condition_key))
}

/// The service table, ordered by prefix.
#[must_use]
pub fn query_services(store: &Store) -> Vec<ServiceRecord> {
    store
        .services()
        .map(|service| ServiceRecord::new(store, service))
        .collect()
}

/// Operations that can be scoped to the given literal resource identifier.
///
/// The identifier's service field selects the service; the identifier is
/// then resolved to a resource type and every operation with a binding to
/// that type is returned. An identifier that matches no template yields an
/// empty list.
///
/// # Errors
/// `MalformedIdentifier`, `UnknownService` or `AmbiguousResourceType`.
pub fn operations_matching_arn(store: &Store, identifier: &str) -> Result<Vec<String>> {
    let service = service_of(identifier)?;
    let Some(resource_type) = match_resource_type(store, service, identifier)? else {
        debug!("{identifier} matches no resource type of '{service}'");
        return Ok(Vec::new());
    };

    let mut names: Vec<String> = store
        .operations_of(resource_type.service())
        .iter()
        .filter(|operation| operation.binding_for(resource_type.name()).is_some())
        .map(|operation| store.qualified_name(operation))
        .collect();
    names.sort();
    names.dedup();
    Ok(names)
}

/// Resolve caller-supplied names, dropping the ones that are malformed or
/// not in the catalog.
fn resolve_names<'s, I, S>(store: &'s Store, names: I) -> Vec<&'s Operation>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            QualifiedName::parse(name)
                .and_then(|qualified| store.find_operation(&qualified))
                .map_err(|e| debug!("Dropping '{name}': {e}"))
                .ok()
        })
        .collect()
}

fn canonical_names<'s>(store: &Store, operations: impl Iterator<Item = &'s Operation>) -> Vec<String> {
    let mut names: Vec<String> = operations.map(|o| store.qualified_name(o)).collect();
    names.sort();
    names.dedup();
    names
}

/// Keep the names whose operation is at `level`, in canonical form.
pub fn retain_access_level<I, S>(store: &Store, names: I, level: AccessLevel) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let operations = resolve_names(store, names);
    canonical_names(
        store,
        operations
            .into_iter()
            .filter(|operation| operation.access_level() == level),
    )
}

/// Keep the names whose operation is wildcard-only, in canonical form.
pub fn retain_wildcard_only<I, S>(store: &Store, names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let operations = resolve_names(store, names);
    canonical_names(
        store,
        operations.into_iter().filter(|operation| operation.is_wildcard_only()),
    )
}

/// Documentation link for every operation in the catalog, by qualified name.
#[must_use]
pub fn all_doc_links(store: &Store) -> BTreeMap<String, String> {
    let mut links = BTreeMap::new();
    for operation in store.services().flat_map(|s| s.operations()) {
        links
            .entry(store.qualified_name(operation))
            .or_insert_with(|| store.doc_link(operation));
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::OnceLock;

    fn store() -> &'static Store {
        static STORE: OnceLock<Store> = OnceLock::new();
        STORE.get_or_init(|| Store::bundled().unwrap())
    }

    fn names(service: &str, filters: &OperationFilters) -> Vec<String> {
        query_operation_names(store(), service, filters).unwrap()
    }

    #[test]
    fn test_bucket_permissions_management() {
        let filters = OperationFilters::new()
            .with_access_level(AccessLevel::PermissionsManagement)
            .with_resource_type("bucket");
        assert_eq!(
            names("s3", &filters),
            vec![
                "s3:DeleteBucketPolicy",
                "s3:PutBucketAcl",
                "s3:PutBucketOwnershipControls",
                "s3:PutBucketPolicy",
                "s3:PutBucketPublicAccessBlock",
            ]
        );
    }

    #[test]
    fn test_wildcard_only_filter() {
        let filters = OperationFilters::new().wildcard_only();
        assert_eq!(
            names("S3", &filters),
            vec![
                "s3:CreateJob",
                "s3:GetAccessPoint",
                "s3:ListAllMyBuckets",
                "s3:PutAccessPointPublicAccessBlock",
                "s3:PutAccountPublicAccessBlock",
            ]
        );
    }

    #[test]
    fn test_wildcard_resource_type_filter_includes_mixed_operations() {
        let filters = OperationFilters::new().with_resource_type("*");
        let found = names("secretsmanager", &filters);
        assert!(found.contains(&"secretsmanager:CreateSecret".to_string()));
        assert!(found.contains(&"secretsmanager:ListSecrets".to_string()));
        assert!(!found.contains(&"secretsmanager:GetSecretValue".to_string()));
    }

    #[test]
    fn test_condition_key_substring_filter() {
        let filters = OperationFilters::new().with_condition_key("X-AMZ-ACL");
        assert_eq!(
            names("s3", &filters),
            vec!["s3:CreateBucket", "s3:PutBucketAcl", "s3:PutObject", "s3:PutObjectAcl"]
        );

        let filters = OperationFilters::new().with_condition_key("feedbackaddress");
        assert_eq!(names("ses", &filters), vec!["ses:SendEmail"]);
    }

    #[test]
    fn test_name_glob_filter() {
        let filters = OperationFilters::new().with_name("ListSubscriptions*");
        assert_eq!(
            names("sns", &filters),
            vec!["sns:ListSubscriptions", "sns:ListSubscriptionsByTopic"]
        );

        let filters = OperationFilters::new().with_name("list[");
        assert!(matches!(
            query_operation_names(store(), "sns", &filters),
            Err(CatalogError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_irregular_access_levels_are_normalized() {
        let filters = OperationFilters::new()
            .with_access_level_named("tagging")
            .unwrap();
        assert_eq!(
            names("workspaces", &filters),
            vec!["workspaces:CreateTags", "workspaces:DeleteTags"]
        );
        assert!(matches!(
            OperationFilters::new().with_access_level_named("superuser"),
            Err(CatalogError::UnknownAccessLevel { .. })
        ));
    }

    #[test]
    fn test_filters_combine() {
        let filters = OperationFilters::new()
            .with_access_level(AccessLevel::List)
            .wildcard_only();
        assert_eq!(names("sns", &filters), vec!["sns:ListSubscriptions", "sns:ListTopics"]);

        let filters = OperationFilters::new()
            .with_access_level(AccessLevel::Read)
            .with_resource_type("OBJECT")
            .with_name("get*");
        assert_eq!(names("s3", &filters), vec!["s3:GetObject", "s3:GetObjectVersion"]);
    }

    #[test]
    fn test_unknown_service_lists_nothing() {
        assert!(names("nope", &OperationFilters::default()).is_empty());
        assert!(query_resource_types(store(), "nope").is_empty());
        assert!(query_condition_keys(store(), "nope").is_empty());
    }

    #[test]
    fn test_legacy_alias_merges_members() {
        let merged = names("elasticloadbalancing", &OperationFilters::default());
        assert_eq!(merged.len(), 9);
        assert!(merged.iter().all(|n| n.starts_with("elasticloadbalancing:")));
        assert!(merged.contains(&"elasticloadbalancing:CreateTargetGroup".to_string()));
        assert!(merged.contains(&"elasticloadbalancing:ConfigureHealthCheck".to_string()));

        let modern = names("elasticloadbalancing-v2", &OperationFilters::default());
        assert_eq!(modern.len(), 7);
        assert!(modern.contains(&"elasticloadbalancing:SetSecurityGroups".to_string()));

        let resource_types = query_resource_types(store(), "elasticloadbalancing");
        assert_eq!(resource_types.len(), 4);
    }

    #[test]
    fn test_shared_alias_name_record_carries_every_member_binding() {
        let tagged = names(
            "elasticloadbalancing",
            &OperationFilters::new().with_resource_type("targetgroup"),
        );
        assert!(tagged.contains(&"elasticloadbalancing:AddTags".to_string()));

        let record = operation_record(store(), "elasticloadbalancing:AddTags").unwrap();
        let resource_types: Vec<&str> = record
            .resources
            .iter()
            .map(|r| r.resource_type.as_str())
            .collect();
        assert_eq!(
            resource_types,
            vec!["loadbalancer", "loadbalancer/app/", "loadbalancer/net/", "targetgroup"]
        );
        assert!(!record.wildcard_only);

        // Reached through either member, the record is the same
        assert_eq!(
            operation_record(store(), "elasticloadbalancing-v2:addtags").unwrap(),
            record
        );

        let listed = query_operations(
            store(),
            "elasticloadbalancing",
            &OperationFilters::new().with_resource_type("targetgroup"),
        )
        .unwrap();
        let add_tags = listed
            .iter()
            .find(|r| r.name == "elasticloadbalancing:AddTags")
            .unwrap();
        assert_eq!(add_tags, &record);
    }

    #[test]
    fn test_all_services_pseudo_name() {
        let everything = names("all", &OperationFilters::default());
        let total: usize = store().services().map(|s| s.operations().len()).sum();
        // The two load balancer prefixes share five qualified names
        assert_eq!(everything.len(), total - 5);
    }

    #[test]
    fn test_operation_record_contents() {
        let record = operation_record(store(), "ec2:runinstances").unwrap();
        assert_eq!(record.name, "ec2:RunInstances");
        assert_eq!(record.access_level, AccessLevel::Write);
        assert!(!record.wildcard_only);
        assert_eq!(
            record.documentation_link,
            "https://docs.aws.amazon.com/AWSEC2/latest/APIReference/API_RunInstances.html"
        );
        let resource_types: Vec<&str> = record
            .resources
            .iter()
            .map(|r| r.resource_type.as_str())
            .collect();
        assert_eq!(resource_types, vec!["instance", "subnet", "*"]);
        assert_eq!(
            record.resources[0].arn_format,
            "arn:${Partition}:ec2:${Region}:${Account}:instance/${InstanceId}"
        );
        assert!(record.resources[0].required);
        assert_eq!(record.resources[2].arn_format, "*");
        assert_eq!(record.resources[2].dependent_operations, vec!["iam:PassRole"]);
    }

    #[test]
    fn test_operation_record_serializes_pascal_case() {
        let record = operation_record(store(), "s3:ListAllMyBuckets").unwrap();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Name"], "s3:ListAllMyBuckets");
        assert_eq!(json["AccessLevel"], "List");
        assert_eq!(json["WildcardOnly"], true);
        assert_eq!(json["Resources"][0]["ResourceType"], "*");
    }

    #[test]
    fn test_specific_entity_errors() {
        let store = store();
        assert!(matches!(
            operation_record(store, "s3-GetObject"),
            Err(CatalogError::MalformedIdentifier { .. })
        ));
        assert!(matches!(
            operation_record(store, "nope:GetObject"),
            Err(CatalogError::UnknownService { .. })
        ));
        assert!(matches!(
            operation_record(store, "s3:GetNothing"),
            Err(CatalogError::UnknownAction { .. })
        ));
        assert!(matches!(
            resource_type_record(store, "s3", "tape"),
            Err(CatalogError::UnknownResourceType { .. })
        ));
        assert!(matches!(
            condition_key_record(store, "s3", "s3:nothing"),
            Err(CatalogError::UnknownConditionKey { .. })
        ));
    }

    #[test]
    fn test_resource_type_and_condition_key_records() {
        let store = store();
        let secret = resource_type_record(store, "SECRETSMANAGER", "secret").unwrap();
        assert_eq!(secret.name, "Secret");
        assert_eq!(secret.placeholders, vec!["Partition", "Region", "Account", "SecretId"]);

        let keys = query_condition_keys(store, "cloud9");
        assert_eq!(keys.len(), 10);

        let acl = condition_key_record(store, "s3", "S3:X-AMZ-ACL").unwrap();
        assert_eq!(acl.name, "s3:x-amz-acl");
    }

    #[test]
    fn test_service_table() {
        let services = query_services(store());
        assert_eq!(services.len(), 15);
        let v2 = services
            .iter()
            .find(|s| s.prefix == "elasticloadbalancing-v2")
            .unwrap();
        assert_eq!(v2.namespace, "elasticloadbalancing");
        assert_eq!(v2.operation_count, 7);
    }

    #[test]
    fn test_operations_matching_arn() {
        let store = store();
        let found = operations_matching_arn(
            store,
            "arn:aws:cloud9:us-east-1:account-id:environment:123456",
        )
        .unwrap();
        assert_eq!(
            found,
            vec![
                "cloud9:CreateEnvironmentMembership",
                "cloud9:DeleteEnvironment",
                "cloud9:DescribeEnvironmentMemberships",
                "cloud9:DescribeEnvironments",
                "cloud9:TagResource",
                "cloud9:UpdateEnvironment",
            ]
        );

        assert!(operations_matching_arn(store, "arn:aws:s3:::bucket/a/b/c")
            .unwrap()
            .is_empty());
        assert!(matches!(
            operations_matching_arn(store, "bucket"),
            Err(CatalogError::MalformedIdentifier { .. })
        ));
    }

    #[test]
    fn test_retain_access_level() {
        let store = store();
        let input = [
            "ecr:batchgetimage",
            "ecr:DescribeRepositories",
            "ecr:CreateRepository",
            "ecr:TagResource",
            "ecr:SetRepositoryPolicy",
            "ecr:NotAnAction",
            "not a name",
        ];
        assert_eq!(
            retain_access_level(store, input, AccessLevel::Read),
            vec!["ecr:BatchGetImage", "ecr:DescribeRepositories"]
        );
        assert_eq!(
            retain_access_level(store, input, AccessLevel::Write),
            vec!["ecr:CreateRepository"]
        );
        assert!(retain_access_level(store, input, AccessLevel::List).is_empty());
        assert_eq!(
            retain_access_level(store, input, AccessLevel::Tagging),
            vec!["ecr:TagResource"]
        );
        assert_eq!(
            retain_access_level(store, input, AccessLevel::PermissionsManagement),
            vec!["ecr:SetRepositoryPolicy"]
        );
    }

    #[test]
    fn test_retain_wildcard_only() {
        let store = store();
        let input = vec![
            "SecretsManager:getRandomPassword".to_string(),
            "secretsmanager:LISTSECRETS".to_string(),
            "secretsmanager:GetSecretValue".to_string(),
            "secretsmanager:CreateSecret".to_string(),
        ];
        assert_eq!(
            retain_wildcard_only(store, &input),
            vec!["secretsmanager:GetRandomPassword", "secretsmanager:ListSecrets"]
        );
        assert_eq!(input.len(), 4);
    }

    #[test]
    fn test_all_doc_links() {
        let links = all_doc_links(store());
        assert_eq!(
            links["sns:ListSubscriptions"],
            "https://docs.aws.amazon.com/sns/latest/api/API_ListSubscriptions.html"
        );
        assert_eq!(
            links["s3:GetObject"],
            "https://docs.aws.amazon.com/AmazonS3/latest/API/API_GetObject.html"
        );
        assert!(links.contains_key("elasticloadbalancing:CreateTargetGroup"));
    }

    fn flip_case(value: &str, mask: &[bool]) -> String {
        value
            .chars()
            .zip(mask.iter().cycle())
            .map(|(c, upper)| {
                if *upper {
                    c.to_ascii_uppercase()
                } else {
                    c.to_ascii_lowercase()
                }
            })
            .collect()
    }

    proptest! {
        #[test]
        fn prop_lookups_ignore_case(
            index in 0usize..30,
            mask in proptest::collection::vec(any::<bool>(), 1..8),
        ) {
            let store = store();
            let operations = store.operations_of("s3");
            let operation = &operations[index % operations.len()];
            let typed = format!("{}:{}", flip_case("s3", &mask), flip_case(operation.name(), &mask));
            let record = operation_record(store, &typed).unwrap();
            prop_assert_eq!(record.name, store.qualified_name(operation));
        }

        #[test]
        fn prop_access_levels_partition_every_service(index in 0usize..15) {
            let store = store();
            let service = store.services().nth(index).unwrap();
            let all = query_operation_names(store, service.prefix(), &OperationFilters::default()).unwrap();

            let mut by_level = Vec::new();
            for level in AccessLevel::ALL {
                let filters = OperationFilters::new().with_access_level(level);
                by_level.extend(query_operation_names(store, service.prefix(), &filters).unwrap());
            }
            by_level.sort();
            prop_assert_eq!(all, by_level);
        }

        #[test]
        fn prop_wildcard_only_operations_have_no_typed_binding(index in 0usize..15) {
            let store = store();
            let service = store.services().nth(index).unwrap();
            let filters = OperationFilters::new().wildcard_only();
            for record in query_operations(store, service.prefix(), &filters).unwrap() {
                prop_assert!(record.resources.iter().all(|r| r.resource_type == WILDCARD));
            }
        }
    }
}
