//! Catalog store
//!
//! Loads the catalog dataset once, validates it, and serves lookups. The
//! store is immutable after [`Store::load`] and can be shared freely between
//! threads.

use log::{debug, trace, warn};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::source::{RawAction, RawCatalog, RawService};
use super::{
    AccessLevel, BindingScope, CatalogSource, ConditionKey, EmbeddedCatalog, Operation,
    ResourceBinding, ResourceType, Service, WILDCARD,
};
use crate::arn::ArnTemplate;
use crate::errors::{CatalogError, Result};
use crate::identifiers::{normalize_key, QualifiedName, ServiceAliases, ALL_SERVICES};
use crate::service_configuration::ServiceConfiguration;

/// Minimum Jaro-Winkler similarity for a "did you mean" suggestion
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// The loaded catalog.
#[derive(Debug, Clone)]
pub struct Store {
    services: BTreeMap<String, Service>,
    configuration: ServiceConfiguration,
    aliases: ServiceAliases,
}

impl Store {
    /// Load a catalog with the embedded service configuration.
    ///
    /// # Errors
    /// Propagates read failures from the source, `CatalogError::JsonParsing`
    /// when the dataset does not deserialize and `CatalogError::InvalidCatalog`
    /// when it is internally inconsistent.
    pub fn load(source: &impl CatalogSource) -> Result<Self> {
        Self::load_with_configuration(source, ServiceConfiguration::embedded()?)
    }

    /// Load the catalog bundled with the crate.
    ///
    /// # Errors
    /// Same as [`Store::load`].
    pub fn bundled() -> Result<Self> {
        Self::load(&EmbeddedCatalog)
    }

    /// Load a catalog with an explicit service configuration.
    ///
    /// # Errors
    /// Same as [`Store::load`], plus `CatalogError::Configuration` for an
    /// inconsistent alias table.
    pub fn load_with_configuration(
        source: &impl CatalogSource,
        configuration: ServiceConfiguration,
    ) -> Result<Self> {
        let description = source.describe();
        debug!("Loading catalog from {description}");

        let bytes = source.read()?;
        let raw: RawCatalog = serde_json::from_slice(&bytes)
            .map_err(|e| CatalogError::json_parsing(description.clone(), e))?;
        let aliases = configuration.aliases()?;

        let mut services = BTreeMap::new();
        for raw_service in raw.services {
            let service = ingest_service(raw_service)?;
            if services.contains_key(&service.prefix) {
                return Err(CatalogError::invalid_catalog(
                    &service.prefix,
                    "service prefix declared more than once",
                ));
            }
            services.insert(service.prefix.clone(), service);
        }

        for logical in aliases.logical_names() {
            for member in aliases.members(logical).unwrap_or_default() {
                if !services.contains_key(member) {
                    debug!("Alias '{logical}' names prefix '{member}' which is not in the catalog");
                }
            }
        }

        let operation_count: usize = services.values().map(|s| s.operations.len()).sum();
        let resource_type_count: usize = services.values().map(|s| s.resource_types.len()).sum();
        debug!(
            "Loaded {} services, {} operations and {} resource types from {}",
            services.len(),
            operation_count,
            resource_type_count,
            description
        );

        Ok(Self {
            services,
            configuration,
            aliases,
        })
    }

    /// Service by stored prefix, case-insensitive. Aliases are not expanded.
    #[must_use]
    pub fn service(&self, prefix: &str) -> Option<&Service> {
        self.services.get(&normalize_key(prefix))
    }

    /// Every service, ordered by prefix
    pub fn services(&self) -> impl Iterator<Item = &Service> {
        self.services.values()
    }

    /// Operations of a stored prefix; empty when the prefix is unknown
    #[must_use]
    pub fn operations_of(&self, prefix: &str) -> &[Operation] {
        self.service(prefix).map_or(&[], Service::operations)
    }

    /// Operation by stored prefix and name, both case-insensitive
    #[must_use]
    pub fn operation(&self, prefix: &str, name: &str) -> Option<&Operation> {
        self.service(prefix).and_then(|s| s.operation(name))
    }

    /// Resource types of a stored prefix; empty when the prefix is unknown
    #[must_use]
    pub fn resource_types_of(&self, prefix: &str) -> &[ResourceType] {
        self.service(prefix).map_or(&[], Service::resource_types)
    }

    /// Resource type by stored prefix and name, both case-insensitive
    #[must_use]
    pub fn resource_type(&self, prefix: &str, name: &str) -> Option<&ResourceType> {
        self.service(prefix).and_then(|s| s.resource_type(name))
    }

    /// Condition keys of a stored prefix; empty when the prefix is unknown
    #[must_use]
    pub fn condition_keys_of(&self, prefix: &str) -> &[ConditionKey] {
        self.service(prefix).map_or(&[], Service::condition_keys)
    }

    #[must_use]
    pub const fn configuration(&self) -> &ServiceConfiguration {
        &self.configuration
    }

    #[must_use]
    pub const fn aliases(&self) -> &ServiceAliases {
        &self.aliases
    }

    /// Services a caller-supplied name refers to.
    ///
    /// `all` expands to every service, a legacy alias to its member prefixes
    /// (in configuration order), anything else to the stored prefix. Unknown
    /// names yield an empty list.
    #[must_use]
    pub fn services_named(&self, name: &str) -> Vec<&Service> {
        let key = normalize_key(name);
        if key == ALL_SERVICES {
            return self.services.values().collect();
        }
        if let Some(members) = self.aliases.members(&key) {
            return members
                .iter()
                .filter_map(|prefix| self.services.get(prefix))
                .collect();
        }
        self.services.get(&key).into_iter().collect()
    }

    /// Like [`Store::services_named`] but unknown names are an error.
    ///
    /// # Errors
    /// `CatalogError::UnknownService`, with a suggestion when a known service
    /// name is close.
    pub fn resolve_service(&self, name: &str) -> Result<Vec<&Service>> {
        let services = self.services_named(name);
        if services.is_empty() {
            return Err(CatalogError::unknown_service(
                name,
                self.suggest_service(name),
            ));
        }
        Ok(services)
    }

    /// Closest known service or alias name
    fn suggest_service(&self, name: &str) -> Option<String> {
        let key = normalize_key(name);
        self.services
            .keys()
            .map(String::as_str)
            .chain(self.aliases.logical_names())
            .map(|candidate| (candidate, strsim::jaro_winkler(&key, candidate)))
            .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(candidate, _)| candidate.to_string())
    }

    /// Namespace an operation is written under in policies: the logical alias
    /// name for aliased prefixes, the stored prefix otherwise.
    #[must_use]
    pub fn namespace_of<'a>(&'a self, operation: &'a Operation) -> &'a str {
        self.aliases.logical(&operation.service)
    }

    /// `namespace:Operation` with canonical casing
    #[must_use]
    pub fn qualified_name(&self, operation: &Operation) -> String {
        format!("{}:{}", self.namespace_of(operation), operation.name)
    }

    /// API reference link for an operation
    #[must_use]
    pub fn doc_link(&self, operation: &Operation) -> String {
        self.configuration
            .doc_link(self.namespace_of(operation), &operation.name)
    }

    /// Resolve a qualified name to its operation.
    ///
    /// Both parts are case-insensitive and the service part may be a legacy
    /// alias; alias members are searched in configuration order.
    ///
    /// # Errors
    /// `CatalogError::UnknownService` or `CatalogError::UnknownAction`.
    pub fn find_operation(&self, name: &QualifiedName) -> Result<&Operation> {
        self.resolve_service(&name.service)?
            .into_iter()
            .find_map(|service| service.operation(&name.operation))
            .ok_or_else(|| CatalogError::unknown_action(&name.service, &name.operation))
    }

    /// Every operation written under the same qualified name as `operation`,
    /// one per alias member that defines it, in configuration order.
    #[must_use]
    pub fn operations_sharing_name<'a>(&'a self, operation: &'a Operation) -> Vec<&'a Operation> {
        let shared: Vec<&Operation> = self
            .services_named(self.namespace_of(operation))
            .into_iter()
            .filter_map(|service| service.operation(&operation.name))
            .collect();
        if shared.is_empty() {
            vec![operation]
        } else {
            shared
        }
    }

    /// Parse and resolve a `service:Operation` string.
    ///
    /// # Errors
    /// `CatalogError::MalformedIdentifier` for unparsable input, otherwise as
    /// [`Store::find_operation`].
    pub fn lookup_operation(&self, qualified_name: &str) -> Result<&Operation> {
        self.find_operation(&QualifiedName::parse(qualified_name)?)
    }
}

fn ingest_service(raw: RawService) -> Result<Service> {
    let prefix = normalize_key(&raw.prefix);
    if prefix.is_empty() {
        return Err(CatalogError::invalid_catalog(
            raw.name.as_str(),
            "empty service prefix",
        ));
    }
    trace!("Ingesting service {prefix}");

    let mut resource_types = Vec::with_capacity(raw.resources.len());
    let mut canonical_types: HashMap<String, String> = HashMap::new();
    for resource in raw.resources {
        let name = resource.name.trim().to_string();
        if name.is_empty() {
            return Err(CatalogError::invalid_catalog(&prefix, "resource type with an empty name"));
        }
        if canonical_types
            .insert(normalize_key(&name), name.clone())
            .is_some()
        {
            return Err(CatalogError::invalid_catalog(
                &prefix,
                format!("resource type '{name}' declared more than once"),
            ));
        }
        let template = ArnTemplate::parse(&resource.arn_format).map_err(|e| {
            CatalogError::invalid_catalog(&prefix, format!("resource type '{name}': {e}"))
        })?;
        resource_types.push(ResourceType {
            service: prefix.clone(),
            name,
            template,
            condition_keys: resource.condition_keys,
        });
    }

    let mut condition_keys: Vec<ConditionKey> = Vec::with_capacity(raw.condition_keys.len());
    let mut seen_keys = HashSet::new();
    for key in raw.condition_keys {
        let name = key.name.trim().to_string();
        if !seen_keys.insert(normalize_key(&name)) {
            warn!("Condition key '{name}' is declared more than once in {prefix}; keeping the first");
            continue;
        }
        condition_keys.push(ConditionKey {
            service: prefix.clone(),
            name,
            value_type: key.value_type,
            description: key.description,
        });
    }

    let mut operations = Vec::with_capacity(raw.actions.len());
    let mut seen_operations = HashSet::new();
    for action in raw.actions {
        let operation = ingest_operation(&prefix, &canonical_types, action)?;
        if !seen_operations.insert(normalize_key(&operation.name)) {
            return Err(CatalogError::invalid_catalog(
                &prefix,
                format!("operation '{}' declared more than once", operation.name),
            ));
        }
        operations.push(operation);
    }

    operations.sort_by(|a, b| a.name.cmp(&b.name));
    resource_types.sort_by(|a, b| a.name.cmp(&b.name));
    condition_keys.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(Service::new(
        prefix,
        raw.name,
        raw.authorization_url,
        operations,
        resource_types,
        condition_keys,
    ))
}

fn ingest_operation(
    prefix: &str,
    canonical_types: &HashMap<String, String>,
    raw: RawAction,
) -> Result<Operation> {
    let name = raw.name.trim().to_string();
    if name.is_empty() {
        return Err(CatalogError::invalid_catalog(prefix, "operation with an empty name"));
    }
    let access_level: AccessLevel = raw.access_level.parse().map_err(|_| {
        CatalogError::invalid_catalog(
            prefix,
            format!("operation '{name}' has unknown access level '{}'", raw.access_level),
        )
    })?;

    let mut bindings = Vec::with_capacity(raw.resources.len().max(1));
    let mut dependent_operations: Vec<String> = Vec::new();
    let mut seen_dependents = HashSet::new();
    for binding in raw.resources {
        let declared = binding.name.trim();
        let (type_name, required) = match declared.strip_suffix(WILDCARD) {
            Some(rest) => (rest, true),
            None => (declared, false),
        };

        let (scope, required) = if type_name.is_empty() {
            (BindingScope::Wildcard, false)
        } else {
            let canonical = canonical_types.get(&normalize_key(type_name)).ok_or_else(|| {
                CatalogError::invalid_catalog(
                    prefix,
                    format!("operation '{name}' binds undeclared resource type '{type_name}'"),
                )
            })?;
            (BindingScope::ResourceType(canonical.clone()), required)
        };

        for dependent in &binding.dependent_actions {
            if seen_dependents.insert(normalize_key(dependent)) {
                dependent_operations.push(dependent.trim().to_string());
            }
        }

        bindings.push(ResourceBinding {
            scope,
            required,
            condition_keys: binding.condition_keys,
            dependent_operations: binding.dependent_actions,
        });
    }

    if bindings.is_empty() {
        bindings.push(ResourceBinding {
            scope: BindingScope::Wildcard,
            required: false,
            condition_keys: Vec::new(),
            dependent_operations: Vec::new(),
        });
    }

    Ok(Operation {
        service: prefix.to_string(),
        name,
        description: raw.description,
        access_level,
        bindings,
        dependent_operations,
    })
}
