//! Least-privilege policy synthesis
//!
//! Turns a [`PolicySpecification`] into a [`PolicyDocument`]. Operations that
//! can be scoped to a resource land in a statement for that resource;
//! operations the catalog documents as wildcard-only land in a `Resource: "*"`
//! statement, whatever the caller asked for.
//!
//! Entries that cannot be honored are reported as [`SynthesisWarning`]s and
//! the rest of the specification is still synthesized.

mod document;
mod specification;


pub use document::{Effect, PolicyDocument, Statement, POLICY_VERSION};
pub use specification::{
    ConditionBlock, ConditionValue, PolicySpecification, ResourceTarget, SpecificationEntry,
};

use convert_case::{Case, Casing};
use derive_new::new;
use itertools::Itertools;
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::fmt;

use crate::arn::{match_resource_type, service_of};
use crate::catalog::{AccessLevel, Operation, Store, WILDCARD};
use crate::errors::{CatalogError, Result};
use crate::query::{resolve_dependents, Dependent};

/// A specification entry that contributed nothing, and why.
#[derive(Debug, new)]
pub struct SynthesisWarning {
    /// Position of the entry in the specification
    pub entry_index: usize,
    pub error: CatalogError,
}

impl fmt::Display for SynthesisWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entry {}: {}", self.entry_index, self.error)
    }
}

/// Synthesis result: the document plus the entries that were skipped.
#[derive(Debug)]
pub struct Synthesis {
    pub document: PolicyDocument,
    pub warnings: Vec<SynthesisWarning>,
}

/// Synthesize a policy document from a specification.
///
/// # Errors
/// `CatalogError::NothingToGrant`, carrying every per-entry warning, when no
/// entry produced a statement.
pub fn synthesize_policy(store: &Store, specification: &PolicySpecification) -> Result<Synthesis> {
    Synthesizer::new(store).synthesize(specification)
}

/// Policy synthesizer bound to a catalog.
#[derive(Debug, Clone, Copy)]
pub struct Synthesizer<'s> {
    store: &'s Store,
}

/// Statement under construction for one (identifier, condition) pair
#[derive(Debug)]
struct ScopedGroup {
    identifier: String,
    condition: Option<ConditionBlock>,
    namespace: String,
    resource_type: String,
    actions: BTreeSet<String>,
}

/// Statement under construction for one wildcard condition block
#[derive(Debug)]
struct WildcardGroup {
    condition: Option<ConditionBlock>,
    actions: BTreeSet<String>,
}

#[derive(Debug, Default)]
struct Grants {
    scoped: Vec<ScopedGroup>,
    wildcard: Vec<WildcardGroup>,
}

impl Grants {
    /// Index of the scoped group for an identifier and condition, created on
    /// first use
    fn scoped_group(
        &mut self,
        identifier: &str,
        condition: &Option<ConditionBlock>,
        namespace: &str,
        resource_type: &str,
    ) -> usize {
        if let Some(index) = self
            .scoped
            .iter()
            .position(|g| g.identifier == identifier && &g.condition == condition)
        {
            return index;
        }
        self.scoped.push(ScopedGroup {
            identifier: identifier.to_string(),
            condition: condition.clone(),
            namespace: namespace.to_string(),
            resource_type: resource_type.to_string(),
            actions: BTreeSet::new(),
        });
        self.scoped.len() - 1
    }

    fn grant_scoped(&mut self, index: usize, action: String) {
        if let Some(group) = self.scoped.get_mut(index) {
            group.actions.insert(action);
        }
    }

    fn grant_wildcard(&mut self, condition: &Option<ConditionBlock>, action: String) {
        if let Some(group) = self.wildcard.iter_mut().find(|g| &g.condition == condition) {
            group.actions.insert(action);
            return;
        }
        self.wildcard.push(WildcardGroup {
            condition: condition.clone(),
            actions: BTreeSet::from([action]),
        });
    }

    fn into_document(self) -> PolicyDocument {
        let mut document = PolicyDocument::new();

        for group in self.scoped.into_iter().filter(|g| !g.actions.is_empty()) {
            let sid = format!(
                "Allow{}{}{}",
                pascal_case(&group.namespace),
                pascal_case(&group.resource_type),
                index_suffix(document.statements.len())
            );
            document.add_statement(
                Statement::allow(group.actions.into_iter().collect(), group.identifier)
                    .with_sid(sid)
                    .with_condition(group.condition),
            );
        }

        for group in self.wildcard.into_iter().filter(|g| !g.actions.is_empty()) {
            let sid = format!("AllowWildcardOnly{}", index_suffix(document.statements.len()));
            document.add_statement(
                Statement::allow(group.actions.into_iter().collect(), WILDCARD)
                    .with_sid(sid)
                    .with_condition(group.condition),
            );
        }

        document
    }
}

/// Statement ids carry their position, except the first one
fn index_suffix(index: usize) -> String {
    if index > 0 {
        index.to_string()
    } else {
        String::new()
    }
}

/// Pascal-case a catalog name for use in a statement id, dropping any
/// characters a sid cannot hold (e.g. `loadbalancer/app/` -> `LoadbalancerApp`)
fn pascal_case(value: &str) -> String {
    value
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_case(Case::Pascal))
        .collect()
}

fn parse_levels(levels: &[String]) -> Result<Vec<AccessLevel>> {
    let parsed = levels
        .iter()
        .map(|level| level.parse::<AccessLevel>())
        .collect::<Result<Vec<_>>>()?;
    Ok(parsed.into_iter().unique().collect())
}

fn describe_levels(levels: &[AccessLevel]) -> String {
    levels.iter().join(", ")
}

impl<'s> Synthesizer<'s> {
    #[must_use]
    pub const fn new(store: &'s Store) -> Self {
        Self { store }
    }

    /// Synthesize a policy document from a specification.
    ///
    /// # Errors
    /// `CatalogError::NothingToGrant` when no entry produced a statement.
    pub fn synthesize(&self, specification: &PolicySpecification) -> Result<Synthesis> {
        let mut grants = Grants::default();
        let mut warnings = Vec::new();

        for (index, entry) in specification.entries.iter().enumerate() {
            if let Err(error) = self.process_entry(entry, &mut grants) {
                warn!("Skipping specification entry {index}: {error}");
                warnings.push(SynthesisWarning::new(index, error));
            }
        }

        let document = grants.into_document();
        if document.is_empty() {
            return Err(CatalogError::NothingToGrant { failures: warnings });
        }

        info!(
            "Synthesized {} statements from {} entries ({} skipped)",
            document.statements.len(),
            specification.entries.len(),
            warnings.len()
        );
        Ok(Synthesis { document, warnings })
    }

    /// Resolve one entry completely before granting anything, so a failing
    /// entry leaves no partial statements behind.
    fn process_entry(&self, entry: &SpecificationEntry, grants: &mut Grants) -> Result<()> {
        let levels = parse_levels(&entry.access_levels)?;
        match &entry.resource {
            ResourceTarget::Wildcard => self.process_wildcard_entry(entry, &levels, grants),
            ResourceTarget::Arn(identifier) => {
                self.process_scoped_entry(entry, identifier, &levels, grants)
            }
        }
    }

    fn process_wildcard_entry(
        &self,
        entry: &SpecificationEntry,
        levels: &[AccessLevel],
        grants: &mut Grants,
    ) -> Result<()> {
        let service = entry
            .service
            .as_deref()
            .ok_or_else(|| CatalogError::malformed(WILDCARD, "wildcard entries must name a service"))?;

        let operations: Vec<&Operation> = self
            .store
            .resolve_service(service)?
            .into_iter()
            .flat_map(|s| s.operations())
            .filter(|o| o.is_wildcard_only() && levels.contains(&o.access_level()))
            .collect();
        if operations.is_empty() {
            return Err(CatalogError::unresolved_resource_type(
                service,
                WILDCARD,
                format!(
                    "no wildcard-only operation at access levels [{}]",
                    describe_levels(levels)
                ),
            ));
        }

        debug!(
            "Wildcard entry for '{service}' grants {} operations",
            operations.len()
        );
        for operation in &operations {
            grants.grant_wildcard(&entry.condition, self.store.qualified_name(operation));
        }
        self.expand_dependents(&operations, None, &entry.condition, grants);
        Ok(())
    }

    fn process_scoped_entry(
        &self,
        entry: &SpecificationEntry,
        identifier: &str,
        levels: &[AccessLevel],
        grants: &mut Grants,
    ) -> Result<()> {
        let service = match entry.service.as_deref() {
            Some(service) => service,
            None => service_of(identifier)?,
        };

        let resource_type = match_resource_type(self.store, service, identifier)?.ok_or_else(|| {
            CatalogError::unresolved_resource_type(
                service,
                identifier,
                "the identifier matches no resource type",
            )
        })?;

        let operations: Vec<&Operation> = self
            .store
            .operations_of(resource_type.service())
            .iter()
            .filter(|o| {
                levels.contains(&o.access_level()) && o.binding_for(resource_type.name()).is_some()
            })
            .collect();
        if operations.is_empty() {
            return Err(CatalogError::unresolved_resource_type(
                service,
                identifier,
                format!(
                    "no operation at access levels [{}] is bound to resource type '{}'",
                    describe_levels(levels),
                    resource_type.name()
                ),
            ));
        }

        debug!(
            "{identifier} resolved to {}:{} with {} operations",
            resource_type.service(),
            resource_type.name(),
            operations.len()
        );
        let index = grants.scoped_group(
            identifier,
            &entry.condition,
            self.store.aliases().logical(resource_type.service()),
            resource_type.name(),
        );
        for operation in &operations {
            grants.grant_scoped(index, self.store.qualified_name(operation));
        }
        self.expand_dependents(&operations, Some((identifier, index)), &entry.condition, grants);
        Ok(())
    }

    /// Add the dependents of mutating operations. A dependent joins the
    /// scoped statement when it can be bound to the same identifier and goes
    /// to the wildcard statement otherwise.
    fn expand_dependents(
        &self,
        operations: &[&Operation],
        scope: Option<(&str, usize)>,
        condition: &Option<ConditionBlock>,
        grants: &mut Grants,
    ) {
        for operation in operations
            .iter()
            .copied()
            .filter(|o| o.access_level().implies_dependents())
        {
            for dependent in resolve_dependents(self.store, operation) {
                match (dependent, scope) {
                    (Dependent::Known(found), Some((identifier, index)))
                        if self.scopes_to(found, identifier) =>
                    {
                        grants.grant_scoped(index, self.store.qualified_name(found));
                    }
                    (Dependent::Known(found), _) => {
                        grants.grant_wildcard(condition, self.store.qualified_name(found));
                    }
                    (Dependent::Undocumented(name), _) => {
                        grants.grant_wildcard(condition, name.trim().to_string());
                    }
                }
            }
        }
    }

    /// Whether an operation can be granted on the given identifier
    fn scopes_to(&self, operation: &Operation, identifier: &str) -> bool {
        if operation.is_wildcard_only() {
            return false;
        }
        match match_resource_type(self.store, operation.service(), identifier) {
            Ok(Some(resource_type)) => {
                resource_type.service() == operation.service()
                    && operation.binding_for(resource_type.name()).is_some()
            }
            Ok(None) => false,
            Err(e) => {
                debug!("Cannot scope {} to {identifier}: {e}", operation.name());
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pascal_case_for_sids() {
        assert_eq!(pascal_case("s3"), "S3");
        assert_eq!(pascal_case("resource-share"), "ResourceShare");
        assert_eq!(pascal_case("loadbalancer/app/"), "LoadbalancerApp");
        assert_eq!(pascal_case("Secret"), "Secret");
    }

    #[test]
    fn test_parse_levels_deduplicates() {
        let levels = parse_levels(&[
            "Read".to_string(),
            "read".to_string(),
            "permissions management".to_string(),
        ])
        .unwrap();
        assert_eq!(levels, vec![AccessLevel::Read, AccessLevel::PermissionsManagement]);
        assert!(matches!(
            parse_levels(&["everything".to_string()]),
            Err(CatalogError::UnknownAccessLevel { .. })
        ));
    }

    #[test]
    fn test_grants_group_by_identifier_and_condition() {
        let mut grants = Grants::default();
        let first = grants.scoped_group("arn:aws:s3:::a", &None, "s3", "bucket");
        let again = grants.scoped_group("arn:aws:s3:::a", &None, "s3", "bucket");
        let conditioned = grants.scoped_group(
            "arn:aws:s3:::a",
            &Some(ConditionBlock::new()),
            "s3",
            "bucket",
        );
        assert_eq!(first, again);
        assert_ne!(first, conditioned);

        grants.grant_scoped(first, "s3:PutBucketAcl".to_string());
        grants.grant_scoped(first, "s3:DeleteBucketPolicy".to_string());
        grants.grant_scoped(first, "s3:PutBucketAcl".to_string());
        grants.grant_wildcard(&None, "s3:ListAllMyBuckets".to_string());

        let document = grants.into_document();
        // The conditioned group never received an action
        assert_eq!(document.statements.len(), 2);
        assert_eq!(document.statements[0].sid, "AllowS3Bucket");
        assert_eq!(
            document.statements[0].action,
            vec!["s3:DeleteBucketPolicy", "s3:PutBucketAcl"]
        );
        assert_eq!(document.statements[1].sid, "AllowWildcardOnly1");
        assert!(document.statements[1].is_wildcard());
    }
}
