//! Dependent operation resolution
//!
//! Some operations only succeed when the caller also holds other permissions
//! (e.g. `ec2:RunInstances` with an instance profile needs `iam:PassRole`).
//! The catalog records these edges per binding; this module follows them one
//! level deep.

use log::{debug, warn};
use std::collections::HashSet;

use crate::catalog::{Operation, Store};
use crate::errors::Result;
use crate::identifiers::{normalize_key, QualifiedName};

/// A dependent edge target.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Dependent<'s> {
    /// Present in the catalog
    Known(&'s Operation),
    /// Declared by the catalog but not documented in it
    Undocumented(&'s str),
}

/// Resolve the declared dependents of one operation.
pub(crate) fn resolve_dependents<'s>(store: &'s Store, operation: &'s Operation) -> Vec<Dependent<'s>> {
    operation
        .dependent_operations()
        .iter()
        .map(|name| match store.lookup_operation(name) {
            Ok(found) => Dependent::Known(found),
            Err(e) => {
                warn!(
                    "Dependent operation '{name}' of {} is not in the catalog: {e}",
                    store.qualified_name(operation)
                );
                Dependent::Undocumented(name.as_str())
            }
        })
        .collect()
}

/// Union of the dependent operations of every named operation.
///
/// Input names are case-insensitive. Dependents found in the catalog are
/// returned with canonical casing, the rest verbatim. Only direct edges are
/// followed. Names that parse but are not in the catalog contribute nothing.
///
/// # Errors
/// `CatalogError::MalformedIdentifier` for a name that is not of the form
/// `service:Operation`.
pub fn dependent_operations_of<I, S>(store: &Store, names: I) -> Result<Vec<String>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut dependents = Vec::new();

    for name in names {
        let qualified = QualifiedName::parse(name.as_ref())?;
        let Ok(operation) = store.find_operation(&qualified) else {
            debug!("Skipping unknown operation {qualified}");
            continue;
        };

        for dependent in resolve_dependents(store, operation) {
            let rendered = match dependent {
                Dependent::Known(found) => store.qualified_name(found),
                Dependent::Undocumented(raw) => raw.trim().to_string(),
            };
            if seen.insert(normalize_key(&rendered)) {
                dependents.push(rendered);
            }
        }
    }

    dependents.sort();
    Ok(dependents)
}
