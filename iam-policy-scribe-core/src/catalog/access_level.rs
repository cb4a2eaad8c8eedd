//! Access level classification

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::CatalogError;

/// Closed classification of what an operation does.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum AccessLevel {
    /// Enumerates resources
    List,
    /// Reads resource content or configuration
    Read,
    /// Creates, modifies or deletes resources
    Write,
    /// Changes tags only
    Tagging,
    /// Changes who can access a resource
    #[serde(rename = "Permissions management")]
    PermissionsManagement,
}

impl AccessLevel {
    /// Every access level, in catalog order
    pub const ALL: [Self; 5] = [
        Self::List,
        Self::Read,
        Self::Write,
        Self::Tagging,
        Self::PermissionsManagement,
    ];

    /// Whether operations at this level pull in their dependent operations
    /// when a policy is synthesized.
    #[must_use]
    pub const fn implies_dependents(self) -> bool {
        matches!(
            self,
            Self::Write | Self::Tagging | Self::PermissionsManagement
        )
    }

    /// Display form used by the catalog documentation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Read => "Read",
            Self::Write => "Write",
            Self::Tagging => "Tagging",
            Self::PermissionsManagement => "Permissions management",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses case-, space-, hyphen- and underscore-insensitively, so
/// `"Permissions management"`, `"permissions-management"` and
/// `"PermissionsManagement"` are the same level.
impl FromStr for AccessLevel {
    type Err = CatalogError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let folded: String = value
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();

        match folded.as_str() {
            "list" => Ok(Self::List),
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "tagging" => Ok(Self::Tagging),
            "permissionsmanagement" => Ok(Self::PermissionsManagement),
            _ => Err(CatalogError::unknown_access_level(value)),
        }
    }
}
