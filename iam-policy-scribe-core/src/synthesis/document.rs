//! Policy document output

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::specification::ConditionBlock;

/// Policy language version written into every document
pub const POLICY_VERSION: &str = "2012-10-17";

/// An identity policy document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    #[serde(rename = "Statement")]
    pub statements: Vec<Statement>,
}

impl PolicyDocument {
    #[must_use]
    pub fn new() -> Self {
        Self {
            version: POLICY_VERSION.to_string(),
            statements: Vec::new(),
        }
    }

    pub fn add_statement(&mut self, statement: Statement) {
        self.statements.push(statement);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Default for PolicyDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Effect {
    Allow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub sid: String,
    pub effect: Effect,
    pub action: Vec<String>,
    pub resource: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ConditionBlock>,
}

impl Statement {
    /// An `Allow` statement without sid or condition
    #[must_use]
    pub fn allow(action: Vec<String>, resource: impl Into<String>) -> Self {
        Self {
            sid: String::new(),
            effect: Effect::Allow,
            action,
            resource: resource.into(),
            condition: None,
        }
    }

    #[must_use]
    pub fn with_sid(mut self, sid: impl Into<String>) -> Self {
        self.sid = sid.into();
        self
    }

    #[must_use]
    pub fn with_condition(mut self, condition: Option<ConditionBlock>) -> Self {
        self.condition = condition;
        self
    }

    /// True when the statement grants on every resource
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.resource == "*"
    }
}
