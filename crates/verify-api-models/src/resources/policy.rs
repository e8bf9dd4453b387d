//! Access policies from `/v5.0/policyvault/accesspolicy`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::envelope::{ResourceData, kinds, require, require_items};
use crate::error::{ModelError, ModelResult};

/// An access policy made of ordered rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Policy {
    /// Server-assigned numeric identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Unique policy name.
    #[serde(default)]
    pub name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `native_app`, `web_app`, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_type: Option<String>,
    /// Rules evaluated in order.
    #[serde(default)]
    pub rules: Vec<PolicyRule>,
    /// Server metadata (revision, scope, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// A single policy rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRule {
    /// Rule name.
    #[serde(default)]
    pub name: String,
    /// Rule identifier (server-assigned).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Evaluate even after an earlier rule matched.
    #[serde(default)]
    pub always_run: bool,
    /// Evaluated before authentication.
    #[serde(default)]
    pub first_factor: bool,
    /// Match conditions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Value>,
    /// Action taken when the rule matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
}

/// List response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyList {
    /// Total matches.
    #[serde(default)]
    pub total: Option<u64>,
    /// Policies in this page.
    #[serde(default)]
    pub policies: Vec<Policy>,
}

impl ResourceData for Policy {
    const KIND: &'static str = kinds::ACCESS_POLICY;

    fn validate(&self) -> ModelResult<()> {
        require(Self::KIND, "name", &self.name)?;
        require_items(Self::KIND, "rules", &self.rules)?;
        if let Some(index) = self.rules.iter().position(|rule| rule.result.is_none()) {
            return Err(ModelError::InvalidField {
                kind: Self::KIND,
                field: "rules",
                reason: format!("rule {index} has no result"),
            });
        }
        Ok(())
    }

    fn boilerplate() -> Self {
        Self {
            name: "Require MFA off network".to_string(),
            description: Some("Prompt for a second factor outside the office".to_string()),
            policy_type: Some("web_app".to_string()),
            rules: vec![PolicyRule {
                name: "Allow".to_string(),
                always_run: false,
                first_factor: false,
                conditions: Some(serde_json::json!({})),
                result: Some(serde_json::json!({
                    "action": "ACTION_MFA_PER_SESSION",
                    "serverSideActions": [],
                    "authnMethods": ["urn:ibm:security:authentication:asf:macotp"]
                })),
                ..PolicyRule::default()
            }],
            ..Self::default()
        }
    }

    fn display_name(&self) -> Option<String> {
        Some(self.name.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_without_rules_is_rejected() {
        let policy = Policy {
            name: "empty".into(),
            ..Policy::default()
        };
        let err = policy.validate().expect_err("rules required");
        assert!(matches!(err, ModelError::MissingField { field: "rules", .. }));
    }

    #[test]
    fn rule_without_result_is_rejected() {
        let policy = Policy {
            name: "p".into(),
            rules: vec![PolicyRule::default()],
            ..Policy::default()
        };
        let err = policy.validate().expect_err("result required");
        assert!(err.to_string().contains("rule 0"));
    }
}
