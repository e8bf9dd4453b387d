//! Password policies served by `/v3.0/passwordpolicies`.

use serde::{Deserialize, Serialize};

use crate::envelope::{ResourceData, kinds, require};
use crate::error::{ModelError, ModelResult};

/// A password policy applied to cloud directory users.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordPolicy {
    /// Server-assigned identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Unique policy name.
    #[serde(default)]
    pub policy_name: String,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_description: Option<String>,
    /// Composition rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_strength: Option<PasswordStrength>,
    /// Lockout and history rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_security: Option<PasswordSecurity>,
}

/// Character-class requirements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordStrength {
    /// Minimum length.
    #[serde(default)]
    pub password_min_length: u32,
    /// Minimum alphabetic characters.
    #[serde(default)]
    pub password_min_alpha_chars: u32,
    /// Minimum numeric characters.
    #[serde(default)]
    pub password_min_numeric_chars: u32,
    /// Minimum upper-case characters.
    #[serde(default)]
    pub password_min_upper_case_chars: u32,
    /// Minimum lower-case characters.
    #[serde(default)]
    pub password_min_lower_case_chars: u32,
    /// Minimum special characters.
    #[serde(default)]
    pub password_min_special_chars: u32,
    /// Maximum repeated characters.
    #[serde(default)]
    pub password_max_repeated_chars: u32,
}

/// History, expiry and lockout rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordSecurity {
    /// Number of previous passwords that cannot be reused.
    #[serde(default)]
    pub pwd_in_history: u32,
    /// Password lifetime in seconds (`0` never expires).
    #[serde(default)]
    pub pwd_max_age: u64,
    /// Failed attempts before lockout.
    #[serde(default)]
    pub pwd_max_failure: u32,
    /// Lockout duration in seconds.
    #[serde(default)]
    pub pwd_lockout_duration: u64,
}

/// List response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordPolicyList {
    /// Total matches.
    #[serde(default)]
    pub total: Option<u64>,
    /// Policies in this page.
    #[serde(default)]
    pub password_policies: Vec<PasswordPolicy>,
}

impl ResourceData for PasswordPolicy {
    const KIND: &'static str = kinds::PASSWORD_POLICY;

    fn validate(&self) -> ModelResult<()> {
        require(Self::KIND, "policyName", &self.policy_name)?;
        if let Some(strength) = &self.password_strength {
            let classes = strength
                .password_min_alpha_chars
                .saturating_add(strength.password_min_numeric_chars)
                .saturating_add(strength.password_min_special_chars);
            if strength.password_min_length > 0 && classes > strength.password_min_length {
                return Err(ModelError::InvalidField {
                    kind: Self::KIND,
                    field: "passwordStrength.passwordMinLength",
                    reason: format!(
                        "minimum length {} is shorter than the {classes} characters the other rules require",
                        strength.password_min_length
                    ),
                });
            }
        }
        Ok(())
    }

    fn boilerplate() -> Self {
        Self {
            policy_name: "Strong passwords".to_string(),
            policy_description: Some("Baseline for employees".to_string()),
            password_strength: Some(PasswordStrength {
                password_min_length: 12,
                password_min_alpha_chars: 2,
                password_min_numeric_chars: 1,
                password_min_upper_case_chars: 1,
                password_min_lower_case_chars: 1,
                password_min_special_chars: 1,
                password_max_repeated_chars: 2,
            }),
            password_security: Some(PasswordSecurity {
                pwd_in_history: 5,
                pwd_max_age: 7_776_000,
                pwd_max_failure: 5,
                pwd_lockout_duration: 1_800,
            }),
            ..Self::default()
        }
    }

    fn display_name(&self) -> Option<String> {
        Some(self.policy_name.clone())
    }
}
