//! Role claims delivered by the identity provider at login time.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::access_role::{OrgScope, RoleName};

/// Raw identity assertion as delivered by the authentication pipeline.
///
/// Fields are optional so that a malformed role entry can be skipped without
/// rejecting the whole assertion.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityAssertion {
    /// Explicit course-creator flag, when the provider sends one.
    #[serde(default)]
    pub is_course_creator: Option<bool>,
    /// Role entries in provider order.
    #[serde(default)]
    pub roles: Vec<RoleClaimPayload>,
}

/// One raw `{ "role": ..., "orgs": [...] }` entry.
///
/// Fields stay untyped JSON so a wrongly typed value only invalidates its own entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleClaimPayload {
    /// Role tag, expected to be a string.
    #[serde(default)]
    pub role: Option<Value>,
    /// Organisations the role should be held in, expected to be a list of strings.
    #[serde(default)]
    pub orgs: Option<Value>,
}

/// Validated desired state for one role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleClaim {
    /// Role tag.
    pub role: RoleName,
    /// Deduplicated desired organisations; empty means revoke everywhere.
    pub orgs: BTreeSet<OrgScope>,
}

/// Reason a role entry was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvalidRoleClaim {
    /// Position of the entry in the assertion.
    pub index: usize,
    /// Role tag as sent, when present.
    pub role: Option<String>,
    /// Human readable reason.
    pub reason: String,
}

/// Assertion split into applicable claims and rejected entries.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidatedAssertion {
    /// Explicit course-creator flag.
    pub is_course_creator: Option<bool>,
    /// One claim per distinct role, in role-name order.
    pub claims: Vec<RoleClaim>,
    /// Entries skipped as invalid.
    pub invalid: Vec<InvalidRoleClaim>,
}

impl IdentityAssertion {
    /// Validates role entries and merges entries repeating a role name.
    #[must_use]
    pub fn validate(&self) -> ValidatedAssertion {
        let mut merged: BTreeMap<RoleName, BTreeSet<OrgScope>> = BTreeMap::new();
        let mut invalid = Vec::new();

        for (index, entry) in self.roles.iter().enumerate() {
            let raw_role = match entry.role.as_ref() {
                None | Some(Value::Null) => {
                    invalid.push(InvalidRoleClaim {
                        index,
                        role: None,
                        reason: "role entry is missing 'role'".to_owned(),
                    });
                    continue;
                }
                Some(Value::String(raw_role)) => raw_role,
                Some(other) => {
                    invalid.push(InvalidRoleClaim {
                        index,
                        role: Some(other.to_string()),
                        reason: "'role' must be a string".to_owned(),
                    });
                    continue;
                }
            };

            let role = match RoleName::new(raw_role.as_str()) {
                Ok(role) => role,
                Err(error) => {
                    invalid.push(InvalidRoleClaim {
                        index,
                        role: Some(raw_role.clone()),
                        reason: error.to_string(),
                    });
                    continue;
                }
            };

            let orgs = match entry.orgs.as_ref() {
                None | Some(Value::Null) => Err("role entry is missing 'orgs'"),
                Some(value) => org_list(value).ok_or("'orgs' must be a list of strings"),
            };
            let orgs = match orgs {
                Ok(orgs) => orgs,
                Err(reason) => {
                    invalid.push(InvalidRoleClaim {
                        index,
                        role: Some(role.as_str().to_owned()),
                        reason: reason.to_owned(),
                    });
                    continue;
                }
            };

            merged
                .entry(role)
                .or_default()
                .extend(orgs.into_iter().filter(|org| !org.is_unscoped()));
        }

        ValidatedAssertion {
            is_course_creator: self.is_course_creator,
            claims: merged
                .into_iter()
                .map(|(role, orgs)| RoleClaim { role, orgs })
                .collect(),
            invalid,
        }
    }
}

fn org_list(value: &Value) -> Option<Vec<OrgScope>> {
    value
        .as_array()?
        .iter()
        .map(|org| org.as_str().map(OrgScope::new))
        .collect()
}
