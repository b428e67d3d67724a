use colaraz_application::AssertionOutcome;
use colaraz_domain::{IdentityAssertion, InvalidRoleClaim, RoleClaimPayload};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

/// Incoming identity assertion sent by the login pipeline.
#[derive(Debug, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/identity-assertion-request.ts"
)]
pub struct IdentityAssertionRequest {
    #[serde(default)]
    pub is_course_creator: Option<bool>,
    #[serde(default)]
    pub roles: Vec<RoleClaimRequest>,
}

/// One role entry of an identity assertion.
///
/// Wrongly typed fields are reported per entry rather than failing the request.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-claim-request.ts"
)]
pub struct RoleClaimRequest {
    #[serde(default)]
    #[ts(type = "string | null")]
    pub role: Option<Value>,
    #[serde(default)]
    #[ts(type = "Array<string> | null")]
    pub orgs: Option<Value>,
}

impl From<IdentityAssertionRequest> for IdentityAssertion {
    fn from(value: IdentityAssertionRequest) -> Self {
        Self {
            is_course_creator: value.is_course_creator,
            roles: value
                .roles
                .into_iter()
                .map(|claim| RoleClaimPayload {
                    role: claim.role,
                    orgs: claim.orgs,
                })
                .collect(),
        }
    }
}

/// Result of applying an identity assertion.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/assertion-outcome-response.ts"
)]
pub struct AssertionOutcomeResponse {
    pub reconciliation_id: String,
    pub course_creator_state: Option<String>,
    pub roles: Vec<RoleReconcileResultResponse>,
    pub skipped: Vec<SkippedRoleClaimResponse>,
}

/// Write counts for one reconciled role.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/role-reconcile-result-response.ts"
)]
pub struct RoleReconcileResultResponse {
    pub role: String,
    pub deleted: u32,
    pub created: u32,
    pub remaining: u32,
}

/// Role entry that was skipped as invalid.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/skipped-role-claim-response.ts"
)]
pub struct SkippedRoleClaimResponse {
    pub index: u32,
    pub role: Option<String>,
    pub reason: String,
}

impl From<InvalidRoleClaim> for SkippedRoleClaimResponse {
    fn from(value: InvalidRoleClaim) -> Self {
        Self {
            index: saturating_u32(value.index),
            role: value.role,
            reason: value.reason,
        }
    }
}

impl From<AssertionOutcome> for AssertionOutcomeResponse {
    fn from(value: AssertionOutcome) -> Self {
        Self {
            reconciliation_id: value.reconciliation_id.to_string(),
            course_creator_state: value
                .course_creator_state
                .map(|state| state.as_str().to_owned()),
            roles: value
                .roles
                .into_iter()
                .map(|(role, result)| RoleReconcileResultResponse {
                    role: role.as_str().to_owned(),
                    deleted: saturating_u32(result.deleted),
                    created: saturating_u32(result.created),
                    remaining: saturating_u32(result.remaining),
                })
                .collect(),
            skipped: value
                .skipped
                .into_iter()
                .map(SkippedRoleClaimResponse::from)
                .collect(),
        }
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
