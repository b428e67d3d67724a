use tracing::{info, warn};
use uuid::Uuid;

use colaraz_core::{AppResult, UserId};
use colaraz_domain::{
    COURSE_CREATOR_ROLE, CourseCreatorState, IdentityAssertion, InvalidRoleClaim, RoleName,
};

use crate::course_creator_gate::CourseCreatorGate;
use crate::role_reconciler::{ReconcileResult, RoleReconciler};

#[cfg(test)]
mod tests;

/// Result of applying one identity assertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssertionOutcome {
    /// Correlation id attached to every log line of the call.
    pub reconciliation_id: Uuid,
    /// Course-creator state written, if the gate was touched.
    pub course_creator_state: Option<CourseCreatorState>,
    /// Per-role reconciliation results in role-name order.
    pub roles: Vec<(RoleName, ReconcileResult)>,
    /// Role entries skipped as invalid.
    pub skipped: Vec<InvalidRoleClaim>,
}

/// Applies login-time role claims through the reconciler and the gate.
#[derive(Clone)]
pub struct IdentityAssertionService {
    reconciler: RoleReconciler,
    gate: CourseCreatorGate,
}

impl IdentityAssertionService {
    /// Creates the service from its collaborators.
    #[must_use]
    pub fn new(reconciler: RoleReconciler, gate: CourseCreatorGate) -> Self {
        Self { reconciler, gate }
    }

    /// Makes the stored roles of `user_id` match the assertion.
    ///
    /// Invalid role entries are skipped and reported. A store outage aborts
    /// the call; roles reconciled before the failure stay committed and a
    /// retry converges.
    pub async fn apply_assertion(
        &self,
        user_id: UserId,
        assertion: &IdentityAssertion,
        approving_actor: Option<UserId>,
    ) -> AppResult<AssertionOutcome> {
        let reconciliation_id = Uuid::new_v4();
        let approving_actor = approving_actor.unwrap_or(user_id);
        let validated = assertion.validate();

        for skipped in &validated.invalid {
            warn!(
                %reconciliation_id,
                %user_id,
                index = skipped.index,
                role = skipped.role.as_deref().unwrap_or_default(),
                reason = %skipped.reason,
                "skipping invalid role claim"
            );
        }

        let mut course_creator_state = None;
        if let Some(is_creator) = validated.is_course_creator {
            let status = self
                .gate
                .set_course_creator_flag(user_id, is_creator, approving_actor)
                .await?;
            course_creator_state = Some(status.state);
        }

        let mut roles = Vec::with_capacity(validated.claims.len());
        for claim in validated.claims {
            let result = self
                .reconciler
                .reconcile(user_id, &claim.role, claim.orgs)
                .await?;

            if validated.is_course_creator.is_none() && claim.role.as_str() == COURSE_CREATOR_ROLE
            {
                course_creator_state = self
                    .derive_course_creator_state(user_id, result, approving_actor)
                    .await?;
            }

            roles.push((claim.role, result));
        }

        info!(
            %reconciliation_id,
            %user_id,
            roles = roles.len(),
            skipped = validated.invalid.len(),
            "applied identity assertion"
        );

        Ok(AssertionOutcome {
            reconciliation_id,
            course_creator_state,
            roles,
            skipped: validated.invalid,
        })
    }

    async fn derive_course_creator_state(
        &self,
        user_id: UserId,
        result: ReconcileResult,
        approving_actor: UserId,
    ) -> AppResult<Option<CourseCreatorState>> {
        let is_creator = if result.remaining > 0 {
            true
        } else if result.deleted > 0 {
            false
        } else {
            return Ok(None);
        };

        let status = self
            .gate
            .set_course_creator_flag(user_id, is_creator, approving_actor)
            .await?;
        Ok(Some(status.state))
    }
}
