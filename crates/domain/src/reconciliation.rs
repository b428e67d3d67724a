use std::collections::BTreeSet;

use crate::access_role::{AssignmentScope, OrgScope};

/// Minimal write set bringing one (user, role) partition to a desired org set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReconciliationPlan {
    /// Existing rows whose org is no longer desired.
    pub to_delete: Vec<AssignmentScope>,
    /// Desired orgs with no existing row.
    pub to_create: Vec<OrgScope>,
}

impl ReconciliationPlan {
    /// Computes `existing - desired` and `desired - existing` over org scopes.
    ///
    /// Any existing row for an org, course-scoped or not, satisfies that org.
    #[must_use]
    pub fn compute(existing: &BTreeSet<AssignmentScope>, desired: &BTreeSet<OrgScope>) -> Self {
        let existing_orgs: BTreeSet<&OrgScope> = existing.iter().map(|scope| &scope.org).collect();

        let to_delete = existing
            .iter()
            .filter(|scope| !desired.contains(&scope.org))
            .cloned()
            .collect();
        let to_create = desired
            .iter()
            .filter(|org| !existing_orgs.contains(org))
            .cloned()
            .collect();

        Self {
            to_delete,
            to_create,
        }
    }

    /// Returns whether no writes are needed.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.to_delete.is_empty() && self.to_create.is_empty()
    }
}
