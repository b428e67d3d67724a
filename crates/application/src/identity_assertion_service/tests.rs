use std::sync::Arc;

use serde_json::json;

use colaraz_core::AppError;
use colaraz_domain::{CourseCreatorState, IdentityAssertion};

use crate::course_creator_gate::CourseCreatorGate;
use crate::role_reconciler::RoleReconciler;
use crate::test_support::{FakeAccessRoleRepository, FakeCourseCreatorRepository, user};

use super::IdentityAssertionService;

struct Harness {
    service: IdentityAssertionService,
    roles: FakeAccessRoleRepository,
    course_creators: FakeCourseCreatorRepository,
}

fn harness() -> Harness {
    let roles = FakeAccessRoleRepository::default();
    let course_creators = FakeCourseCreatorRepository::default();
    let service = IdentityAssertionService::new(
        RoleReconciler::new(Arc::new(roles.clone())),
        CourseCreatorGate::new(Arc::new(course_creators.clone())),
    );

    Harness {
        service,
        roles,
        course_creators,
    }
}

fn assertion(value: serde_json::Value) -> IdentityAssertion {
    match serde_json::from_value(value) {
        Ok(assertion) => assertion,
        Err(error) => panic!("assertion fixture must deserialize: {error}"),
    }
}

#[tokio::test]
async fn login_assertion_sets_flag_and_roles() {
    let harness = harness();
    let payload = assertion(json!({
        "isCourseCreator": true,
        "roles": [
            { "role": "course_creator_group", "orgs": ["uet", "lums"] },
            { "role": "staff", "orgs": ["uet", "lums"] }
        ]
    }));

    let outcome = harness
        .service
        .apply_assertion(user(101), &payload, None)
        .await;

    let Ok(outcome) = outcome else {
        panic!("assertion should apply");
    };
    assert_eq!(outcome.course_creator_state, Some(CourseCreatorState::Granted));
    assert_eq!(outcome.roles.len(), 2);
    assert!(outcome.skipped.is_empty());
    assert_eq!(
        harness.roles.orgs_for(user(101), "staff").await,
        vec!["lums".to_owned(), "uet".to_owned()]
    );
    assert!(matches!(
        harness.course_creators.status(user(101)).await,
        Some(status) if status.approved_by == user(101)
    ));
}

#[tokio::test]
async fn invalid_entries_are_skipped_without_blocking_others() {
    let harness = harness();
    let payload = assertion(json!({
        "roles": [
            { "orgs": ["uet"] },
            { "role": "instructor", "orgs": ["lums"] }
        ]
    }));

    let outcome = harness
        .service
        .apply_assertion(user(7), &payload, None)
        .await;

    assert!(matches!(&outcome, Ok(outcome) if outcome.skipped.len() == 1 && outcome.roles.len() == 1));
    assert_eq!(
        harness.roles.orgs_for(user(7), "instructor").await,
        vec!["lums".to_owned()]
    );
}

#[tokio::test]
async fn repeated_assertion_is_idempotent() {
    let harness = harness();
    let payload = assertion(json!({
        "roles": [{ "role": "staff", "orgs": ["uet"] }]
    }));

    assert!(harness.service.apply_assertion(user(7), &payload, None).await.is_ok());
    harness.roles.reset_write_counts().await;

    let outcome = harness.service.apply_assertion(user(7), &payload, None).await;

    assert!(matches!(&outcome, Ok(outcome) if outcome.roles.iter().all(|(_, result)| result.is_noop())));
    assert_eq!(harness.roles.write_counts().await, (0, 0));
}

#[tokio::test]
async fn course_creator_gate_follows_role_when_flag_is_absent() {
    let harness = harness();
    harness.roles.seed(user(9), "course_creator_group", &["uet"]).await;

    let revoke = assertion(json!({
        "roles": [{ "role": "course_creator_group", "orgs": [] }]
    }));
    let outcome = harness
        .service
        .apply_assertion(user(9), &revoke, Some(user(1)))
        .await;

    assert!(matches!(
        &outcome,
        Ok(outcome) if outcome.course_creator_state == Some(CourseCreatorState::Denied)
    ));
    assert!(matches!(
        harness.course_creators.status(user(9)).await,
        Some(status) if status.approved_by == user(1)
    ));
}

#[tokio::test]
async fn untouched_course_creator_role_leaves_gate_alone() {
    let harness = harness();
    let payload = assertion(json!({
        "roles": [{ "role": "course_creator_group", "orgs": [] }]
    }));

    let outcome = harness.service.apply_assertion(user(9), &payload, None).await;

    assert!(matches!(&outcome, Ok(outcome) if outcome.course_creator_state.is_none()));
    assert_eq!(harness.course_creators.record_count().await, 0);
}

#[tokio::test]
async fn store_outage_aborts_the_assertion() {
    let harness = harness();
    harness.course_creators.set_unavailable(true).await;
    let payload = assertion(json!({
        "isCourseCreator": false,
        "roles": [{ "role": "staff", "orgs": ["uet"] }]
    }));

    let outcome = harness.service.apply_assertion(user(7), &payload, None).await;

    assert!(matches!(outcome, Err(AppError::Unavailable(_))));
    assert!(harness.roles.orgs_for(user(7), "staff").await.is_empty());
}
