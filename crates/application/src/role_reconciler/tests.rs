use std::sync::Arc;

use colaraz_core::AppError;
use colaraz_domain::{AccessRoleAssignment, CourseScope, OrgScope};

use crate::test_support::{FakeAccessRoleRepository, orgs, role, snapshot, user};

use super::{ReconcileResult, RoleReconciler};

fn reconciler() -> (RoleReconciler, FakeAccessRoleRepository) {
    let repository = FakeAccessRoleRepository::default();
    (RoleReconciler::new(Arc::new(repository.clone())), repository)
}

#[tokio::test]
async fn second_identical_call_performs_no_writes() {
    let (reconciler, repository) = reconciler();
    let staff = role("staff");

    let first = reconciler
        .reconcile(user(1), &staff, orgs(&["org1", "org2"]))
        .await;
    assert!(matches!(first, Ok(result) if result.created == 2));
    let after_first = snapshot(&repository).await;
    repository.reset_write_counts().await;

    let second = reconciler
        .reconcile(user(1), &staff, orgs(&["org1", "org2"]))
        .await;

    assert!(matches!(second, Ok(result) if result.is_noop() && result.remaining == 2));
    assert_eq!(repository.write_counts().await, (0, 0));
    assert_eq!(snapshot(&repository).await, after_first);
}

#[tokio::test]
async fn only_changed_orgs_are_written() {
    let (reconciler, repository) = reconciler();
    repository.seed(user(1), "staff", &["org1", "org2"]).await;

    let result = reconciler
        .reconcile(user(1), &role("staff"), orgs(&["org2", "org3"]))
        .await;

    assert!(matches!(
        result,
        Ok(ReconcileResult {
            deleted: 1,
            created: 1,
            remaining: 2
        })
    ));
    assert_eq!(repository.write_counts().await, (1, 1));
    assert_eq!(
        repository.orgs_for(user(1), "staff").await,
        vec!["org2".to_owned(), "org3".to_owned()]
    );
}

#[tokio::test]
async fn empty_desired_set_revokes_every_row() {
    let (reconciler, repository) = reconciler();
    repository.seed(user(1), "staff", &["org1", "org2"]).await;

    let result = reconciler
        .reconcile(user(1), &role("staff"), Vec::new())
        .await;

    assert!(matches!(result, Ok(result) if result.deleted == 2 && result.created == 0));
    assert!(repository.orgs_for(user(1), "staff").await.is_empty());
}

#[tokio::test]
async fn empty_existing_creates_exactly_one_row() {
    let (reconciler, repository) = reconciler();

    let result = reconciler
        .reconcile(user(1), &role("staff"), orgs(&["orgA"]))
        .await;

    assert!(matches!(result, Ok(result) if result.deleted == 0 && result.created == 1));
    assert_eq!(repository.orgs_for(user(1), "staff").await, vec!["orgA".to_owned()]);
}

#[tokio::test]
async fn repeated_desired_org_yields_one_row() {
    let (reconciler, repository) = reconciler();

    let result = reconciler
        .reconcile(user(1), &role("staff"), orgs(&["uet", "uet"]))
        .await;

    assert!(matches!(result, Ok(result) if result.created == 1));
    assert_eq!(repository.orgs_for(user(1), "staff").await, vec!["uet".to_owned()]);
}

#[tokio::test]
async fn instructor_scenario_keeps_lums_untouched() {
    let (reconciler, repository) = reconciler();
    repository.seed(user(42), "instructor", &["uet", "lums"]).await;

    let result = reconciler
        .reconcile(user(42), &role("instructor"), orgs(&["lums", "fast"]))
        .await;

    assert!(matches!(result, Ok(result) if result.deleted == 1 && result.created == 1));
    assert_eq!(
        repository.orgs_for(user(42), "instructor").await,
        vec!["fast".to_owned(), "lums".to_owned()]
    );
}

#[tokio::test]
async fn concurrent_duplicate_insert_is_benign() {
    let (reconciler, repository) = reconciler();
    repository
        .insert_behind_reads(AccessRoleAssignment::new(
            user(1),
            role("staff"),
            OrgScope::new("uet"),
            CourseScope::Empty,
        ))
        .await;

    let result = reconciler
        .reconcile(user(1), &role("staff"), orgs(&["uet"]))
        .await;

    assert!(matches!(result, Ok(result) if result.created == 0 && result.remaining == 1));
    assert_eq!(repository.orgs_for(user(1), "staff").await, vec!["uet".to_owned()]);
}

#[tokio::test]
async fn other_users_and_roles_are_left_alone() {
    let (reconciler, repository) = reconciler();
    repository.seed(user(1), "instructor", &["uet"]).await;
    repository.seed(user(2), "staff", &["uet"]).await;

    let result = reconciler
        .reconcile(user(1), &role("staff"), Vec::new())
        .await;

    assert!(matches!(result, Ok(result) if result.is_noop()));
    assert_eq!(repository.orgs_for(user(1), "instructor").await, vec!["uet".to_owned()]);
    assert_eq!(repository.orgs_for(user(2), "staff").await, vec!["uet".to_owned()]);
}

#[tokio::test]
async fn unavailable_store_aborts_the_call() {
    let (reconciler, repository) = reconciler();
    repository.set_unavailable(true).await;

    let result = reconciler
        .reconcile(user(1), &role("staff"), orgs(&["uet"]))
        .await;

    assert!(matches!(result, Err(AppError::Unavailable(_))));
}
