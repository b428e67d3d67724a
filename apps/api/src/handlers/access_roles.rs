use axum::Json;
use axum::extract::{Extension, Path, Query, State};
use axum::http::StatusCode;

use colaraz_application::{GrantRolesInput, KnownOrganization};
use colaraz_core::{ActorIdentity, UserId};
use colaraz_domain::{AccessRoleAssignment, CourseKey, OrgScope};

use crate::dto::{
    AccessRoleResponse, CourseAdminAccessQuery, CourseAdminAccessResponse,
    CourseCreationOrganizationsRequest, GrantAccessRolesRequest, MakeLmsAdminRequest,
    RevokeAccessRoleRequest,
};
use crate::error::ApiResult;
use crate::state::AppState;


pub async fn list_access_roles_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
) -> ApiResult<Json<Vec<AccessRoleResponse>>> {
    let service = &state.access_role_admin_service;
    let records = service.list_assignments(&actor).await?;

    Ok(Json(
        records
            .into_iter()
            .map(|record| {
                let display_name = service.display_name(&record.assignment);
                AccessRoleResponse::from_record(record, display_name)
            })
            .collect(),
    ))
}

pub async fn grant_access_roles_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    Json(payload): Json<GrantAccessRolesRequest>,
) -> ApiResult<(StatusCode, Json<Vec<String>>)> {
    let granted = state
        .access_role_admin_service
        .grant_roles(
            &actor,
            GrantRolesInput {
                user_id: UserId::new(payload.user_id)?,
                org: OrgScope::new(payload.org),
                roles: payload.roles,
                course_ids: payload.course_ids,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(granted.iter().map(ToString::to_string).collect()),
    ))
}

pub async fn revoke_access_role_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    Json(payload): Json<RevokeAccessRoleRequest>,
) -> ApiResult<StatusCode> {
    let assignment = AccessRoleAssignment::try_from(payload)?;
    state
        .access_role_admin_service
        .revoke_assignment(&actor, &assignment)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn make_lms_admin_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    Json(payload): Json<MakeLmsAdminRequest>,
) -> ApiResult<StatusCode> {
    state
        .access_role_admin_service
        .make_lms_admin(
            &actor,
            UserId::new(payload.user_id)?,
            OrgScope::new(payload.org),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn course_admin_access_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Query(query): Query<CourseAdminAccessQuery>,
) -> ApiResult<Json<CourseAdminAccessResponse>> {
    let course_key = CourseKey::parse(query.course_id)?;
    let has_access = state
        .access_role_admin_service
        .has_course_admin_access(UserId::new(user_id)?, &course_key, query.user_org.as_str())
        .await?;

    Ok(Json(CourseAdminAccessResponse { has_access }))
}

pub async fn course_creation_organizations_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(payload): Json<CourseCreationOrganizationsRequest>,
) -> ApiResult<Json<Vec<String>>> {
    let known_orgs: Vec<KnownOrganization> = payload
        .organizations
        .into_iter()
        .map(KnownOrganization::from)
        .collect();

    let orgs = state
        .access_role_admin_service
        .course_creation_organizations(UserId::new(user_id)?, payload.is_superuser, &known_orgs)
        .await?;

    Ok(Json(orgs))
}
