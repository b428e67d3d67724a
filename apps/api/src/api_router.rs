use axum::Router;
use axum::handler::Handler;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

#[cfg(test)]
mod tests;

pub fn build_router(app_state: AppState) -> Router {
    let actor_routes = Router::new()
        .route(
            "/api/internal/access-roles",
            get(handlers::access_roles::list_access_roles_handler)
                .post(handlers::access_roles::grant_access_roles_handler),
        )
        .route(
            "/api/internal/access-roles/revocations",
            post(handlers::access_roles::revoke_access_role_handler),
        )
        .route(
            "/api/internal/access-roles/lms-admins",
            post(handlers::access_roles::make_lms_admin_handler),
        )
        .route_layer(from_fn(middleware::require_actor));

    let internal_routes = Router::new()
        .route(
            "/api/internal/users/{user_id}/identity-assertions",
            post(handlers::identity_assertions::apply_identity_assertion_handler),
        )
        .route(
            "/api/internal/users/{user_id}/course-creator",
            get(handlers::course_creators::course_creator_status_handler).put(
                handlers::course_creators::update_course_creator_handler
                    .layer(from_fn(middleware::require_actor)),
            ),
        )
        .route(
            "/api/internal/users/{user_id}/course-admin-access",
            get(handlers::access_roles::course_admin_access_handler),
        )
        .route(
            "/api/internal/users/{user_id}/course-creation-organizations",
            post(handlers::access_roles::course_creation_organizations_handler),
        )
        .merge(actor_routes)
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_internal_auth,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(internal_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
