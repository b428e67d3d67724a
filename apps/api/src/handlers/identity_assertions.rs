use axum::Json;
use axum::extract::{Path, State};
use axum::http::HeaderMap;

use colaraz_core::UserId;
use colaraz_domain::IdentityAssertion;

use crate::dto::{AssertionOutcomeResponse, IdentityAssertionRequest};
use crate::error::ApiResult;
use crate::middleware::actor_from_headers;
use crate::state::AppState;


/// Applies the role claims delivered for a user at login.
///
/// The optional actor header names the approver recorded on the
/// course-creator record; it defaults to the user.
pub async fn apply_identity_assertion_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    headers: HeaderMap,
    Json(payload): Json<IdentityAssertionRequest>,
) -> ApiResult<Json<AssertionOutcomeResponse>> {
    let user_id = UserId::new(user_id)?;
    let approving_actor = actor_from_headers(&headers)?.map(|actor| actor.user_id());
    let assertion = IdentityAssertion::from(payload);

    let outcome = state
        .identity_assertion_service
        .apply_assertion(user_id, &assertion, approving_actor)
        .await?;

    Ok(Json(AssertionOutcomeResponse::from(outcome)))
}
