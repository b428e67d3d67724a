use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use colaraz_core::{ActorIdentity, AppError, UserId};
use subtle::ConstantTimeEq;

use crate::error::ApiResult;
use crate::state::AppState;

pub const ACTOR_USER_ID_HEADER: &str = "x-actor-user-id";
pub const ACTOR_IS_STAFF_HEADER: &str = "x-actor-is-staff";

/// Rejects requests that do not carry the shared internal bearer token.
pub async fn require_internal_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::Unauthorized("bearer token required".to_owned()))?;

    let matches: bool = token
        .as_bytes()
        .ct_eq(state.internal_api_token.as_bytes())
        .into();
    if !matches {
        return Err(AppError::Unauthorized("invalid internal api token".to_owned()).into());
    }

    Ok(next.run(request).await)
}

/// Resolves the acting administrator from trusted caller headers.
pub async fn require_actor(mut request: Request, next: Next) -> ApiResult<Response> {
    let actor = actor_from_headers(request.headers())?
        .ok_or_else(|| AppError::Unauthorized(format!("{ACTOR_USER_ID_HEADER} is required")))?;

    request.extensions_mut().insert(actor);
    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Parses the optional actor headers. A missing user id header yields `None`.
pub fn actor_from_headers(headers: &HeaderMap) -> Result<Option<ActorIdentity>, AppError> {
    let Some(raw_user_id) = headers.get(ACTOR_USER_ID_HEADER) else {
        return Ok(None);
    };

    let user_id = raw_user_id
        .to_str()
        .ok()
        .and_then(|value| value.trim().parse::<i64>().ok())
        .ok_or_else(|| {
            AppError::Validation(format!("{ACTOR_USER_ID_HEADER} must be a numeric user id"))
        })
        .and_then(UserId::new)?;

    let is_staff = headers
        .get(ACTOR_IS_STAFF_HEADER)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim().eq_ignore_ascii_case("true"));

    Ok(Some(ActorIdentity::new(user_id, is_staff)))
}

#[cfg(test)]
mod tests {
    use axum::http::{HeaderMap, HeaderValue, header};

    use super::{ACTOR_IS_STAFF_HEADER, ACTOR_USER_ID_HEADER, actor_from_headers, bearer_token};

    #[test]
    fn bearer_token_requires_scheme_and_value() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer secret"));
        assert_eq!(bearer_token(&headers), Some("secret"));
    }

    #[test]
    fn actor_headers_are_parsed() {
        let mut headers = HeaderMap::new();
        assert!(matches!(actor_from_headers(&headers), Ok(None)));

        headers.insert(ACTOR_USER_ID_HEADER, HeaderValue::from_static("12"));
        headers.insert(ACTOR_IS_STAFF_HEADER, HeaderValue::from_static("TRUE"));
        let actor = actor_from_headers(&headers);
        assert!(matches!(
            actor,
            Ok(Some(actor)) if actor.user_id().as_i64() == 12 && actor.is_staff()
        ));
    }

    #[test]
    fn invalid_actor_id_is_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(ACTOR_USER_ID_HEADER, HeaderValue::from_static("admin"));

        assert!(actor_from_headers(&headers).is_err());
    }
}
