use axum::Json;
use axum::extract::{Extension, Path, State};

use colaraz_core::{ActorIdentity, AppError, UserId};

use crate::dto::{CourseCreatorStatusResponse, UpdateCourseCreatorRequest};
use crate::error::ApiResult;
use crate::state::AppState;


pub async fn course_creator_status_handler(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<CourseCreatorStatusResponse>> {
    let user_id = UserId::new(user_id)?;
    let course_creator_state = state.course_creator_gate.course_creator_status(user_id).await?;

    Ok(Json(CourseCreatorStatusResponse {
        user_id: user_id.as_i64(),
        state: course_creator_state.as_str().to_owned(),
    }))
}

pub async fn update_course_creator_handler(
    State(state): State<AppState>,
    Extension(actor): Extension<ActorIdentity>,
    Path(user_id): Path<i64>,
    Json(payload): Json<UpdateCourseCreatorRequest>,
) -> ApiResult<Json<CourseCreatorStatusResponse>> {
    if !actor.is_staff() {
        return Err(AppError::Forbidden(
            "only staff can change course creator access".to_owned(),
        )
        .into());
    }

    let user_id = UserId::new(user_id)?;
    let status = state
        .course_creator_gate
        .set_course_creator_flag(user_id, payload.is_course_creator, actor.user_id())
        .await?;

    Ok(Json(CourseCreatorStatusResponse {
        user_id: status.user_id.as_i64(),
        state: status.state.as_str().to_owned(),
    }))
}
