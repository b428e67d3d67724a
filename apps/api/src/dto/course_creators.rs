use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Incoming payload for setting the course-creator flag.
#[derive(Debug, Deserialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/update-course-creator-request.ts"
)]
pub struct UpdateCourseCreatorRequest {
    pub is_course_creator: bool,
}

/// API representation of a user's course-creator state.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../../packages/api-types/src/generated/course-creator-status-response.ts"
)]
pub struct CourseCreatorStatusResponse {
    pub user_id: i64,
    pub state: String,
}
