use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::AssignmentService;
use crate::models::assignments::{
    requests::{AssignmentListParams, AssignmentListQuery},
    responses::UpcomingAssignmentsResponse,
};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::courses::{is_course_member, load_course};
use crate::services::{current_user, forbidden, storage_failure};

/// 按课程过滤时要求是课程成员；否则只列出调用者可见课程的作业
pub async fn list_assignments(
    service: &AssignmentService,
    query: AssignmentListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let mut list_query = AssignmentListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        course_id: query.course_id,
        course_ids: None,
    };

    if let Some(course_id) = query.course_id {
        let course = match load_course(&storage, course_id).await {
            Ok(course) => course,
            Err(resp) => return Ok(resp),
        };
        match is_course_member(&storage, &user, &course).await {
            Ok(true) => {}
            Ok(false) => return Ok(forbidden("You are not a member of this course")),
            Err(e) => {
                return Ok(storage_failure(
                    ErrorCode::InternalServerError,
                    "Failed to check course membership",
                    e,
                ));
            }
        }
    } else {
        let visible = match user.role {
            UserRole::Student => storage.list_student_course_ids(user.id).await.map(Some),
            UserRole::Lecturer => storage.list_lecturer_course_ids(user.id).await.map(Some),
            UserRole::Dean | UserRole::Admin => Ok(None),
        };
        match visible {
            Ok(ids) => list_query.course_ids = ids,
            Err(e) => {
                return Ok(storage_failure(
                    ErrorCode::InternalServerError,
                    "Failed to resolve visible courses",
                    e,
                ));
            }
        }
    }

    match storage.list_assignments_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Assignments retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to retrieve assignments",
            e,
        )),
    }
}

/// 当前学生尚未提交、截止时间未到的作业
pub async fn list_upcoming(
    service: &AssignmentService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if user.role != UserRole::Student {
        return Ok(forbidden("Only students have upcoming assignments"));
    }
    let storage = service.get_storage(request)?;

    match storage
        .list_upcoming_assignments(user.id, chrono::Utc::now().timestamp())
        .await
    {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            UpcomingAssignmentsResponse { items },
            "Upcoming assignments retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to retrieve upcoming assignments",
            e,
        )),
    }
}
