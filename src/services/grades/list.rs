use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::GradeService;
use crate::models::grades::requests::{GradeListParams, GradeListQuery};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, forbidden, storage_failure};

/// 学生看自己的，讲师看所授课程的，院长/管理员看全部
pub async fn list_grades(
    service: &GradeService,
    query: GradeListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    let mut list_query = GradeListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        course_id: query.course_id,
        assignment_id: query.assignment_id,
        student_id: query.student_id,
        lecturer_id: None,
    };

    match user.role {
        UserRole::Student => {
            if query.student_id.is_some_and(|id| id != user.id) {
                return Ok(forbidden("You can only view your own grades"));
            }
            list_query.student_id = Some(user.id);
        }
        UserRole::Lecturer => list_query.lecturer_id = Some(user.id),
        UserRole::Dean | UserRole::Admin => {}
    }

    let storage = service.get_storage(request)?;

    match storage.list_grades_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Grades retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to retrieve grades",
            e,
        )),
    }
}
