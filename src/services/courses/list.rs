use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::CourseService;
use crate::models::courses::requests::{CourseListParams, CourseListQuery};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

pub async fn list_courses(
    service: &CourseService,
    query: CourseListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let mut list_query = CourseListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
        department: query.department,
        lecturer_id: query.lecturer_id,
        enrolled_student_id: None,
    };

    // mine：学生看已选课程，讲师看自己讲授的课程
    if query.mine.unwrap_or(false) {
        match user.role {
            UserRole::Student => list_query.enrolled_student_id = Some(user.id),
            _ => list_query.lecturer_id = Some(user.id),
        }
    }

    match storage.list_courses_with_pagination(list_query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Courses retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to retrieve courses",
            e,
        )),
    }
}
