use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, can_manage_course, load_course};
use crate::models::courses::responses::CourseStudentsResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

pub async fn list_students(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let course = match load_course(&storage, course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if !can_manage_course(&user, &course) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to view this course roster",
        )));
    }

    match storage.list_course_students(course.id).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CourseStudentsResponse { items },
            "Students retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to retrieve students",
            e,
        )),
    }
}
