use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, can_manage_course, check_lecturer, load_course, validate_credits};
use crate::models::courses::{requests::UpdateCourseRequest, responses::CourseDetailResponse};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, not_found, storage_failure};
use crate::utils::validate::validate_text;

/// 课程代码创建后不可修改；更换讲师仅限院长/管理员
pub async fn update_course(
    service: &CourseService,
    course_id: i64,
    mut update: UpdateCourseRequest,
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
            "You do not have permission to modify this course",
        )));
    }

    if let Some(ref title) = update.title {
        if let Err(msg) = validate_text("title", title, 200) {
            return Ok(bad_request(ErrorCode::CourseInvalid, msg));
        }
        update.title = Some(title.trim().to_string());
    }
    if let Some(credits) = update.credits
        && let Err(msg) = validate_credits(credits)
    {
        return Ok(bad_request(ErrorCode::CourseInvalid, msg));
    }

    if let Some(lecturer_id) = update.lecturer_id
        && lecturer_id != course.lecturer_id
    {
        if !user.role.is_manager() {
            return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
                ErrorCode::CoursePermissionDenied,
                "Only deans and administrators can reassign a course",
            )));
        }
        if let Err(resp) = check_lecturer(&storage, lecturer_id).await {
            return Ok(resp);
        }
    }

    match storage.update_course(course_id, update).await {
        Ok(Some(course)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            CourseDetailResponse {
                course,
                lecturer_name: None,
                enrolled_count: 0,
                my_enrollment: None,
            },
            "Course updated successfully",
        ))),
        Ok(None) => Ok(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to update course",
            e,
        )),
    }
}
