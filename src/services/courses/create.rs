use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{CourseService, check_lecturer, validate_credits};
use crate::models::courses::{requests::CreateCourseRequest, responses::CourseDetailResponse};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{bad_request, current_user, forbidden, storage_failure};
use crate::utils::validate::validate_text;

static COURSE_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z0-9][A-Z0-9-]{1,19}$").expect("Invalid course code regex"));

/// 课程代码统一转为大写
pub(crate) fn normalize_course_code(code: &str) -> Option<String> {
    let code = code.trim().to_ascii_uppercase();
    COURSE_CODE_RE.is_match(&code).then_some(code)
}

pub async fn create_course(
    service: &CourseService,
    mut course: CreateCourseRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };

    course.code = match normalize_course_code(&course.code) {
        Some(code) => code,
        None => {
            return Ok(bad_request(
                ErrorCode::CourseInvalid,
                "Course code must be 2-20 letters, digits or '-'",
            ));
        }
    };
    course.title = course.title.trim().to_string();
    if let Err(msg) = validate_text("title", &course.title, 200) {
        return Ok(bad_request(ErrorCode::CourseInvalid, msg));
    }
    if let Err(msg) = validate_credits(course.credits) {
        return Ok(bad_request(ErrorCode::CourseInvalid, msg));
    }

    let storage = service.get_storage(request)?;

    // 讲师只能为自己开课；院长/管理员必须指定讲师
    let lecturer_id = match user.role {
        UserRole::Lecturer => user.id,
        UserRole::Dean | UserRole::Admin => match course.lecturer_id {
            Some(id) => {
                if let Err(resp) = check_lecturer(&storage, id).await {
                    return Ok(resp);
                }
                id
            }
            None => {
                return Ok(bad_request(
                    ErrorCode::CourseInvalid,
                    "lecturer_id is required",
                ));
            }
        },
        UserRole::Student => return Ok(forbidden("Students cannot create courses")),
    };

    match storage.get_course_by_code(&course.code).await {
        Ok(Some(_)) => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::CourseCodeAlreadyExists,
                format!("Course code '{}' already exists", course.code),
            )));
        }
        Ok(None) => {}
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to check course code",
                e,
            ));
        }
    }

    match storage.create_course(lecturer_id, course).await {
        Ok(course) => {
            tracing::info!("Course {} created by user {}", course.code, user.id);
            Ok(HttpResponse::Created().json(ApiResponse::success(
                CourseDetailResponse {
                    course,
                    lecturer_name: None,
                    enrolled_count: 0,
                    my_enrollment: None,
                },
                "Course created successfully",
            )))
        }
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to create course",
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_course_code() {
        assert_eq!(normalize_course_code(" cs101 "), Some("CS101".to_string()));
        assert_eq!(normalize_course_code("MATH-201"), Some("MATH-201".to_string()));
        assert_eq!(normalize_course_code("X"), None);
        assert_eq!(normalize_course_code("CS 101"), None);
        assert_eq!(normalize_course_code("-CS1"), None);
    }
}
