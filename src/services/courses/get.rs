use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, load_course};
use crate::models::courses::responses::CourseDetailResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user, storage_failure};

pub async fn get_course(
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

    let lecturer_name = match storage.get_user_by_id(course.lecturer_id).await {
        Ok(lecturer) => lecturer.map(|l| {
            if l.profile.profile_name.is_empty() {
                l.username
            } else {
                l.profile.profile_name
            }
        }),
        Err(e) => {
            tracing::warn!("Failed to load lecturer {}: {}", course.lecturer_id, e);
            None
        }
    };

    let enrolled_count = match storage.count_active_enrollments(course.id).await {
        Ok(count) => count as i64,
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to count enrollments",
                e,
            ));
        }
    };

    let my_enrollment = if user.role == UserRole::Student {
        match storage.get_enrollment(course.id, user.id).await {
            Ok(enrollment) => enrollment,
            Err(e) => {
                return Ok(storage_failure(
                    ErrorCode::InternalServerError,
                    "Failed to load enrollment",
                    e,
                ));
            }
        }
    } else {
        None
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        CourseDetailResponse {
            course,
            lecturer_name,
            enrolled_count,
            my_enrollment,
        },
        "Course retrieved successfully",
    )))
}
