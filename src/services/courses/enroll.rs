use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{CourseService, load_course};
use crate::models::courses::{entities::EnrollmentStatus, responses::EnrollmentResponse};
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::fees::summary::registration_eligibility;
use crate::services::{current_user, forbidden, not_found, storage_failure};

/// 选课；缴费比例未达阈值时拒绝，已退课的记录重新激活
pub async fn enroll(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if user.role != UserRole::Student {
        return Ok(forbidden("Only students can enroll in courses"));
    }
    let storage = service.get_storage(request)?;

    let course = match load_course(&storage, course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };

    match storage.get_enrollment(course.id, user.id).await {
        Ok(Some(enrollment)) if enrollment.status == EnrollmentStatus::Active => {
            return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                ErrorCode::AlreadyEnrolled,
                "Already enrolled in this course",
            )));
        }
        Ok(_) => {}
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to load enrollment",
                e,
            ));
        }
    }

    if !registration_eligibility(&storage, user.id).await {
        tracing::info!(
            "Enrollment of student {} in course {} blocked by fee threshold",
            user.id,
            course.id
        );
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::FeeRegistrationBlocked,
            "Course registration is blocked until the required share of fees is paid",
        )));
    }

    match storage.enroll_student(course.id, user.id).await {
        Ok(enrollment) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            EnrollmentResponse { enrollment },
            "Enrolled successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to enroll",
            e,
        )),
    }
}

pub async fn drop_course(
    service: &CourseService,
    course_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    if user.role != UserRole::Student {
        return Ok(forbidden("Only students can drop courses"));
    }
    let storage = service.get_storage(request)?;

    match storage.get_enrollment(course_id, user.id).await {
        Ok(Some(enrollment)) if enrollment.status == EnrollmentStatus::Active => {}
        Ok(_) => {
            return Ok(not_found(
                ErrorCode::NotEnrolled,
                "You are not enrolled in this course",
            ));
        }
        Err(e) => {
            return Ok(storage_failure(
                ErrorCode::InternalServerError,
                "Failed to load enrollment",
                e,
            ));
        }
    }

    match storage
        .update_enrollment_status(course_id, user.id, EnrollmentStatus::Dropped)
        .await
    {
        Ok(true) => Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Course dropped"))),
        Ok(false) => Ok(not_found(
            ErrorCode::EnrollmentNotFound,
            "Enrollment not found",
        )),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to drop course",
            e,
        )),
    }
}
