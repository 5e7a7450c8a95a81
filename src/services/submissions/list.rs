use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::SubmissionService;
use crate::models::submissions::requests::{SubmissionListParams, SubmissionListQuery};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::assignments::load_assignment;
use crate::services::courses::{can_manage_course, load_course};
use crate::services::{current_user, storage_failure};
use crate::storage::Storage;

/// 某份作业的全部提交，仅课程管理者可见
pub async fn list_for_assignment(
    service: &SubmissionService,
    assignment_id: i64,
    query: SubmissionListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let assignment = match load_assignment(&storage, assignment_id).await {
        Ok(assignment) => assignment,
        Err(resp) => return Ok(resp),
    };
    let course = match load_course(&storage, assignment.course_id).await {
        Ok(course) => course,
        Err(resp) => return Ok(resp),
    };
    if !can_manage_course(&user, &course) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::CoursePermissionDenied,
            "You do not have permission to view these submissions",
        )));
    }

    let list_query = SubmissionListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        assignment_id: Some(assignment.id),
        student_id: None,
        status: query.status,
    };
    run_list(&storage, list_query).await
}

pub async fn list_mine(
    service: &SubmissionService,
    query: SubmissionListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let list_query = SubmissionListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        assignment_id: query.assignment_id,
        student_id: Some(user.id),
        status: query.status,
    };
    run_list(&storage, list_query).await
}

async fn run_list(
    storage: &Arc<dyn Storage>,
    query: SubmissionListQuery,
) -> ActixResult<HttpResponse> {
    match storage.list_submissions_with_pagination(query).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Submissions retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to retrieve submissions",
            e,
        )),
    }
}
