pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::assignments::{
    entities::Assignment,
    requests::{AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest},
};
use crate::services::{bad_request, not_found, storage_failure};
use crate::storage::Storage;

pub struct AssignmentService;

impl AssignmentService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(request)
    }

    pub async fn create_assignment(
        &self,
        assignment: CreateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_assignment(self, assignment, request).await
    }

    pub async fn list_assignments(
        &self,
        query: AssignmentListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_assignments(self, query, request).await
    }

    pub async fn list_upcoming(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        list::list_upcoming(self, request).await
    }

    pub async fn get_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_assignment(self, assignment_id, request).await
    }

    pub async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_assignment(self, assignment_id, update, request).await
    }

    pub async fn delete_assignment(
        &self,
        assignment_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_assignment(self, assignment_id, request).await
    }
}

pub(crate) async fn load_assignment(
    storage: &Arc<dyn Storage>,
    assignment_id: i64,
) -> Result<Assignment, HttpResponse> {
    match storage.get_assignment_by_id(assignment_id).await {
        Ok(Some(assignment)) => Ok(assignment),
        Ok(None) => Err(not_found(ErrorCode::AssignmentNotFound, "Assignment not found")),
        Err(e) => Err(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to load assignment",
            e,
        )),
    }
}

pub(crate) fn validate_total_points(points: f64) -> Result<(), &'static str> {
    if points.is_finite() && points > 0.0 && points <= 1000.0 {
        Ok(())
    } else {
        Err("Total points must be greater than 0 and at most 1000")
    }
}

/// 附件必须是已上传的文件
pub(crate) async fn check_attachment(
    storage: &Arc<dyn Storage>,
    token: &str,
) -> Result<(), HttpResponse> {
    match storage.get_file_by_token(token).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(bad_request(
            ErrorCode::AssignmentInvalid,
            "Attachment file not found",
        )),
        Err(e) => Err(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to check attachment",
            e,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_total_points() {
        assert!(validate_total_points(100.0).is_ok());
        assert!(validate_total_points(0.5).is_ok());
        assert!(validate_total_points(0.0).is_err());
        assert!(validate_total_points(-10.0).is_err());
        assert!(validate_total_points(f64::NAN).is_err());
        assert!(validate_total_points(1000.5).is_err());
    }
}
