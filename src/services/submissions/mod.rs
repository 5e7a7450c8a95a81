pub mod get;
pub mod list;
pub mod submit;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::submissions::requests::{SubmissionListParams, SubmitAssignmentRequest};
use crate::storage::Storage;

pub struct SubmissionService;

impl SubmissionService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(request)
    }

    pub async fn submit(
        &self,
        assignment_id: i64,
        submission: SubmitAssignmentRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        submit::submit(self, assignment_id, submission, request).await
    }

    pub async fn list_for_assignment(
        &self,
        assignment_id: i64,
        query: SubmissionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_for_assignment(self, assignment_id, query, request).await
    }

    pub async fn list_mine(
        &self,
        query: SubmissionListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_mine(self, query, request).await
    }

    pub async fn get_submission(
        &self,
        submission_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_submission(self, submission_id, request).await
    }
}
