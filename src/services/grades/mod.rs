pub mod gpa;
pub mod grade;
pub mod list;
pub mod transcript;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::grades::requests::{GradeListParams, GradeSubmissionRequest};
use crate::storage::Storage;

pub struct GradeService;

impl GradeService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(request)
    }

    pub async fn grade_submission(
        &self,
        submission_id: i64,
        grade: GradeSubmissionRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        grade::grade_submission(self, submission_id, grade, request).await
    }

    pub async fn list_grades(
        &self,
        query: GradeListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_grades(self, query, request).await
    }

    pub async fn transcript(
        &self,
        student_id: Option<i64>,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        transcript::get_transcript(self, student_id, request).await
    }
}
