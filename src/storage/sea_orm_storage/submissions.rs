use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::submissions::{ActiveModel, Column, Entity as Submissions};
use crate::errors::{LmsError, Result};
use crate::models::submissions::{
    entities::{Submission, SubmissionStatus},
    requests::{NewSubmission, SubmissionListQuery},
    responses::SubmissionListResponse,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// 每个学生每个作业只保留一条提交，重复提交时覆盖内容
    pub async fn upsert_submission_impl(&self, new: NewSubmission) -> Result<Submission> {
        let now = chrono::Utc::now().timestamp();

        let existing = Submissions::find()
            .filter(Column::AssignmentId.eq(new.assignment_id))
            .filter(Column::StudentId.eq(new.student_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to query submission: {e}"))
            })?;

        let result = match existing {
            Some(model) => {
                let mut active: ActiveModel = model.into();
                active.content = Set(new.content);
                active.file_token = Set(new.file_token);
                active.status = Set(new.status.to_string());
                active.submitted_at = Set(now);
                active.updated_at = Set(now);
                active.update(&self.db).await
            }
            None => {
                ActiveModel {
                    assignment_id: Set(new.assignment_id),
                    student_id: Set(new.student_id),
                    content: Set(new.content),
                    file_token: Set(new.file_token),
                    status: Set(new.status.to_string()),
                    submitted_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(|e| LmsError::database_operation(format!("Failed to save submission: {e}")))?;

        Ok(result.into_submission())
    }

    pub async fn get_submission_by_id_impl(&self, id: i64) -> Result<Option<Submission>> {
        let result = Submissions::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to query submission: {e}"))
            })?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn get_submission_for_student_impl(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        let result = Submissions::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .filter(Column::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to query submission: {e}"))
            })?;

        Ok(result.map(|m| m.into_submission()))
    }

    pub async fn list_submissions_with_pagination_impl(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse> {
        let mut select = Submissions::find();

        if let Some(assignment_id) = query.assignment_id {
            select = select.filter(Column::AssignmentId.eq(assignment_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let (items, pagination) = self
            .paginate_select(
                select.order_by_desc(Column::SubmittedAt),
                query.page,
                query.size,
                "submissions",
            )
            .await?;

        Ok(SubmissionListResponse {
            items: items.into_iter().map(|m| m.into_submission()).collect(),
            pagination,
        })
    }

    /// 讲师所授课程中尚未评分的提交数
    pub async fn count_ungraded_for_lecturer_impl(&self, lecturer_id: i64) -> Result<u64> {
        let course_ids = self.list_lecturer_course_ids_impl(lecturer_id).await?;
        if course_ids.is_empty() {
            return Ok(0);
        }

        let assignment_ids: Vec<i64> = Assignments::find()
            .select_only()
            .column(AssignmentColumn::Id)
            .filter(AssignmentColumn::CourseId.is_in(course_ids))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to query assignments: {e}"))
            })?;

        Submissions::find()
            .filter(Column::AssignmentId.is_in(assignment_ids))
            .filter(Column::Status.ne(SubmissionStatus::Graded.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to count submissions: {e}"))
            })
    }
}
