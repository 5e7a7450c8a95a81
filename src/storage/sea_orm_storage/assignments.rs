use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments};
use crate::entity::courses::Entity as Courses;
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{LmsError, Result};
use crate::models::assignments::{
    entities::{Assignment, UpcomingAssignment},
    requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
    responses::AssignmentListResponse,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

impl SeaOrmStorage {
    pub async fn create_assignment_impl(
        &self,
        created_by: i64,
        req: CreateAssignmentRequest,
    ) -> Result<Assignment> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            course_id: Set(req.course_id),
            title: Set(req.title),
            description: Set(req.description),
            due_date: Set(req.due_date.map(|d| d.timestamp())),
            total_points: Set(req.total_points),
            attachment_token: Set(req.attachment_token),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            LmsError::database_operation(format!("Failed to create assignment: {e}"))
        })?;

        Ok(result.into_assignment())
    }

    pub async fn get_assignment_by_id_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to query assignment: {e}"))
            })?;

        Ok(result.map(|m| m.into_assignment()))
    }

    pub async fn list_assignments_with_pagination_impl(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        let mut select = Assignments::find();

        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let Some(course_ids) = query.course_ids {
            select = select.filter(Column::CourseId.is_in(course_ids));
        }

        let (items, pagination) = self
            .paginate_select(
                select
                    .order_by_asc(Column::DueDate)
                    .order_by_desc(Column::CreatedAt),
                query.page,
                query.size,
                "assignments",
            )
            .await?;

        Ok(AssignmentListResponse {
            items: items.into_iter().map(|m| m.into_assignment()).collect(),
            pagination,
        })
    }

    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        if self.get_assignment_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(due_date) = update.due_date {
            model.due_date = Set(Some(due_date.timestamp()));
        }
        if let Some(total_points) = update.total_points {
            model.total_points = Set(total_points);
        }
        if let Some(token) = update.attachment_token {
            model.attachment_token = Set(Some(token));
        }

        model.update(&self.db).await.map_err(|e| {
            LmsError::database_operation(format!("Failed to update assignment: {e}"))
        })?;

        self.get_assignment_by_id_impl(id).await
    }

    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let result = Assignments::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to delete assignment: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 学生已选课程中尚未提交且截止时间在 `now` 之后的作业，按截止时间升序
    pub async fn list_upcoming_assignments_impl(
        &self,
        student_id: i64,
        now: i64,
    ) -> Result<Vec<UpcomingAssignment>> {
        let course_ids = self.list_student_course_ids_impl(student_id).await?;
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let submitted: Vec<i64> = Submissions::find()
            .select_only()
            .column(SubmissionColumn::AssignmentId)
            .filter(SubmissionColumn::StudentId.eq(student_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to query submissions: {e}"))
            })?;

        let rows = Assignments::find()
            .filter(Column::CourseId.is_in(course_ids))
            .filter(Column::DueDate.gt(now))
            .filter(Column::Id.is_not_in(submitted))
            .find_also_related(Courses)
            .order_by_asc(Column::DueDate)
            .all(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to query assignments: {e}"))
            })?;

        Ok(rows
            .into_iter()
            .filter_map(|(assignment, course)| {
                let course = course?;
                Some(UpcomingAssignment {
                    assignment: assignment.into_assignment(),
                    course_code: course.code,
                    course_title: course.title,
                })
            })
            .collect())
    }
}
