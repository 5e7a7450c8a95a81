//! 成绩存储与按课程汇总

use std::collections::{BTreeMap, HashMap};

use super::SeaOrmStorage;
use crate::entity::assignments::{Column as AssignmentColumn, Entity as Assignments};
use crate::entity::courses::{Column as CourseColumn, Entity as Courses};
use crate::entity::grades::{ActiveModel, Column, Entity as Grades};
use crate::entity::submissions::{Column as SubmissionColumn, Entity as Submissions};
use crate::errors::{LmsError, Result};
use crate::models::grades::{
    entities::{CourseScoreTotals, Grade},
    requests::{GradeListQuery, NewGrade},
    responses::GradeListResponse,
};
use crate::models::submissions::entities::SubmissionStatus;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

impl SeaOrmStorage {
    /// 同一提交只有一条成绩，重复评分时更新分数与评语；
    /// 成绩写入与提交状态改为 graded 在同一事务内完成
    pub async fn upsert_grade_impl(&self, new: NewGrade) -> Result<Grade> {
        let now = chrono::Utc::now().timestamp();

        let txn = self.db.begin().await.map_err(|e| {
            LmsError::database_operation(format!("Failed to begin transaction: {e}"))
        })?;

        let existing = Grades::find()
            .filter(Column::SubmissionId.eq(new.submission_id))
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query grade: {e}")))?;

        let saved = match existing {
            Some(model) => {
                let mut active: ActiveModel = model.into();
                active.score = Set(new.score);
                active.feedback = Set(new.feedback);
                active.graded_by = Set(new.graded_by);
                active.updated_at = Set(now);
                active.update(&txn).await
            }
            None => {
                ActiveModel {
                    submission_id: Set(new.submission_id),
                    assignment_id: Set(new.assignment_id),
                    course_id: Set(new.course_id),
                    student_id: Set(new.student_id),
                    score: Set(new.score),
                    feedback: Set(new.feedback),
                    graded_by: Set(new.graded_by),
                    graded_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&txn)
                .await
            }
        }
        .map_err(|e| LmsError::database_operation(format!("Failed to save grade: {e}")))?;

        let marked = Submissions::update_many()
            .col_expr(
                SubmissionColumn::Status,
                Expr::value(SubmissionStatus::Graded.to_string()),
            )
            .col_expr(SubmissionColumn::UpdatedAt, Expr::value(now))
            .filter(SubmissionColumn::Id.eq(new.submission_id))
            .exec(&txn)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to mark submission graded: {e}"))
            })?;
        if marked.rows_affected == 0 {
            // 事务随 txn 丢弃回滚
            return Err(LmsError::not_found(format!(
                "Submission {} not found",
                new.submission_id
            )));
        }

        txn.commit().await.map_err(|e| {
            LmsError::database_operation(format!("Failed to commit grade: {e}"))
        })?;

        Ok(saved.into_grade())
    }

    /// 某作业已有成绩中的最高分；没有成绩时为 None
    pub async fn max_grade_score_impl(&self, assignment_id: i64) -> Result<Option<f64>> {
        let scores: Vec<f64> = Grades::find()
            .select_only()
            .column(Column::Score)
            .filter(Column::AssignmentId.eq(assignment_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query grades: {e}")))?;

        Ok(scores.into_iter().reduce(f64::max))
    }

    pub async fn get_grade_by_submission_impl(&self, submission_id: i64) -> Result<Option<Grade>> {
        let result = Grades::find()
            .filter(Column::SubmissionId.eq(submission_id))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query grade: {e}")))?;

        Ok(result.map(|m| m.into_grade()))
    }

    pub async fn list_grades_with_pagination_impl(
        &self,
        query: GradeListQuery,
    ) -> Result<GradeListResponse> {
        let mut select = Grades::find();

        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }
        if let Some(assignment_id) = query.assignment_id {
            select = select.filter(Column::AssignmentId.eq(assignment_id));
        }
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }
        if let Some(lecturer_id) = query.lecturer_id {
            let course_ids = self.list_lecturer_course_ids_impl(lecturer_id).await?;
            select = select.filter(Column::CourseId.is_in(course_ids));
        }

        let (items, pagination) = self
            .paginate_select(
                select.order_by_desc(Column::GradedAt),
                query.page,
                query.size,
                "grades",
            )
            .await?;

        Ok(GradeListResponse {
            items: items.into_iter().map(|m| m.into_grade()).collect(),
            pagination,
        })
    }

    /// 按课程汇总学生已评分作业的得分与满分，没有成绩的课程不出现
    pub async fn list_course_scores_for_student_impl(
        &self,
        student_id: i64,
    ) -> Result<Vec<CourseScoreTotals>> {
        let grades = Grades::find()
            .filter(Column::StudentId.eq(student_id))
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query grades: {e}")))?;

        if grades.is_empty() {
            return Ok(Vec::new());
        }

        let assignment_ids: Vec<i64> = grades.iter().map(|g| g.assignment_id).collect();
        let total_points: HashMap<i64, f64> = Assignments::find()
            .filter(AssignmentColumn::Id.is_in(assignment_ids))
            .all(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to query assignments: {e}"))
            })?
            .into_iter()
            .map(|a| (a.id, a.total_points))
            .collect();

        // course_id -> (score_sum, points_sum)
        let mut sums: BTreeMap<i64, (f64, f64)> = BTreeMap::new();
        for grade in &grades {
            let Some(points) = total_points.get(&grade.assignment_id) else {
                continue;
            };
            let entry = sums.entry(grade.course_id).or_default();
            entry.0 += grade.score;
            entry.1 += points;
        }

        let courses = Courses::find()
            .filter(CourseColumn::Id.is_in(sums.keys().copied().collect::<Vec<_>>()))
            .order_by_asc(CourseColumn::Code)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query courses: {e}")))?;

        Ok(courses
            .into_iter()
            .filter_map(|course| {
                let (score_sum, points_sum) = sums.get(&course.id).copied()?;
                Some(CourseScoreTotals {
                    course_id: course.id,
                    code: course.code,
                    title: course.title,
                    credits: course.credits,
                    score_sum,
                    points_sum,
                })
            })
            .collect())
    }
}
