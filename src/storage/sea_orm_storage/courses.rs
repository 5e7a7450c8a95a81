//! 课程与选课

use super::SeaOrmStorage;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::enrollments::{
    ActiveModel as EnrollmentActiveModel, Column as EnrollmentColumn, Entity as Enrollments,
};
use crate::entity::users::Entity as Users;
use crate::errors::{LmsError, Result};
use crate::models::courses::{
    entities::{Course, EnrolledStudent, Enrollment, EnrollmentStatus},
    requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
    responses::CourseListResponse,
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// `lecturer_id` 由服务层确定
    pub async fn create_course_impl(
        &self,
        lecturer_id: i64,
        req: CreateCourseRequest,
    ) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            code: Set(req.code),
            title: Set(req.title),
            description: Set(req.description),
            credits: Set(req.credits),
            lecturer_id: Set(lecturer_id),
            department: Set(req.department),
            semester: Set(req.semester),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to create course: {e}")))?;

        Ok(result.into_course())
    }

    pub async fn get_course_by_id_impl(&self, course_id: i64) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query course: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn get_course_by_code_impl(&self, code: &str) -> Result<Option<Course>> {
        let result = Courses::find()
            .filter(Column::Code.eq(code))
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query course: {e}")))?;

        Ok(result.map(|m| m.into_course()))
    }

    pub async fn list_courses_with_pagination_impl(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse> {
        let mut select = Courses::find();

        if let Some(lecturer_id) = query.lecturer_id {
            select = select.filter(Column::LecturerId.eq(lecturer_id));
        }

        if let Some(ref department) = query.department
            && !department.trim().is_empty()
        {
            select = select.filter(Column::Department.eq(department.trim()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let term = search.trim();
            select = select.filter(
                Condition::any()
                    .add(like_contains(Column::Code, term))
                    .add(like_contains(Column::Title, term)),
            );
        }

        if let Some(student_id) = query.enrolled_student_id {
            let course_ids = self.list_student_course_ids_impl(student_id).await?;
            select = select.filter(Column::Id.is_in(course_ids));
        }

        let (courses, pagination) = self
            .paginate_select(
                select.order_by_asc(Column::Code),
                query.page,
                query.size,
                "courses",
            )
            .await?;

        Ok(CourseListResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination,
        })
    }

    pub async fn update_course_impl(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        if self.get_course_by_id_impl(course_id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(course_id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }
        if let Some(credits) = update.credits {
            model.credits = Set(credits);
        }
        if let Some(lecturer_id) = update.lecturer_id {
            model.lecturer_id = Set(lecturer_id);
        }
        if let Some(department) = update.department {
            model.department = Set(Some(department));
        }
        if let Some(semester) = update.semester {
            model.semester = Set(Some(semester));
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to update course: {e}")))?;

        self.get_course_by_id_impl(course_id).await
    }

    pub async fn delete_course_impl(&self, course_id: i64) -> Result<bool> {
        let result = Courses::delete_by_id(course_id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to delete course: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_courses_impl(&self, lecturer_id: Option<i64>) -> Result<u64> {
        let mut select = Courses::find();
        if let Some(lecturer_id) = lecturer_id {
            select = select.filter(Column::LecturerId.eq(lecturer_id));
        }

        select
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to count courses: {e}")))
    }

    pub async fn list_lecturer_course_ids_impl(&self, lecturer_id: i64) -> Result<Vec<i64>> {
        Courses::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::LecturerId.eq(lecturer_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to list courses: {e}")))
    }

    // ---------------- 选课 ----------------

    pub async fn get_enrollment_impl(
        &self,
        course_id: i64,
        student_id: i64,
    ) -> Result<Option<Enrollment>> {
        let result = Enrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to query enrollment: {e}"))
            })?;

        Ok(result.map(|m| m.into_enrollment()))
    }

    /// 新建选课，或把已退选的记录重新激活
    pub async fn enroll_student_impl(&self, course_id: i64, student_id: i64) -> Result<Enrollment> {
        let now = chrono::Utc::now().timestamp();

        let existing = Enrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to query enrollment: {e}"))
            })?;

        let result = match existing {
            Some(model) => {
                let mut active: EnrollmentActiveModel = model.into();
                active.status = Set(EnrollmentStatus::Active.to_string());
                active.enrolled_at = Set(now);
                active.updated_at = Set(now);
                active.update(&self.db).await
            }
            None => {
                EnrollmentActiveModel {
                    course_id: Set(course_id),
                    student_id: Set(student_id),
                    status: Set(EnrollmentStatus::Active.to_string()),
                    enrolled_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                }
                .insert(&self.db)
                .await
            }
        }
        .map_err(|e| LmsError::database_operation(format!("Failed to save enrollment: {e}")))?;

        Ok(result.into_enrollment())
    }

    pub async fn update_enrollment_status_impl(
        &self,
        course_id: i64,
        student_id: i64,
        status: EnrollmentStatus,
    ) -> Result<bool> {
        let result = Enrollments::update_many()
            .col_expr(
                EnrollmentColumn::Status,
                sea_orm::sea_query::Expr::value(status.to_string()),
            )
            .col_expr(
                EnrollmentColumn::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to update enrollment: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// 课程学生名单（含已退选），按选课时间排序
    pub async fn list_course_students_impl(&self, course_id: i64) -> Result<Vec<EnrolledStudent>> {
        let rows = Enrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .find_also_related(Users)
            .order_by_asc(EnrollmentColumn::EnrolledAt)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to list students: {e}")))?;

        Ok(rows
            .into_iter()
            .filter_map(|(enrollment, user)| {
                let user = user?.into_user();
                let enrollment = enrollment.into_enrollment();
                Some(EnrolledStudent {
                    student_id: user.id,
                    username: user.username,
                    email: user.email,
                    profile_name: user.profile.profile_name,
                    status: enrollment.status,
                    enrolled_at: enrollment.enrolled_at,
                })
            })
            .collect())
    }

    pub async fn list_active_student_ids_impl(&self, course_id: i64) -> Result<Vec<i64>> {
        Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::StudentId)
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.to_string()))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to list students: {e}")))
    }

    /// 学生处于 active 状态的课程
    pub async fn list_student_course_ids_impl(&self, student_id: i64) -> Result<Vec<i64>> {
        Enrollments::find()
            .select_only()
            .column(EnrollmentColumn::CourseId)
            .filter(EnrollmentColumn::StudentId.eq(student_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.to_string()))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to list courses: {e}")))
    }

    pub async fn count_active_enrollments_impl(&self, course_id: i64) -> Result<u64> {
        Enrollments::find()
            .filter(EnrollmentColumn::CourseId.eq(course_id))
            .filter(EnrollmentColumn::Status.eq(EnrollmentStatus::Active.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to count enrollments: {e}"))
            })
    }
}
