use std::sync::Arc;

use crate::errors::Result;
use crate::models::{
    announcements::{
        entities::Announcement,
        requests::{AnnouncementListQuery, CreateAnnouncementRequest, UpdateAnnouncementRequest},
        responses::AnnouncementListResponse,
    },
    assignments::{
        entities::{Assignment, UpcomingAssignment},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    courses::{
        entities::{Course, EnrolledStudent, Enrollment, EnrollmentStatus},
        requests::{CourseListQuery, CreateCourseRequest, UpdateCourseRequest},
        responses::CourseListResponse,
    },
    fees::{
        entities::{Fee, Payment},
        requests::{CreateFeeRequest, FeeListQuery, NewPayment, PaymentListQuery},
        responses::{FeeListResponse, PaymentListResponse},
    },
    files::entities::FileRecord,
    grades::{
        entities::{CourseScoreTotals, Grade},
        requests::{GradeListQuery, NewGrade},
        responses::GradeListResponse,
    },
    notifications::{
        entities::{Notification, NotificationTemplate},
        requests::NotificationListQuery,
        responses::NotificationListResponse,
    },
    submissions::{
        entities::Submission,
        requests::{NewSubmission, SubmissionListQuery},
        responses::SubmissionListResponse,
    },
    system::{
        entities::SystemSetting, requests::SettingAuditQuery, responses::SettingAuditListResponse,
    },
    users::{
        entities::{User, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

pub mod sea_orm_storage;

pub use sea_orm_storage::SeaOrmStorage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    async fn delete_user(&self, id: i64) -> Result<bool>;
    async fn count_users(&self) -> Result<u64>;
    async fn count_users_by_role(&self, role: UserRole) -> Result<u64>;
    async fn list_active_user_ids(&self, role: Option<UserRole>) -> Result<Vec<i64>>;

    /// 课程
    async fn create_course(&self, lecturer_id: i64, course: CreateCourseRequest)
    -> Result<Course>;
    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>>;
    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>>;
    async fn list_courses_with_pagination(
        &self,
        query: CourseListQuery,
    ) -> Result<CourseListResponse>;
    async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    async fn delete_course(&self, course_id: i64) -> Result<bool>;
    async fn count_courses(&self, lecturer_id: Option<i64>) -> Result<u64>;
    async fn list_lecturer_course_ids(&self, lecturer_id: i64) -> Result<Vec<i64>>;

    /// 选课
    async fn get_enrollment(&self, course_id: i64, student_id: i64) -> Result<Option<Enrollment>>;
    async fn enroll_student(&self, course_id: i64, student_id: i64) -> Result<Enrollment>;
    async fn update_enrollment_status(
        &self,
        course_id: i64,
        student_id: i64,
        status: EnrollmentStatus,
    ) -> Result<bool>;
    async fn list_course_students(&self, course_id: i64) -> Result<Vec<EnrolledStudent>>;
    async fn list_active_student_ids(&self, course_id: i64) -> Result<Vec<i64>>;
    async fn list_student_course_ids(&self, student_id: i64) -> Result<Vec<i64>>;
    async fn count_active_enrollments(&self, course_id: i64) -> Result<u64>;

    /// 作业
    async fn create_assignment(
        &self,
        created_by: i64,
        assignment: CreateAssignmentRequest,
    ) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, id: i64) -> Result<bool>;
    async fn list_upcoming_assignments(
        &self,
        student_id: i64,
        now: i64,
    ) -> Result<Vec<UpcomingAssignment>>;

    /// 提交
    async fn upsert_submission(&self, submission: NewSubmission) -> Result<Submission>;
    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>>;
    async fn get_submission_for_student(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>>;
    async fn list_submissions_with_pagination(
        &self,
        query: SubmissionListQuery,
    ) -> Result<SubmissionListResponse>;
    async fn count_ungraded_for_lecturer(&self, lecturer_id: i64) -> Result<u64>;

    /// 成绩
    /// 写入成绩并把提交标记为 graded（同一事务）
    async fn upsert_grade(&self, grade: NewGrade) -> Result<Grade>;
    async fn max_grade_score(&self, assignment_id: i64) -> Result<Option<f64>>;
    async fn get_grade_by_submission(&self, submission_id: i64) -> Result<Option<Grade>>;
    async fn list_grades_with_pagination(&self, query: GradeListQuery)
    -> Result<GradeListResponse>;
    async fn list_course_scores_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<CourseScoreTotals>>;

    /// 学费与缴费
    async fn create_fee(&self, created_by: i64, fee: CreateFeeRequest) -> Result<Fee>;
    async fn get_fee_by_id(&self, id: i64) -> Result<Option<Fee>>;
    async fn list_fees_with_pagination(&self, query: FeeListQuery) -> Result<FeeListResponse>;
    async fn delete_fee(&self, id: i64) -> Result<bool>;
    /// 返回 (应缴总额, 已缴总额)
    async fn get_student_fee_totals(&self, student_id: i64) -> Result<(f64, f64)>;
    async fn sum_completed_payments_for_fee(&self, fee_id: i64) -> Result<f64>;
    async fn count_completed_payments_for_fee(&self, fee_id: i64) -> Result<u64>;
    async fn total_outstanding_fees(&self) -> Result<f64>;
    async fn create_payment(&self, payment: NewPayment) -> Result<Payment>;
    async fn list_payments_with_pagination(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaymentListResponse>;

    /// 通知
    async fn create_notifications(
        &self,
        user_ids: &[i64],
        template: &NotificationTemplate,
    ) -> Result<u64>;
    async fn get_notification_by_id(&self, notification_id: i64) -> Result<Option<Notification>>;
    async fn list_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse>;
    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64>;
    async fn mark_notification_read(&self, notification_id: i64) -> Result<bool>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64>;
    async fn delete_notification(&self, notification_id: i64) -> Result<bool>;

    /// 公告
    async fn create_announcement(
        &self,
        author_id: i64,
        announcement: CreateAnnouncementRequest,
    ) -> Result<Announcement>;
    async fn get_announcement_by_id(&self, id: i64) -> Result<Option<Announcement>>;
    async fn list_announcements_with_pagination(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse>;
    async fn update_announcement(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>>;
    async fn delete_announcement(&self, id: i64) -> Result<bool>;

    /// 文件
    async fn create_file_record(&self, record: FileRecord) -> Result<FileRecord>;
    async fn get_file_by_token(&self, token: &str) -> Result<Option<FileRecord>>;

    /// 系统设置
    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>>;
    async fn update_setting(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<SystemSetting>;
    async fn list_setting_audits(&self, query: SettingAuditQuery)
    -> Result<SettingAuditListResponse>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
