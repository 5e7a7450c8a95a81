//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod announcements;
mod assignments;
mod courses;
mod fees;
mod files;
mod grades;
mod notifications;
mod submissions;
mod system_settings;
mod users;

use crate::config::AppConfig;
use crate::models::{PaginationInfo, PaginationQuery};
use crate::storage::Storage;
use async_trait::async_trait;
use crate::errors::{LmsError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, EntityTrait, PaginatorTrait, Select};
use std::time::Duration;
use tracing::info;

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

#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按配置中的数据库 URL 连接并执行迁移
    pub async fn new_async() -> Result<Self> {
        Self::connect(&AppConfig::get().database.url).await
    }

    /// 连接指定 URL 并执行迁移，连接池参数仍取自配置
    pub async fn connect(url: &str) -> Result<Self> {
        let config = AppConfig::get();
        let db_url = Self::build_database_url(url)?;

        let db = if db_url.starts_with("sqlite://") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| LmsError::database_operation(format!("Migration failed: {e}")))?;

        info!("SeaORM storage ready: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma）
    async fn connect_sqlite(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| LmsError::database_config(format!("Invalid SQLite URL: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-32000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.database.pool_size)
            .min_connections(1)
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(300))
            .connect_with(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("SQLite connection failed: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// PostgreSQL / MySQL
    async fn connect_generic(url: &str, config: &AppConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.database.pool_size)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(config.database.timeout))
            .acquire_timeout(Duration::from_secs(config.database.timeout))
            .idle_timeout(Duration::from_secs(600))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| LmsError::database_connection(format!("Database connection failed: {e}")))
    }

    /// 接受带 scheme 的 URL，或 .db/.sqlite 文件路径
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if ["postgres://", "postgresql://", "mysql://", "mariadb://"]
            .iter()
            .any(|scheme| url.starts_with(scheme))
        {
            Ok(url.to_string())
        } else {
            Err(LmsError::database_config(format!(
                "Cannot infer database backend from URL: {url}. Use sqlite://, postgres://, mysql:// or a .db/.sqlite path"
            )))
        }
    }

    /// 页码从 1 开始，每页 1 到 100 条，默认 10 条
    pub(crate) async fn paginate_select<E>(
        &self,
        select: Select<E>,
        page: Option<i64>,
        size: Option<i64>,
        what: &str,
    ) -> Result<(Vec<E::Model>, PaginationInfo)>
    where
        E: EntityTrait,
        E::Model: Send + Sync,
    {
        let (page, size) = PaginationQuery::normalized(page, size);

        let paginator = select.paginate(&self.db, size);
        let total = paginator
            .num_items()
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to count {what}: {e}")))?;
        let items = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to list {what}: {e}")))?;

        Ok((items, PaginationInfo::new(page, size, total)))
    }
}

#[async_trait]
impl Storage for SeaOrmStorage {
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>> {
        self.update_user_impl(id, update).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    async fn count_users_by_role(&self, role: UserRole) -> Result<u64> {
        self.count_users_by_role_impl(role).await
    }

    async fn list_active_user_ids(&self, role: Option<UserRole>) -> Result<Vec<i64>> {
        self.list_active_user_ids_impl(role).await
    }

    async fn create_course(&self, lecturer_id: i64, course: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(lecturer_id, course).await
    }

    async fn get_course_by_id(&self, course_id: i64) -> Result<Option<Course>> {
        self.get_course_by_id_impl(course_id).await
    }

    async fn get_course_by_code(&self, code: &str) -> Result<Option<Course>> {
        self.get_course_by_code_impl(code).await
    }

    async fn list_courses_with_pagination(&self, query: CourseListQuery) -> Result<CourseListResponse> {
        self.list_courses_with_pagination_impl(query).await
    }

    async fn update_course(&self, course_id: i64, update: UpdateCourseRequest) -> Result<Option<Course>> {
        self.update_course_impl(course_id, update).await
    }

    async fn delete_course(&self, course_id: i64) -> Result<bool> {
        self.delete_course_impl(course_id).await
    }

    async fn count_courses(&self, lecturer_id: Option<i64>) -> Result<u64> {
        self.count_courses_impl(lecturer_id).await
    }

    async fn list_lecturer_course_ids(&self, lecturer_id: i64) -> Result<Vec<i64>> {
        self.list_lecturer_course_ids_impl(lecturer_id).await
    }

    async fn get_enrollment(&self, course_id: i64, student_id: i64) -> Result<Option<Enrollment>> {
        self.get_enrollment_impl(course_id, student_id).await
    }

    async fn enroll_student(&self, course_id: i64, student_id: i64) -> Result<Enrollment> {
        self.enroll_student_impl(course_id, student_id).await
    }

    async fn update_enrollment_status(&self, course_id: i64, student_id: i64, status: EnrollmentStatus) -> Result<bool> {
        self.update_enrollment_status_impl(course_id, student_id, status).await
    }

    async fn list_course_students(&self, course_id: i64) -> Result<Vec<EnrolledStudent>> {
        self.list_course_students_impl(course_id).await
    }

    async fn list_active_student_ids(&self, course_id: i64) -> Result<Vec<i64>> {
        self.list_active_student_ids_impl(course_id).await
    }

    async fn list_student_course_ids(&self, student_id: i64) -> Result<Vec<i64>> {
        self.list_student_course_ids_impl(student_id).await
    }

    async fn count_active_enrollments(&self, course_id: i64) -> Result<u64> {
        self.count_active_enrollments_impl(course_id).await
    }

    async fn create_assignment(&self, created_by: i64, assignment: CreateAssignmentRequest) -> Result<Assignment> {
        self.create_assignment_impl(created_by, assignment).await
    }

    async fn get_assignment_by_id(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(id).await
    }

    async fn list_assignments_with_pagination(&self, query: AssignmentListQuery) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn update_assignment(&self, id: i64, update: UpdateAssignmentRequest) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    async fn list_upcoming_assignments(&self, student_id: i64, now: i64) -> Result<Vec<UpcomingAssignment>> {
        self.list_upcoming_assignments_impl(student_id, now).await
    }

    async fn upsert_submission(&self, submission: NewSubmission) -> Result<Submission> {
        self.upsert_submission_impl(submission).await
    }

    async fn get_submission_by_id(&self, id: i64) -> Result<Option<Submission>> {
        self.get_submission_by_id_impl(id).await
    }

    async fn get_submission_for_student(&self, assignment_id: i64, student_id: i64) -> Result<Option<Submission>> {
        self.get_submission_for_student_impl(assignment_id, student_id).await
    }

    async fn list_submissions_with_pagination(&self, query: SubmissionListQuery) -> Result<SubmissionListResponse> {
        self.list_submissions_with_pagination_impl(query).await
    }

    async fn count_ungraded_for_lecturer(&self, lecturer_id: i64) -> Result<u64> {
        self.count_ungraded_for_lecturer_impl(lecturer_id).await
    }

    async fn upsert_grade(&self, grade: NewGrade) -> Result<Grade> {
        self.upsert_grade_impl(grade).await
    }

    async fn max_grade_score(&self, assignment_id: i64) -> Result<Option<f64>> {
        self.max_grade_score_impl(assignment_id).await
    }

    async fn get_grade_by_submission(&self, submission_id: i64) -> Result<Option<Grade>> {
        self.get_grade_by_submission_impl(submission_id).await
    }

    async fn list_grades_with_pagination(&self, query: GradeListQuery) -> Result<GradeListResponse> {
        self.list_grades_with_pagination_impl(query).await
    }

    async fn list_course_scores_for_student(&self, student_id: i64) -> Result<Vec<CourseScoreTotals>> {
        self.list_course_scores_for_student_impl(student_id).await
    }

    async fn create_fee(&self, created_by: i64, fee: CreateFeeRequest) -> Result<Fee> {
        self.create_fee_impl(created_by, fee).await
    }

    async fn get_fee_by_id(&self, id: i64) -> Result<Option<Fee>> {
        self.get_fee_by_id_impl(id).await
    }

    async fn list_fees_with_pagination(&self, query: FeeListQuery) -> Result<FeeListResponse> {
        self.list_fees_with_pagination_impl(query).await
    }

    async fn delete_fee(&self, id: i64) -> Result<bool> {
        self.delete_fee_impl(id).await
    }

    async fn get_student_fee_totals(&self, student_id: i64) -> Result<(f64, f64)> {
        self.get_student_fee_totals_impl(student_id).await
    }

    async fn sum_completed_payments_for_fee(&self, fee_id: i64) -> Result<f64> {
        self.sum_completed_payments_for_fee_impl(fee_id).await
    }

    async fn count_completed_payments_for_fee(&self, fee_id: i64) -> Result<u64> {
        self.count_completed_payments_for_fee_impl(fee_id).await
    }

    async fn total_outstanding_fees(&self) -> Result<f64> {
        self.total_outstanding_fees_impl().await
    }

    async fn create_payment(&self, payment: NewPayment) -> Result<Payment> {
        self.create_payment_impl(payment).await
    }

    async fn list_payments_with_pagination(&self, query: PaymentListQuery) -> Result<PaymentListResponse> {
        self.list_payments_with_pagination_impl(query).await
    }

    async fn create_notifications(&self, user_ids: &[i64], template: &NotificationTemplate) -> Result<u64> {
        self.create_notifications_impl(user_ids, template).await
    }

    async fn get_notification_by_id(&self, notification_id: i64) -> Result<Option<Notification>> {
        self.get_notification_by_id_impl(notification_id).await
    }

    async fn list_notifications_with_pagination(&self, user_id: i64, query: NotificationListQuery) -> Result<NotificationListResponse> {
        self.list_notifications_with_pagination_impl(user_id, query).await
    }

    async fn count_unread_notifications(&self, user_id: i64) -> Result<u64> {
        self.count_unread_notifications_impl(user_id).await
    }

    async fn mark_notification_read(&self, notification_id: i64) -> Result<bool> {
        self.mark_notification_read_impl(notification_id).await
    }

    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<u64> {
        self.mark_all_notifications_read_impl(user_id).await
    }

    async fn delete_notification(&self, notification_id: i64) -> Result<bool> {
        self.delete_notification_impl(notification_id).await
    }

    async fn create_announcement(&self, author_id: i64, announcement: CreateAnnouncementRequest) -> Result<Announcement> {
        self.create_announcement_impl(author_id, announcement).await
    }

    async fn get_announcement_by_id(&self, id: i64) -> Result<Option<Announcement>> {
        self.get_announcement_by_id_impl(id).await
    }

    async fn list_announcements_with_pagination(&self, query: AnnouncementListQuery) -> Result<AnnouncementListResponse> {
        self.list_announcements_with_pagination_impl(query).await
    }

    async fn update_announcement(&self, id: i64, update: UpdateAnnouncementRequest) -> Result<Option<Announcement>> {
        self.update_announcement_impl(id, update).await
    }

    async fn delete_announcement(&self, id: i64) -> Result<bool> {
        self.delete_announcement_impl(id).await
    }

    async fn create_file_record(&self, record: FileRecord) -> Result<FileRecord> {
        self.create_file_record_impl(record).await
    }

    async fn get_file_by_token(&self, token: &str) -> Result<Option<FileRecord>> {
        self.get_file_by_token_impl(token).await
    }

    async fn list_all_settings(&self) -> Result<Vec<SystemSetting>> {
        self.list_all_settings_impl().await
    }

    async fn update_setting(&self, key: &str, value: &str, user_id: i64, ip_address: Option<String>) -> Result<SystemSetting> {
        self.update_setting_impl(key, value, user_id, ip_address).await
    }

    async fn list_setting_audits(&self, query: SettingAuditQuery) -> Result<SettingAuditListResponse> {
        self.list_setting_audits_impl(query).await
    }
}
