pub mod announcements;
pub mod assignments;
pub mod auth;
pub mod common;
pub mod courses;
pub mod dashboard;
pub mod fees;
pub mod files;
pub mod grades;
pub mod notifications;
pub mod pwa;
pub mod submissions;
pub mod system;
pub mod users;

pub use common::{ApiResponse, PaginationInfo, PaginationQuery};

/// 进程启动时间，用于启动耗时统计
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}

/// 响应信封中的业务错误码
///
/// 按领域分段：1xxx 通用，2xxx 认证与用户，3xxx 课程，4xxx 作业/提交/成绩，
/// 5xxx 学费，6xxx 通知与公告，7xxx 文件，8xxx 系统设置。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    Conflict = 1009,
    RateLimitExceeded = 1029,
    InternalServerError = 1500,

    AuthFailed = 2000,
    RegisterFailed = 2001,
    RegistrationDisabled = 2002,
    UserNotFound = 2100,
    UserAlreadyExists = 2101,
    UserNameInvalid = 2102,
    UserEmailInvalid = 2103,
    UserPasswordInvalid = 2104,
    UserNameAlreadyExists = 2105,
    UserEmailAlreadyExists = 2106,
    UserCreationFailed = 2107,
    UserUpdateFailed = 2108,
    UserDeleteFailed = 2109,
    CanNotDeleteCurrentUser = 2110,

    CourseNotFound = 3000,
    CourseCodeAlreadyExists = 3001,
    CourseInvalid = 3002,
    CoursePermissionDenied = 3003,
    EnrollmentNotFound = 3010,
    AlreadyEnrolled = 3011,
    FeeRegistrationBlocked = 3012,
    NotEnrolled = 3013,

    AssignmentNotFound = 4000,
    AssignmentInvalid = 4001,
    SubmissionNotFound = 4100,
    SubmissionInvalid = 4101,
    SubmissionAlreadyGraded = 4102,
    GradeNotFound = 4200,
    GradeScoreOutOfRange = 4201,

    FeeNotFound = 5000,
    FeeInvalid = 5001,
    FeeHasPayments = 5002,
    PaymentInvalid = 5010,
    PaymentFailed = 5011,

    NotificationNotFound = 6000,
    AnnouncementNotFound = 6100,
    AnnouncementInvalid = 6101,

    FileNotFound = 7000,
    FileUploadFailed = 7001,
    FileTypeNotAllowed = 7002,
    FileSizeExceeded = 7003,
    MultifileUploadNotAllowed = 7004,

    SettingNotFound = 8000,
    SettingInvalid = 8001,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success as i32, 0);
        assert_eq!(ErrorCode::Unauthorized as i32, 1001);
        assert_eq!(ErrorCode::FeeRegistrationBlocked as i32, 3012);
        assert_eq!(ErrorCode::GradeScoreOutOfRange as i32, 4201);
    }
}
