pub mod create;
pub mod delete;
pub mod enroll;
pub mod get;
pub mod list;
pub mod students;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::courses::{
    entities::{Course, EnrollmentStatus},
    requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest},
};
use crate::models::users::entities::{User, UserRole};
use crate::services::{bad_request, not_found, storage_failure};
use crate::storage::Storage;

pub struct CourseService;

impl CourseService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(request)
    }

    pub async fn create_course(
        &self,
        course: CreateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_course(self, course, request).await
    }

    pub async fn list_courses(
        &self,
        query: CourseListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_courses(self, query, request).await
    }

    pub async fn get_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_course(self, course_id, request).await
    }

    pub async fn update_course(
        &self,
        course_id: i64,
        update: UpdateCourseRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_course(self, course_id, update, request).await
    }

    pub async fn delete_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_course(self, course_id, request).await
    }

    pub async fn enroll(&self, course_id: i64, request: &HttpRequest) -> ActixResult<HttpResponse> {
        enroll::enroll(self, course_id, request).await
    }

    pub async fn drop_course(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        enroll::drop_course(self, course_id, request).await
    }

    pub async fn list_students(
        &self,
        course_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        students::list_students(self, course_id, request).await
    }
}

/// 授课讲师本人、院长和管理员可以管理课程
pub(crate) fn can_manage_course(user: &User, course: &Course) -> bool {
    user.role.is_manager() || (user.role == UserRole::Lecturer && course.lecturer_id == user.id)
}

pub(crate) async fn load_course(
    storage: &Arc<dyn Storage>,
    course_id: i64,
) -> Result<Course, HttpResponse> {
    match storage.get_course_by_id(course_id).await {
        Ok(Some(course)) => Ok(course),
        Ok(None) => Err(not_found(ErrorCode::CourseNotFound, "Course not found")),
        Err(e) => Err(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to load course",
            e,
        )),
    }
}

/// 课程成员：选课学生或有管理权限的教职工
pub(crate) async fn is_course_member(
    storage: &Arc<dyn Storage>,
    user: &User,
    course: &Course,
) -> crate::errors::Result<bool> {
    if can_manage_course(user, course) {
        return Ok(true);
    }
    if user.role != UserRole::Student {
        return Ok(false);
    }
    Ok(storage
        .get_enrollment(course.id, user.id)
        .await?
        .is_some_and(|e| e.status == EnrollmentStatus::Active))
}

/// 指定的讲师必须存在且角色为讲师
pub(crate) async fn check_lecturer(
    storage: &Arc<dyn Storage>,
    lecturer_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_id(lecturer_id).await {
        Ok(Some(user)) if user.role == UserRole::Lecturer => Ok(()),
        Ok(Some(_)) => Err(bad_request(
            ErrorCode::CourseInvalid,
            "Assigned user is not a lecturer",
        )),
        Ok(None) => Err(not_found(ErrorCode::UserNotFound, "Lecturer not found")),
        Err(e) => Err(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to load lecturer",
            e,
        )),
    }
}

/// 学分范围
pub(crate) fn validate_credits(credits: i32) -> Result<(), &'static str> {
    if (1..=30).contains(&credits) {
        Ok(())
    } else {
        Err("Credits must be between 1 and 30")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::users::entities::{UserProfile, UserStatus};

    fn user(id: i64, role: UserRole) -> User {
        let now = chrono::Utc::now();
        User {
            id,
            username: format!("user{id}"),
            email: format!("user{id}@example.com"),
            password_hash: String::new(),
            role,
            status: UserStatus::Active,
            profile: UserProfile::default(),
            last_login: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn course(lecturer_id: i64) -> Course {
        let now = chrono::Utc::now();
        Course {
            id: 1,
            code: "CS101".to_string(),
            title: "Intro".to_string(),
            description: None,
            credits: 3,
            lecturer_id,
            department: None,
            semester: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_can_manage_course() {
        let course = course(7);
        assert!(can_manage_course(&user(7, UserRole::Lecturer), &course));
        assert!(!can_manage_course(&user(8, UserRole::Lecturer), &course));
        assert!(can_manage_course(&user(9, UserRole::Dean), &course));
        assert!(can_manage_course(&user(10, UserRole::Admin), &course));
        // 学生即使 id 相同也不行
        assert!(!can_manage_course(&user(7, UserRole::Student), &course));
    }

    #[test]
    fn test_validate_credits() {
        assert!(validate_credits(3).is_ok());
        assert!(validate_credits(0).is_err());
        assert!(validate_credits(-2).is_err());
        assert!(validate_credits(31).is_err());
    }
}
