//! 仪表盘数据：学生、讲师与院级概览三种形态

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use super::DashboardService;
use crate::errors::Result;
use crate::models::dashboard::responses::{
    DashboardSummary, LecturerSummary, OverviewSummary, RoleCount, StudentSummary,
};
use crate::models::users::entities::{User, UserRole};
use crate::models::{ApiResponse, ErrorCode};
use crate::services::fees::summary::fee_summary;
use crate::services::grades::gpa::build_transcript;
use crate::services::{current_user, storage_failure};
use crate::storage::Storage;

pub async fn get_summary(
    service: &DashboardService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let user = match current_user(request) {
        Ok(user) => user,
        Err(resp) => return Ok(resp),
    };
    let storage = service.get_storage(request)?;

    let summary = match user.role {
        UserRole::Student => student_summary(&storage, &user).await.map(DashboardSummary::Student),
        UserRole::Lecturer => lecturer_summary(&storage, &user)
            .await
            .map(DashboardSummary::Lecturer),
        UserRole::Dean | UserRole::Admin => overview_summary(&storage, &user)
            .await
            .map(DashboardSummary::Overview),
    };

    match summary {
        Ok(summary) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            summary,
            "Dashboard summary retrieved successfully",
        ))),
        Err(e) => Ok(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to build dashboard summary",
            e,
        )),
    }
}

async fn student_summary(storage: &Arc<dyn Storage>, user: &User) -> Result<StudentSummary> {
    let enrolled = storage.list_student_course_ids(user.id).await?;
    let upcoming = storage
        .list_upcoming_assignments(user.id, chrono::Utc::now().timestamp())
        .await?;
    let transcript = build_transcript(
        user.id,
        storage.list_course_scores_for_student(user.id).await?,
    );
    let unread = storage.count_unread_notifications(user.id).await?;

    // 缴费信息失败不影响其他组件
    let fee = match fee_summary(storage, user.id).await {
        Ok(fee) => Some(fee),
        Err(e) => {
            tracing::warn!("Fee summary unavailable for student {}: {}", user.id, e);
            None
        }
    };

    Ok(StudentSummary {
        enrolled_courses: enrolled.len() as i64,
        upcoming_assignments: upcoming.len() as i64,
        gpa: transcript.gpa,
        total_credits: transcript.total_credits,
        fee,
        unread_notifications: unread as i64,
    })
}

async fn lecturer_summary(storage: &Arc<dyn Storage>, user: &User) -> Result<LecturerSummary> {
    Ok(LecturerSummary {
        taught_courses: storage.count_courses(Some(user.id)).await? as i64,
        ungraded_submissions: storage.count_ungraded_for_lecturer(user.id).await? as i64,
        unread_notifications: storage.count_unread_notifications(user.id).await? as i64,
    })
}

async fn overview_summary(storage: &Arc<dyn Storage>, user: &User) -> Result<OverviewSummary> {
    let mut users_by_role = Vec::with_capacity(UserRole::all_roles().len());
    for role in UserRole::all_roles() {
        users_by_role.push(RoleCount {
            role: **role,
            count: storage.count_users_by_role(**role).await? as i64,
        });
    }

    Ok(OverviewSummary {
        users_by_role,
        total_courses: storage.count_courses(None).await? as i64,
        outstanding_fees: (storage.total_outstanding_fees().await? * 100.0).round() / 100.0,
        unread_notifications: storage.count_unread_notifications(user.id).await? as i64,
    })
}
