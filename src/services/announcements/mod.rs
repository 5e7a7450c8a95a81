pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::ErrorCode;
use crate::models::announcements::{
    entities::Announcement,
    requests::{AnnouncementListParams, CreateAnnouncementRequest, UpdateAnnouncementRequest},
};
use crate::models::users::entities::{User, UserRole};
use crate::services::{not_found, storage_failure};
use crate::storage::Storage;

pub(crate) const MAX_TITLE_CHARS: usize = 200;
pub(crate) const MAX_CONTENT_CHARS: usize = 10_000;

pub struct AnnouncementService;

impl AnnouncementService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(request)
    }

    pub async fn create_announcement(
        &self,
        announcement: CreateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        create::create_announcement(self, announcement, request).await
    }

    pub async fn list_announcements(
        &self,
        query: AnnouncementListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_announcements(self, query, request).await
    }

    pub async fn get_announcement(
        &self,
        announcement_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        get::get_announcement(self, announcement_id, request).await
    }

    pub async fn update_announcement(
        &self,
        announcement_id: i64,
        update: UpdateAnnouncementRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_announcement(self, announcement_id, update, request).await
    }

    pub async fn delete_announcement(
        &self,
        announcement_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_announcement(self, announcement_id, request).await
    }
}

pub(crate) async fn load_announcement(
    storage: &Arc<dyn Storage>,
    announcement_id: i64,
) -> Result<Announcement, HttpResponse> {
    match storage.get_announcement_by_id(announcement_id).await {
        Ok(Some(announcement)) => Ok(announcement),
        Ok(None) => Err(not_found(
            ErrorCode::AnnouncementNotFound,
            "Announcement not found",
        )),
        Err(e) => Err(storage_failure(
            ErrorCode::InternalServerError,
            "Failed to load announcement",
            e,
        )),
    }
}

/// 全局公告对该角色是否可见
pub(crate) fn global_visible_to(announcement: &Announcement, role: UserRole) -> bool {
    role.is_manager() || announcement.audience.is_none_or(|audience| audience == role)
}

pub(crate) fn can_edit(user: &User, announcement: &Announcement) -> bool {
    announcement.author_id == user.id || user.role == UserRole::Admin
}

pub(crate) fn can_delete(user: &User, announcement: &Announcement) -> bool {
    announcement.author_id == user.id || user.role.is_manager()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn announcement(author_id: i64, audience: Option<UserRole>) -> Announcement {
        let now = chrono::Utc::now();
        Announcement {
            id: 1,
            author_id,
            course_id: None,
            title: "Exam week".to_string(),
            content: "Schedule attached".to_string(),
            audience,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_global_visibility() {
        let everyone = announcement(1, None);
        assert!(global_visible_to(&everyone, UserRole::Student));
        assert!(global_visible_to(&everyone, UserRole::Lecturer));

        let lecturers = announcement(1, Some(UserRole::Lecturer));
        assert!(!global_visible_to(&lecturers, UserRole::Student));
        assert!(global_visible_to(&lecturers, UserRole::Lecturer));
        assert!(global_visible_to(&lecturers, UserRole::Dean));
    }
}
