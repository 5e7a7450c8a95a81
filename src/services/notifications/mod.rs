pub mod count;
pub mod delete;
pub mod dispatch;
pub mod list;
pub mod mark_read;

pub use dispatch::NotificationDispatcher;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::notifications::requests::NotificationListParams;
use crate::storage::Storage;

pub struct NotificationService;

impl NotificationService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> ActixResult<Arc<dyn Storage>> {
        super::storage_from_request(request)
    }

    pub async fn list_notifications(
        &self,
        query: NotificationListParams,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        list::list_notifications(self, query, request).await
    }

    pub async fn unread_count(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        count::unread_count(self, request).await
    }

    pub async fn mark_read(
        &self,
        notification_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        mark_read::mark_read(self, notification_id, request).await
    }

    pub async fn mark_all_read(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        mark_read::mark_all_read(self, request).await
    }

    pub async fn delete_notification(
        &self,
        notification_id: i64,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        delete::delete_notification(self, notification_id, request).await
    }
}
