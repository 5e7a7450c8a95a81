//! 通知存储操作

use super::SeaOrmStorage;
use crate::entity::notifications::{ActiveModel, Column, Entity as Notifications};
use crate::errors::{LmsError, Result};
use crate::models::notifications::{
    entities::{Notification, NotificationTemplate},
    requests::NotificationListQuery,
    responses::NotificationListResponse,
};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set};

impl SeaOrmStorage {
    /// 为每个接收者插入一条相同内容的通知，返回插入行数
    pub async fn create_notifications_impl(
        &self,
        user_ids: &[i64],
        template: &NotificationTemplate,
    ) -> Result<u64> {
        if user_ids.is_empty() {
            return Ok(0);
        }

        let now = chrono::Utc::now().timestamp();
        let models = user_ids.iter().map(|&user_id| ActiveModel {
            user_id: Set(user_id),
            notification_type: Set(template.notification_type.to_string()),
            title: Set(template.title.clone()),
            content: Set(template.content.clone()),
            reference_type: Set(template.reference_type.clone()),
            reference_id: Set(template.reference_id),
            is_read: Set(false),
            created_at: Set(now),
            ..Default::default()
        });

        Notifications::insert_many(models)
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to create notifications: {e}"))
            })
    }

    pub async fn get_notification_by_id_impl(
        &self,
        notification_id: i64,
    ) -> Result<Option<Notification>> {
        let result = Notifications::find_by_id(notification_id)
            .one(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to query notification: {e}"))
            })?;

        Ok(result.map(|m| m.into_notification()))
    }

    pub async fn list_notifications_with_pagination_impl(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse> {
        let mut select = Notifications::find().filter(Column::UserId.eq(user_id));
        if query.unread_only {
            select = select.filter(Column::IsRead.eq(false));
        }

        let (items, pagination) = self
            .paginate_select(
                select
                    .order_by_desc(Column::CreatedAt)
                    .order_by_desc(Column::Id),
                query.page,
                query.size,
                "notifications",
            )
            .await?;

        Ok(NotificationListResponse {
            items: items.into_iter().map(|m| m.into_notification()).collect(),
            pagination,
        })
    }

    pub async fn count_unread_notifications_impl(&self, user_id: i64) -> Result<u64> {
        Notifications::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to count notifications: {e}"))
            })
    }

    pub async fn mark_notification_read_impl(&self, notification_id: i64) -> Result<bool> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::Id.eq(notification_id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to update notification: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    pub async fn mark_all_notifications_read_impl(&self, user_id: i64) -> Result<u64> {
        let result = Notifications::update_many()
            .col_expr(Column::IsRead, sea_orm::sea_query::Expr::value(true))
            .filter(Column::UserId.eq(user_id))
            .filter(Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to update notifications: {e}"))
            })?;

        Ok(result.rows_affected)
    }

    pub async fn delete_notification_impl(&self, notification_id: i64) -> Result<bool> {
        let result = Notifications::delete_by_id(notification_id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to delete notification: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }
}
