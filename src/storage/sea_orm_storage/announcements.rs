use super::SeaOrmStorage;
use crate::entity::announcements::{ActiveModel, Column, Entity as Announcements};
use crate::errors::{LmsError, Result};
use crate::models::announcements::{
    entities::Announcement,
    requests::{AnnouncementListQuery, CreateAnnouncementRequest, UpdateAnnouncementRequest},
    responses::AnnouncementListResponse,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    pub async fn create_announcement_impl(
        &self,
        author_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            author_id: Set(author_id),
            course_id: Set(req.course_id),
            title: Set(req.title),
            content: Set(req.content),
            audience: Set(req.audience.map(|r| r.to_string())),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model.insert(&self.db).await.map_err(|e| {
            LmsError::database_operation(format!("Failed to create announcement: {e}"))
        })?;

        Ok(result.into_announcement())
    }

    pub async fn get_announcement_by_id_impl(&self, id: i64) -> Result<Option<Announcement>> {
        let result = Announcements::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to query announcement: {e}"))
            })?;

        Ok(result.map(|m| m.into_announcement()))
    }

    pub async fn list_announcements_with_pagination_impl(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse> {
        let mut select = Announcements::find();

        if let Some(course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id));
        }

        // 全局公告按受众角色过滤，课程公告限于调用者相关的课程
        if let Some(visibility) = query.visible_to {
            let global = Condition::all().add(Column::CourseId.is_null()).add(
                Condition::any()
                    .add(Column::Audience.is_null())
                    .add(Column::Audience.eq(visibility.role.to_string())),
            );
            select = select.filter(
                Condition::any()
                    .add(global)
                    .add(Column::CourseId.is_in(visibility.course_ids)),
            );
        }

        let (items, pagination) = self
            .paginate_select(
                select
                    .order_by_desc(Column::CreatedAt)
                    .order_by_desc(Column::Id),
                query.page,
                query.size,
                "announcements",
            )
            .await?;

        Ok(AnnouncementListResponse {
            items: items.into_iter().map(|m| m.into_announcement()).collect(),
            pagination,
        })
    }

    pub async fn update_announcement_impl(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>> {
        if self.get_announcement_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };
        if let Some(title) = update.title {
            model.title = Set(title);
        }
        if let Some(content) = update.content {
            model.content = Set(content);
        }

        model.update(&self.db).await.map_err(|e| {
            LmsError::database_operation(format!("Failed to update announcement: {e}"))
        })?;

        self.get_announcement_by_id_impl(id).await
    }

    pub async fn delete_announcement_impl(&self, id: i64) -> Result<bool> {
        let result = Announcements::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to delete announcement: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }
}
