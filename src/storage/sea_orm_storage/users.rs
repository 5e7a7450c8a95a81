use super::SeaOrmStorage;
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::errors::{LmsError, Result};
use crate::models::users::{
    entities::{User, UserRole, UserStatus},
    requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
    responses::UserListResponse,
};
use crate::utils::like_contains;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    /// `password` 字段须为已哈希的值
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            profile_name: Set(Some(req.profile.profile_name)),
            avatar_url: Set(req.profile.avatar_url),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to create user: {e}")))?;

        Ok(result.into_user())
    }

    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query user: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        self.find_user_where(Column::Username.eq(username)).await
    }

    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        self.find_user_where(Column::Email.eq(email)).await
    }

    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        self.find_user_where(
            Condition::any()
                .add(Column::Username.eq(identifier))
                .add(Column::Email.eq(identifier)),
        )
        .await
    }

    async fn find_user_where<F>(&self, filter: F) -> Result<Option<User>>
    where
        F: sea_orm::sea_query::IntoCondition,
    {
        let result = Users::find()
            .filter(filter)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query user: {e}")))?;

        Ok(result.map(|m| m.into_user()))
    }

    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<UserListResponse> {
        let mut select = Users::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let term = search.trim();
            select = select.filter(
                Condition::any()
                    .add(like_contains(Column::Username, term))
                    .add(like_contains(Column::Email, term))
                    .add(like_contains(Column::ProfileName, term)),
            );
        }

        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        if let Some(ref status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let (users, pagination) = self
            .paginate_select(
                select.order_by_desc(Column::CreatedAt),
                query.page,
                query.size,
                "users",
            )
            .await?;

        Ok(UserListResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination,
        })
    }

    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| {
                LmsError::database_operation(format!("Failed to update last login: {e}"))
            })?;

        Ok(result.rows_affected > 0)
    }

    /// `password` 字段须为已哈希的值
    pub async fn update_user_impl(
        &self,
        id: i64,
        update: UpdateUserRequest,
    ) -> Result<Option<User>> {
        if self.get_user_by_id_impl(id).await?.is_none() {
            return Ok(None);
        }

        let mut model = ActiveModel {
            id: Set(id),
            updated_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        if let Some(email) = update.email {
            model.email = Set(email);
        }
        if let Some(password) = update.password {
            model.password_hash = Set(password);
        }
        if let Some(role) = update.role {
            model.role = Set(role.to_string());
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }
        if let Some(profile) = update.profile {
            model.profile_name = Set(Some(profile.profile_name));
            model.avatar_url = Set(profile.avatar_url);
        }

        model
            .update(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to update user: {e}")))?;

        self.get_user_by_id_impl(id).await
    }

    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let result = Users::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to delete user: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    pub async fn count_users_impl(&self) -> Result<u64> {
        Users::find()
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to count users: {e}")))
    }

    pub async fn count_users_by_role_impl(&self, role: UserRole) -> Result<u64> {
        Users::find()
            .filter(Column::Role.eq(role.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to count users: {e}")))
    }

    /// 状态为 active 的用户 ID，可按角色过滤
    pub async fn list_active_user_ids_impl(&self, role: Option<UserRole>) -> Result<Vec<i64>> {
        let mut select = Users::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::Status.eq(UserStatus::Active.to_string()));

        if let Some(role) = role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        select
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to list users: {e}")))
    }
}
