//! 动态设置与变更审计

use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use crate::entity::prelude::{SystemSettings, SystemSettingsAudit};
use crate::errors::{LmsError, Result};
use crate::models::system::{
    entities::SystemSetting, requests::SettingAuditQuery, responses::SettingAuditListResponse,
};

use super::SeaOrmStorage;

impl SeaOrmStorage {
    /// 获取所有设置
    pub(crate) async fn list_all_settings_impl(&self) -> Result<Vec<SystemSetting>> {
        let settings = SystemSettings::find()
            .order_by(crate::entity::system_settings::Column::Key, Order::Asc)
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to list settings: {e}")))?;

        Ok(settings.into_iter().map(|s| s.into_setting()).collect())
    }

    /// 设置值与审计记录在同一事务中写入
    pub(crate) async fn update_setting_impl(
        &self,
        key: &str,
        value: &str,
        user_id: i64,
        ip_address: Option<String>,
    ) -> Result<SystemSetting> {
        use crate::entity::{system_settings, system_settings_audit};

        let now = chrono::Utc::now().timestamp();
        let txn = self.db.begin().await.map_err(|e| {
            LmsError::database_operation(format!("Failed to begin transaction: {e}"))
        })?;

        let existing = SystemSettings::find_by_id(key.to_string())
            .one(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query setting: {e}")))?
            .ok_or_else(|| LmsError::not_found(format!("Setting {key} not found")))?;
        let old_value = existing.value.clone();

        let mut setting: system_settings::ActiveModel = existing.into();
        setting.value = Set(value.to_string());
        setting.updated_at = Set(now);
        setting.updated_by = Set(Some(user_id));
        let updated = setting
            .update(&txn)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to update setting: {e}")))?;

        system_settings_audit::ActiveModel {
            setting_key: Set(key.to_string()),
            old_value: Set(Some(old_value)),
            new_value: Set(value.to_string()),
            changed_by: Set(user_id),
            changed_at: Set(now),
            ip_address: Set(ip_address),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(|e| LmsError::database_operation(format!("Failed to write setting audit: {e}")))?;

        txn.commit().await.map_err(|e| {
            LmsError::database_operation(format!("Failed to commit setting update: {e}"))
        })?;

        Ok(updated.into_setting())
    }

    /// 获取审计日志
    pub(crate) async fn list_setting_audits_impl(
        &self,
        query: SettingAuditQuery,
    ) -> Result<SettingAuditListResponse> {
        use crate::entity::system_settings_audit::Column;

        let mut find = SystemSettingsAudit::find();
        if let Some(key) = &query.key {
            find = find.filter(Column::SettingKey.eq(key));
        }
        if let Some(user_id) = query.changed_by {
            find = find.filter(Column::ChangedBy.eq(user_id));
        }

        // 最新的变更在前，默认每页 20 条
        let (audits, pagination) = self
            .paginate_select(
                find.order_by(Column::ChangedAt, Order::Desc)
                    .order_by(Column::Id, Order::Desc),
                query.page,
                query.size.or(Some(20)),
                "setting audits",
            )
            .await?;

        Ok(SettingAuditListResponse {
            audits: audits.into_iter().map(|a| a.into_audit()).collect(),
            pagination,
        })
    }
}
