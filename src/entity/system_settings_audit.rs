//! 系统设置审计日志实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "system_settings_audit")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub setting_key: String,
    pub old_value: Option<String>,
    pub new_value: String,
    pub changed_by: i64,
    pub changed_at: i64,
    pub ip_address: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_audit(self) -> crate::models::system::entities::SettingAudit {
        use crate::models::system::entities::SettingAudit;

        SettingAudit {
            id: self.id,
            setting_key: self.setting_key,
            old_value: self.old_value,
            new_value: self.new_value,
            changed_by: self.changed_by,
            changed_at: super::to_datetime(self.changed_at),
            ip_address: self.ip_address,
        }
    }
}
