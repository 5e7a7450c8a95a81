//! 上传文件记录

use super::SeaOrmStorage;
use crate::entity::files::{ActiveModel, Entity as Files};
use crate::errors::{LmsError, Result};
use crate::models::files::entities::FileRecord;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};

impl SeaOrmStorage {
    pub async fn create_file_record_impl(&self, record: FileRecord) -> Result<FileRecord> {
        let model = ActiveModel {
            download_token: Set(record.download_token),
            original_name: Set(record.original_name),
            stored_name: Set(record.stored_name),
            file_size: Set(record.file_size),
            file_type: Set(record.file_type),
            user_id: Set(record.user_id),
            created_at: Set(record.created_at.timestamp()),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to save file record: {e}")))?;

        Ok(result.into_file())
    }

    pub async fn get_file_by_token_impl(&self, token: &str) -> Result<Option<FileRecord>> {
        let result = Files::find_by_id(token.to_string())
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query file: {e}")))?;

        Ok(result.map(|m| m.into_file()))
    }
}
