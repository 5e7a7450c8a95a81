use serde::Serialize;
use ts_rs::TS;

use super::entities::Announcement;
use crate::models::common::PaginationInfo;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/announcement.ts")]
pub struct AnnouncementListResponse {
    pub items: Vec<Announcement>,
    pub pagination: PaginationInfo,
}
