//! SeaORM 实体定义
//!
//! 只在 storage 层使用，读出后通过 `into_*` 转为 models 中的业务类型。
//! 时间统一以 unix 秒存储。

pub mod prelude;

pub mod announcements;
pub mod assignments;
pub mod courses;
pub mod enrollments;
pub mod fees;
pub mod files;
pub mod grades;
pub mod notifications;
pub mod payments;
pub mod submissions;
pub mod system_settings;
pub mod system_settings_audit;
pub mod users;

use chrono::{DateTime, Utc};

pub(crate) fn to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
