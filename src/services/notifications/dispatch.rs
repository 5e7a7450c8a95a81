//! 通知扇出
//!
//! 触发方（布置作业、发布成绩、公告、缴费）只负责给出收件人与模板，
//! 写入失败只记日志，不影响触发方的结果。

use std::sync::Arc;

use crate::models::notifications::entities::NotificationTemplate;
use crate::storage::Storage;

pub struct NotificationDispatcher;

impl NotificationDispatcher {
    /// 去重后批量写入，返回实际写入条数
    pub async fn fan_out<I>(
        storage: &Arc<dyn Storage>,
        recipients: I,
        template: &NotificationTemplate,
    ) -> u64
    where
        I: IntoIterator<Item = i64>,
    {
        let recipients = distinct_recipients(recipients);
        if recipients.is_empty() {
            return 0;
        }

        match storage.create_notifications(&recipients, template).await {
            Ok(count) => {
                tracing::debug!(
                    "Dispatched {} notification to {} recipients",
                    template.notification_type,
                    count
                );
                count
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to dispatch {} notification to {} recipients: {}",
                    template.notification_type,
                    recipients.len(),
                    e
                );
                0
            }
        }
    }

    pub async fn notify(
        storage: &Arc<dyn Storage>,
        user_id: i64,
        template: &NotificationTemplate,
    ) -> bool {
        Self::fan_out(storage, [user_id], template).await > 0
    }
}

fn distinct_recipients<I>(recipients: I) -> Vec<i64>
where
    I: IntoIterator<Item = i64>,
{
    let mut ids: Vec<i64> = recipients.into_iter().filter(|id| *id > 0).collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_recipients() {
        assert_eq!(distinct_recipients([3, 1, 3, 2, 1]), vec![1, 2, 3]);
        assert_eq!(distinct_recipients([0, -4, 7]), vec![7]);
        assert!(distinct_recipients(Vec::new()).is_empty());
    }
}
