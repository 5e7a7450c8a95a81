use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub enum NotificationType {
    Announcement,
    AssignmentCreated,
    GradeReleased,
    PaymentResult,
    System,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::Announcement => "announcement",
            NotificationType::AssignmentCreated => "assignment_created",
            NotificationType::GradeReleased => "grade_released",
            NotificationType::PaymentResult => "payment_result",
            NotificationType::System => "system",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "announcement" => Ok(NotificationType::Announcement),
            "assignment_created" => Ok(NotificationType::AssignmentCreated),
            "grade_released" => Ok(NotificationType::GradeReleased),
            "payment_result" => Ok(NotificationType::PaymentResult),
            "system" => Ok(NotificationType::System),
            _ => Err(format!("Invalid notification type: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/notification.ts")]
pub struct Notification {
    pub id: i64,
    pub user_id: i64,
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    /// 关联对象类型，如 assignment / grade / payment / announcement
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub is_read: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// 批量下发时共享的通知内容
#[derive(Debug, Clone)]
pub struct NotificationTemplate {
    pub notification_type: NotificationType,
    pub title: String,
    pub content: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
}

impl NotificationTemplate {
    pub fn new(notification_type: NotificationType, title: impl Into<String>) -> Self {
        Self {
            notification_type,
            title: title.into(),
            content: None,
            reference_type: None,
            reference_id: None,
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn reference(mut self, reference_type: &str, reference_id: i64) -> Self {
        self.reference_type = Some(reference_type.to_string());
        self.reference_id = Some(reference_id);
        self
    }
}
