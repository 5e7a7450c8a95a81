use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct Fee {
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    pub amount: f64,
    pub semester: Option<String>,
    pub due_date: Option<chrono::DateTime<chrono::Utc>>,
    pub created_by: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub enum PaymentStatus {
    Completed,
    Failed,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(PaymentStatus::Completed),
            "failed" => Ok(PaymentStatus::Failed),
            _ => Err(format!("Invalid payment status: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub enum PaymentMethod {
    Card,
    BankTransfer,
    MobileMoney,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::BankTransfer => write!(f, "bank_transfer"),
            PaymentMethod::MobileMoney => write!(f, "mobile_money"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "card" => Ok(PaymentMethod::Card),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "mobile_money" => Ok(PaymentMethod::MobileMoney),
            _ => Err(format!("Invalid payment method: {s}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct Payment {
    pub id: i64,
    pub fee_id: i64,
    pub student_id: i64,
    pub amount: f64,
    pub method: PaymentMethod,
    pub status: PaymentStatus,
    pub reference: String,
    pub message: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 费用及其已缴金额
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeWithBalance {
    pub fee: Fee,
    pub paid: f64,
    pub outstanding: f64,
}

// 学生缴费概况与选课资格
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/fee.ts")]
pub struct FeeSummary {
    pub student_id: i64,
    pub total: f64,
    pub paid: f64,
    pub balance: f64,
    /// 不取整；与 threshold 比较的正是这个值
    pub paid_percentage: f64,
    pub threshold: f64,
    pub can_register: bool,
    pub currency: String,
}
