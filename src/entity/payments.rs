//! 缴费记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub fee_id: i64,
    pub student_id: i64,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub method: String,
    pub status: String,
    #[sea_orm(unique)]
    pub reference: String,
    pub message: Option<String>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::fees::Entity",
        from = "Column::FeeId",
        to = "super::fees::Column::Id"
    )]
    Fee,
}

impl Related<super::fees::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fee.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_payment(self) -> crate::models::fees::entities::Payment {
        use crate::models::fees::entities::{Payment, PaymentMethod, PaymentStatus};

        Payment {
            id: self.id,
            fee_id: self.fee_id,
            student_id: self.student_id,
            amount: self.amount,
            method: self.method.parse().unwrap_or(PaymentMethod::Card),
            status: self.status.parse().unwrap_or(PaymentStatus::Failed),
            reference: self.reference,
            message: self.message,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
