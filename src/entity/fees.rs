//! 学费实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "fees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub student_id: i64,
    pub title: String,
    #[sea_orm(column_type = "Double")]
    pub amount: f64,
    pub semester: Option<String>,
    pub due_date: Option<i64>,
    pub created_by: i64,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payments::Entity")]
    Payments,
}

impl Related<super::payments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_fee(self) -> crate::models::fees::entities::Fee {
        crate::models::fees::entities::Fee {
            id: self.id,
            student_id: self.student_id,
            title: self.title,
            amount: self.amount,
            semester: self.semester,
            due_date: self.due_date.map(super::to_datetime),
            created_by: self.created_by,
            created_at: super::to_datetime(self.created_at),
        }
    }
}
