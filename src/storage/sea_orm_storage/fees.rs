//! 学费与缴费记录

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::fees::{ActiveModel, Column, Entity as Fees};
use crate::entity::payments::{
    ActiveModel as PaymentActiveModel, Column as PaymentColumn, Entity as Payments,
};
use crate::errors::{LmsError, Result};
use crate::models::fees::{
    entities::{Fee, FeeWithBalance, Payment, PaymentStatus},
    requests::{CreateFeeRequest, FeeListQuery, NewPayment, PaymentListQuery},
    responses::{FeeListResponse, PaymentListResponse},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

impl SeaOrmStorage {
    pub async fn create_fee_impl(&self, created_by: i64, req: CreateFeeRequest) -> Result<Fee> {
        let model = ActiveModel {
            student_id: Set(req.student_id),
            title: Set(req.title),
            amount: Set(req.amount),
            semester: Set(req.semester),
            due_date: Set(req.due_date.map(|d| d.timestamp())),
            created_by: Set(created_by),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to create fee: {e}")))?;

        Ok(result.into_fee())
    }

    pub async fn get_fee_by_id_impl(&self, id: i64) -> Result<Option<Fee>> {
        let result = Fees::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query fee: {e}")))?;

        Ok(result.map(|m| m.into_fee()))
    }

    pub async fn list_fees_with_pagination_impl(
        &self,
        query: FeeListQuery,
    ) -> Result<FeeListResponse> {
        let mut select = Fees::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(Column::StudentId.eq(student_id));
        }

        let (fees, pagination) = self
            .paginate_select(
                select.order_by_desc(Column::CreatedAt),
                query.page,
                query.size,
                "fees",
            )
            .await?;

        let fee_ids: Vec<i64> = fees.iter().map(|f| f.id).collect();
        let mut paid_by_fee: HashMap<i64, f64> = HashMap::new();
        for (fee_id, amount) in self.completed_payment_amounts(Some(fee_ids), None).await? {
            *paid_by_fee.entry(fee_id).or_default() += amount;
        }

        let items = fees
            .into_iter()
            .map(|m| {
                let fee = m.into_fee();
                let paid = paid_by_fee.get(&fee.id).copied().unwrap_or(0.0);
                FeeWithBalance {
                    outstanding: (fee.amount - paid).max(0.0),
                    paid,
                    fee,
                }
            })
            .collect();

        Ok(FeeListResponse { items, pagination })
    }

    pub async fn delete_fee_impl(&self, id: i64) -> Result<bool> {
        let result = Fees::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to delete fee: {e}")))?;

        Ok(result.rows_affected > 0)
    }

    /// 已完成缴费的 (fee_id, amount)，可按费用或学生过滤
    async fn completed_payment_amounts(
        &self,
        fee_ids: Option<Vec<i64>>,
        student_id: Option<i64>,
    ) -> Result<Vec<(i64, f64)>> {
        let mut select = Payments::find()
            .select_only()
            .column(PaymentColumn::FeeId)
            .column(PaymentColumn::Amount)
            .filter(PaymentColumn::Status.eq(PaymentStatus::Completed.to_string()));

        if let Some(fee_ids) = fee_ids {
            select = select.filter(PaymentColumn::FeeId.is_in(fee_ids));
        }
        if let Some(student_id) = student_id {
            select = select.filter(PaymentColumn::StudentId.eq(student_id));
        }

        select
            .into_tuple::<(i64, f64)>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query payments: {e}")))
    }

    /// 学生应缴总额与已缴总额
    pub async fn get_student_fee_totals_impl(&self, student_id: i64) -> Result<(f64, f64)> {
        let amounts: Vec<f64> = Fees::find()
            .select_only()
            .column(Column::Amount)
            .filter(Column::StudentId.eq(student_id))
            .into_tuple::<f64>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query fees: {e}")))?;

        let paid = self
            .completed_payment_amounts(None, Some(student_id))
            .await?
            .into_iter()
            .map(|(_, amount)| amount)
            .sum();

        Ok((amounts.into_iter().sum(), paid))
    }

    pub async fn sum_completed_payments_for_fee_impl(&self, fee_id: i64) -> Result<f64> {
        Ok(self
            .completed_payment_amounts(Some(vec![fee_id]), None)
            .await?
            .into_iter()
            .map(|(_, amount)| amount)
            .sum())
    }

    pub async fn count_completed_payments_for_fee_impl(&self, fee_id: i64) -> Result<u64> {
        Payments::find()
            .filter(PaymentColumn::FeeId.eq(fee_id))
            .filter(PaymentColumn::Status.eq(PaymentStatus::Completed.to_string()))
            .count(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to count payments: {e}")))
    }

    /// 全体学生未缴清的金额之和，多缴不抵扣其他费用
    pub async fn total_outstanding_fees_impl(&self) -> Result<f64> {
        let fees: Vec<(i64, f64)> = Fees::find()
            .select_only()
            .column(Column::Id)
            .column(Column::Amount)
            .into_tuple::<(i64, f64)>()
            .all(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to query fees: {e}")))?;

        let mut paid_by_fee: HashMap<i64, f64> = HashMap::new();
        for (fee_id, amount) in self.completed_payment_amounts(None, None).await? {
            *paid_by_fee.entry(fee_id).or_default() += amount;
        }

        Ok(fees
            .into_iter()
            .map(|(id, amount)| (amount - paid_by_fee.get(&id).copied().unwrap_or(0.0)).max(0.0))
            .sum())
    }

    pub async fn create_payment_impl(&self, new: NewPayment) -> Result<Payment> {
        let model = PaymentActiveModel {
            fee_id: Set(new.fee_id),
            student_id: Set(new.student_id),
            amount: Set(new.amount),
            method: Set(new.method.to_string()),
            status: Set(new.status.to_string()),
            reference: Set(new.reference),
            message: Set(new.message),
            created_at: Set(chrono::Utc::now().timestamp()),
            ..Default::default()
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| LmsError::database_operation(format!("Failed to record payment: {e}")))?;

        Ok(result.into_payment())
    }

    pub async fn list_payments_with_pagination_impl(
        &self,
        query: PaymentListQuery,
    ) -> Result<PaymentListResponse> {
        let mut select = Payments::find();
        if let Some(student_id) = query.student_id {
            select = select.filter(PaymentColumn::StudentId.eq(student_id));
        }
        if let Some(fee_id) = query.fee_id {
            select = select.filter(PaymentColumn::FeeId.eq(fee_id));
        }

        let (items, pagination) = self
            .paginate_select(
                select.order_by_desc(PaymentColumn::CreatedAt),
                query.page,
                query.size,
                "payments",
            )
            .await?;

        Ok(PaymentListResponse {
            items: items.into_iter().map(|m| m.into_payment()).collect(),
            pagination,
        })
    }
}
