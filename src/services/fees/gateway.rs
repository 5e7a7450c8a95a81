//! 支付网关
//!
//! 只提供模拟实现：按配置的成功率随机给出结果，不涉及真实的支付协议。

use async_trait::async_trait;
use rand::Rng;

use crate::models::fees::entities::PaymentMethod;
use crate::services::system::DynamicConfig;

#[derive(Debug, Clone)]
pub struct ChargeRequest {
    pub reference: String,
    pub amount: f64,
    pub method: PaymentMethod,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChargeOutcome {
    Approved { message: String },
    Declined { reason: String },
}

impl ChargeOutcome {
    pub fn is_approved(&self) -> bool {
        matches!(self, ChargeOutcome::Approved { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            ChargeOutcome::Approved { message } => message,
            ChargeOutcome::Declined { reason } => reason,
        }
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(&self, request: &ChargeRequest) -> ChargeOutcome;
}

pub struct SimulatedGateway {
    success_rate: f64,
}

impl SimulatedGateway {
    pub fn new(success_rate: f64) -> Self {
        let success_rate = if success_rate.is_finite() {
            success_rate.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self { success_rate }
    }

    /// 成功率取动态配置 `payment.simulated_success_rate`
    pub async fn from_settings() -> Self {
        Self::new(DynamicConfig::simulated_success_rate().await)
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(&self, request: &ChargeRequest) -> ChargeOutcome {
        let approved = rand::rng().random_bool(self.success_rate);

        tracing::info!(
            "Simulated {} charge {} for {:.2}: {}",
            request.method,
            request.reference,
            request.amount,
            if approved { "approved" } else { "declined" }
        );

        if approved {
            ChargeOutcome::Approved {
                message: format!("Payment {} approved", request.reference),
            }
        } else {
            ChargeOutcome::Declined {
                reason: "Payment declined by the issuer".to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ChargeRequest {
        ChargeRequest {
            reference: "PAY-TEST".into(),
            amount: 100.0,
            method: PaymentMethod::Card,
        }
    }

    #[tokio::test]
    async fn test_always_approves_at_full_rate() {
        let gateway = SimulatedGateway::new(1.0);
        for _ in 0..20 {
            assert!(gateway.charge(&request()).await.is_approved());
        }
    }

    #[tokio::test]
    async fn test_always_declines_at_zero_rate() {
        let gateway = SimulatedGateway::new(0.0);
        for _ in 0..20 {
            let outcome = gateway.charge(&request()).await;
            assert!(!outcome.is_approved());
            assert!(!outcome.message().is_empty());
        }
    }

    #[test]
    fn test_rate_is_clamped() {
        assert_eq!(SimulatedGateway::new(3.0).success_rate, 1.0);
        assert_eq!(SimulatedGateway::new(-1.0).success_rate, 0.0);
        assert_eq!(SimulatedGateway::new(f64::NAN).success_rate, 0.0);
    }
}
