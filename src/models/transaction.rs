use crate::entities::transactions;
use crate::error::{AppError, AppResult};
use crate::models::penalty::validate_amount;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTransactionRequest {
    pub user_id: i64,
    pub amount: Decimal,
    pub description: Option<String>,
}

impl CreateTransactionRequest {
    pub fn validate(&self) -> AppResult<()> {
        validate_amount(self.amount)
    }
}

/// A payment applied to a user's open penalties, oldest first.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub description: Option<String>,
}

impl PaymentRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.amount <= Decimal::ZERO {
            return Err(AppError::ValidationError(
                "Payment amount must be positive".to_string(),
            ));
        }
        validate_amount(self.amount)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionResponse {
    pub id: i64,
    pub user_id: i64,
    pub amount: Decimal,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<transactions::Model> for TransactionResponse {
    fn from(transaction: transactions::Model) -> Self {
        Self {
            id: transaction.id,
            user_id: transaction.user_id,
            amount: transaction.amount,
            description: transaction.description,
            created_at: transaction.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub transaction: TransactionResponse,
    pub penalties_paid: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaymentSummary {
    pub total_penalties: Decimal,
    pub paid_penalties: Decimal,
    pub unpaid_penalties: Decimal,
    pub total_payments: Decimal,
    pub last_payment_date: Option<DateTime<Utc>>,
}
