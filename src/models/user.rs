use crate::entities::users;
use crate::error::{AppError, AppResult};
use crate::models::{BalanceStatus, PenaltyResponse, UserBalance};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUserRequest {
    pub full_name: String,
    pub team_id: i64,
}

impl CreateUserRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.full_name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Full name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub full_name: String,
    pub team_id: i64,
}

impl From<users::Model> for UserResponse {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            team_id: user.team_id,
        }
    }
}

/// A user row flattened with its computed balance, one row of the
/// per-user summary table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserWithBalance {
    pub id: i64,
    pub full_name: String,
    pub team_id: i64,
    pub total_debt: Decimal,
    pub total_credit: Decimal,
    pub balance: Decimal,
    pub balance_status: BalanceStatus,
}

impl UserWithBalance {
    pub fn new(user: users::Model, balance: UserBalance) -> Self {
        Self {
            id: user.id,
            full_name: user.full_name,
            team_id: user.team_id,
            total_debt: balance.total_debt,
            total_credit: balance.total_credit,
            balance: balance.balance,
            balance_status: balance.balance_status,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserWithPenalties {
    pub user: UserResponse,
    pub penalties: Vec<PenaltyResponse>,
}
