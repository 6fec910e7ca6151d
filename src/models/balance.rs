use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Presentation tag derived from the net balance, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BalanceStatus {
    /// Net debtor, balance > 0
    Overdue,
    /// Balance is exactly zero
    Settled,
    /// Net creditor, balance < 0
    Credit,
}

impl BalanceStatus {
    pub fn from_balance(balance: Decimal) -> Self {
        if balance > Decimal::ZERO {
            BalanceStatus::Overdue
        } else if balance < Decimal::ZERO {
            BalanceStatus::Credit
        } else {
            BalanceStatus::Settled
        }
    }
}

/// Per-user financial summary over non-archived penalties.
///
/// `balance` is the net signed amount (debt minus credit); display layers
/// may take the absolute value, this type never does.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserBalance {
    pub user_id: i64,
    pub total_debt: Decimal,
    pub total_credit: Decimal,
    pub balance: Decimal,
    pub balance_status: BalanceStatus,
}

impl UserBalance {
    pub fn zero(user_id: i64) -> Self {
        Self {
            user_id,
            total_debt: Decimal::ZERO,
            total_credit: Decimal::ZERO,
            balance: Decimal::ZERO,
            balance_status: BalanceStatus::Settled,
        }
    }
}

/// Portfolio-wide counts and sums, split by paid/open status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PortfolioTotals {
    pub total_open_count: u64,
    pub total_open_sum: Decimal,
    pub total_paid_count: u64,
    pub total_paid_sum: Decimal,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardSummary {
    pub totals: PortfolioTotals,
    pub users: Vec<super::UserWithBalance>,
}
