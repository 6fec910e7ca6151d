//! Penalty balance aggregation.
//!
//! Pure functions over snapshots of penalty rows. All monetary arithmetic is
//! `rust_decimal`, results are rounded to 2 decimal places on the way out so
//! the presentation layer only formats finished values. Archived penalties
//! never contribute to any total.

use crate::entities::{penalties, users};
use crate::error::AppResult;
use crate::models::{
    BalanceStatus, DashboardSummary, PortfolioTotals, UserBalance, UserWithBalance,
};
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

const MONEY_SCALE: u32 = 2;

fn is_active(penalty: &penalties::Model) -> bool {
    !penalty.archived
}

/// Net position of one user over the given penalty snapshot.
///
/// Rows belonging to other users and archived rows are ignored. Positive
/// amounts accumulate into `total_debt`, negative amounts into
/// `total_credit` (as a positive magnitude). Empty input yields the all-zero
/// settled balance.
pub fn compute_user_balance(penalties: &[penalties::Model], user_id: i64) -> UserBalance {
    let mut total_debt = Decimal::ZERO;
    let mut total_credit = Decimal::ZERO;

    for penalty in penalties
        .iter()
        .filter(|p| is_active(p) && p.user_id == user_id)
    {
        if penalty.amount > Decimal::ZERO {
            total_debt += penalty.amount;
        } else {
            total_credit += -penalty.amount;
        }
    }

    let total_debt = total_debt.round_dp(MONEY_SCALE);
    let total_credit = total_credit.round_dp(MONEY_SCALE);
    let balance = total_debt - total_credit;

    UserBalance {
        user_id,
        total_debt,
        total_credit,
        balance,
        balance_status: BalanceStatus::from_balance(balance),
    }
}

/// Portfolio-wide counts and sums, partitioned into open and paid penalties.
pub fn compute_portfolio_totals(penalties: &[penalties::Model]) -> PortfolioTotals {
    let mut totals = PortfolioTotals {
        total_open_count: 0,
        total_open_sum: Decimal::ZERO,
        total_paid_count: 0,
        total_paid_sum: Decimal::ZERO,
    };

    for penalty in penalties.iter().filter(|p| is_active(p)) {
        if penalty.is_paid() {
            totals.total_paid_count += 1;
            totals.total_paid_sum += penalty.amount;
        } else {
            totals.total_open_count += 1;
            totals.total_open_sum += penalty.amount;
        }
    }

    totals.total_open_sum = totals.total_open_sum.round_dp(MONEY_SCALE);
    totals.total_paid_sum = totals.total_paid_sum.round_dp(MONEY_SCALE);
    totals
}

/// One balance per user, in the caller-supplied user order. Users without
/// penalties appear with a zero balance, never omitted.
pub fn per_user_summary(
    users: &[users::Model],
    penalties: &[penalties::Model],
) -> Vec<UserBalance> {
    users
        .iter()
        .map(|user| compute_user_balance(penalties, user.id))
        .collect()
}

/// Fetches row snapshots and hands them to the pure aggregation functions.
#[derive(Clone)]
pub struct BalanceService {
    pool: DatabaseConnection,
}

impl BalanceService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn user_balance(&self, user_id: i64) -> AppResult<UserBalance> {
        let penalties = penalties::Entity::find().all(&self.pool).await?;
        Ok(compute_user_balance(&penalties, user_id))
    }

    pub async fn portfolio_totals(&self) -> AppResult<PortfolioTotals> {
        let penalties = penalties::Entity::find().all(&self.pool).await?;
        Ok(compute_portfolio_totals(&penalties))
    }

    pub async fn dashboard(&self) -> AppResult<DashboardSummary> {
        let users = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.pool)
            .await?;
        let penalties = penalties::Entity::find().all(&self.pool).await?;

        let totals = compute_portfolio_totals(&penalties);
        let balances = per_user_summary(&users, &penalties);
        let users = users
            .into_iter()
            .zip(balances)
            .map(|(user, balance)| UserWithBalance::new(user, balance))
            .collect();

        Ok(DashboardSummary { totals, users })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, day).unwrap()
    }

    fn penalty(id: i64, user_id: i64, amount: Decimal) -> penalties::Model {
        penalties::Model {
            id,
            user_id,
            team_id: 1,
            created_date: date(1),
            reason: "Late to training".to_string(),
            amount,
            currency: "EUR".to_string(),
            archived: false,
            subject: None,
            paid_date: None,
        }
    }

    fn paid_penalty(id: i64, user_id: i64, amount: Decimal) -> penalties::Model {
        penalties::Model {
            paid_date: Some(date(10)),
            ..penalty(id, user_id, amount)
        }
    }

    fn archived_penalty(id: i64, user_id: i64, amount: Decimal) -> penalties::Model {
        penalties::Model {
            archived: true,
            ..penalty(id, user_id, amount)
        }
    }

    fn user(id: i64, name: &str) -> users::Model {
        users::Model {
            id,
            full_name: name.to_string(),
            team_id: 1,
        }
    }

    #[test]
    fn test_debt_only_balance() {
        let penalties = vec![
            penalty(1, 1, dec!(10.00)),
            penalty(2, 1, dec!(2.50)),
            penalty(3, 1, dec!(0.75)),
        ];
        let balance = compute_user_balance(&penalties, 1);
        assert_eq!(balance.total_debt, dec!(13.25));
        assert_eq!(balance.total_credit, dec!(0.00));
        assert_eq!(balance.balance, dec!(13.25));
        assert_eq!(balance.balance_status, BalanceStatus::Overdue);
    }

    #[test]
    fn test_debt_and_credit_balance() {
        let penalties = vec![penalty(1, 1, dec!(100.00)), penalty(2, 1, dec!(-40.00))];
        let balance = compute_user_balance(&penalties, 1);
        assert_eq!(balance.total_debt, dec!(100.00));
        assert_eq!(balance.total_credit, dec!(40.00));
        assert_eq!(balance.balance, dec!(60.00));
        assert_eq!(balance.balance_status, BalanceStatus::Overdue);
    }

    #[test]
    fn test_settled_balance() {
        let penalties = vec![penalty(1, 1, dec!(50.00)), penalty(2, 1, dec!(-50.00))];
        let balance = compute_user_balance(&penalties, 1);
        assert_eq!(balance.balance, dec!(0.00));
        assert_eq!(balance.balance_status, BalanceStatus::Settled);
    }

    #[test]
    fn test_net_creditor_balance() {
        let penalties = vec![penalty(1, 1, dec!(10.00)), penalty(2, 1, dec!(-25.00))];
        let balance = compute_user_balance(&penalties, 1);
        assert_eq!(balance.balance, dec!(-15.00));
        assert_eq!(balance.balance_status, BalanceStatus::Credit);
    }

    #[test]
    fn test_empty_input_is_settled_zero() {
        let balance = compute_user_balance(&[], 7);
        assert_eq!(balance, UserBalance::zero(7));
    }

    #[test]
    fn test_other_users_ignored() {
        let penalties = vec![penalty(1, 1, dec!(10.00)), penalty(2, 2, dec!(99.00))];
        let balance = compute_user_balance(&penalties, 1);
        assert_eq!(balance.total_debt, dec!(10.00));
    }

    #[test]
    fn test_archived_never_contributes() {
        let mut penalties = vec![
            penalty(1, 1, dec!(10.00)),
            paid_penalty(2, 1, dec!(5.00)),
        ];
        let balance_before = compute_user_balance(&penalties, 1);
        let totals_before = compute_portfolio_totals(&penalties);

        penalties.push(archived_penalty(3, 1, dec!(1000.00)));
        penalties.push(archived_penalty(4, 1, dec!(-1000.00)));

        assert_eq!(compute_user_balance(&penalties, 1), balance_before);
        assert_eq!(compute_portfolio_totals(&penalties), totals_before);
    }

    #[test]
    fn test_portfolio_totals_partition() {
        let penalties = vec![
            penalty(1, 1, dec!(10.00)),
            penalty(2, 2, dec!(5.50)),
            paid_penalty(3, 1, dec!(7.25)),
        ];
        let totals = compute_portfolio_totals(&penalties);
        assert_eq!(totals.total_open_count, 2);
        assert_eq!(totals.total_open_sum, dec!(15.50));
        assert_eq!(totals.total_paid_count, 1);
        assert_eq!(totals.total_paid_sum, dec!(7.25));
    }

    #[test]
    fn test_portfolio_totals_additive_over_batches() {
        let batch_a = vec![penalty(1, 1, dec!(10.00)), paid_penalty(2, 2, dec!(3.00))];
        let batch_b = vec![penalty(3, 3, dec!(0.10)), paid_penalty(4, 1, dec!(8.90))];
        let combined: Vec<_> = batch_a.iter().chain(batch_b.iter()).cloned().collect();

        let a = compute_portfolio_totals(&batch_a);
        let b = compute_portfolio_totals(&batch_b);
        let whole = compute_portfolio_totals(&combined);

        assert_eq!(whole.total_open_count, a.total_open_count + b.total_open_count);
        assert_eq!(whole.total_paid_count, a.total_paid_count + b.total_paid_count);
        assert_eq!(whole.total_open_sum, a.total_open_sum + b.total_open_sum);
        assert_eq!(whole.total_paid_sum, a.total_paid_sum + b.total_paid_sum);
    }

    #[test]
    fn test_summary_table_preserves_order_and_length() {
        let users = vec![user(3, "Carol"), user(1, "Alice"), user(2, "Bob")];
        let penalties = vec![penalty(1, 1, dec!(10.00))];

        let table = per_user_summary(&users, &penalties);
        assert_eq!(table.len(), users.len());
        assert_eq!(table[0].user_id, 3);
        assert_eq!(table[1].user_id, 1);
        assert_eq!(table[2].user_id, 2);

        // Zero-penalty users appear with zero balances
        assert_eq!(table[0], UserBalance::zero(3));
        assert_eq!(table[1].balance, dec!(10.00));
    }

    #[test]
    fn test_aggregation_is_idempotent() {
        let users = vec![user(1, "Alice"), user(2, "Bob")];
        let penalties = vec![
            penalty(1, 1, dec!(12.34)),
            penalty(2, 2, dec!(-0.99)),
            paid_penalty(3, 1, dec!(4.00)),
        ];

        assert_eq!(
            compute_user_balance(&penalties, 1),
            compute_user_balance(&penalties, 1)
        );
        assert_eq!(
            compute_portfolio_totals(&penalties),
            compute_portfolio_totals(&penalties)
        );
        assert_eq!(
            per_user_summary(&users, &penalties),
            per_user_summary(&users, &penalties)
        );
    }

    #[test]
    fn test_sums_stay_exact_over_many_cents() {
        // 0.10 a thousand times is exactly 100.00, which floats get wrong
        let penalties: Vec<_> = (0..1000)
            .map(|i| penalty(i, 1, dec!(0.10)))
            .collect();
        let balance = compute_user_balance(&penalties, 1);
        assert_eq!(balance.total_debt, dec!(100.00));
        assert_eq!(balance.balance, dec!(100.00));
    }
}
