use crate::entities::{penalties, transactions, users};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateTransactionRequest, PaymentRequest, PaymentResponse, PaymentSummary,
    TransactionResponse,
};
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder, Set,
};

#[derive(Clone)]
pub struct FinancialService {
    pool: DatabaseConnection,
}

impl FinancialService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_transaction(
        &self,
        request: CreateTransactionRequest,
    ) -> AppResult<TransactionResponse> {
        request.validate()?;
        self.require_user(request.user_id).await?;

        let transaction = self
            .record_transaction(request.user_id, request.amount, request.description)
            .await?;
        Ok(TransactionResponse::from(transaction))
    }

    pub async fn user_transactions(&self, user_id: i64) -> AppResult<Vec<TransactionResponse>> {
        self.require_user(user_id).await?;

        let transactions = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_desc(transactions::Column::CreatedAt)
            .all(&self.pool)
            .await?;

        Ok(transactions
            .into_iter()
            .map(TransactionResponse::from)
            .collect())
    }

    /// Apply a payment to a user's open, non-archived debt penalties,
    /// oldest first. Each penalty fully covered by the remaining amount is
    /// marked paid; partially coverable penalties are left open.
    pub async fn process_payment(
        &self,
        user_id: i64,
        request: PaymentRequest,
    ) -> AppResult<PaymentResponse> {
        request.validate()?;
        self.require_user(user_id).await?;

        let open_penalties = penalties::Entity::find()
            .filter(penalties::Column::UserId.eq(user_id))
            .filter(penalties::Column::Archived.eq(false))
            .filter(penalties::Column::PaidDate.is_null())
            .order_by_asc(penalties::Column::CreatedDate)
            .order_by_asc(penalties::Column::Id)
            .all(&self.pool)
            .await?;

        if open_penalties.is_empty() {
            return Err(AppError::PaymentError(
                "No unpaid penalties found for this user".to_string(),
            ));
        }

        let today = Utc::now().date_naive();
        let mut remaining = request.amount;
        let mut penalties_paid: u32 = 0;

        for penalty in open_penalties {
            if remaining <= Decimal::ZERO {
                break;
            }
            // Credits are not payable obligations
            if penalty.amount <= Decimal::ZERO {
                continue;
            }
            if remaining >= penalty.amount {
                remaining -= penalty.amount;
                let mut model = penalty.into_active_model();
                model.paid_date = Set(Some(today));
                model.update(&self.pool).await?;
                penalties_paid += 1;
            }
        }

        if penalties_paid == 0 {
            return Err(AppError::InsufficientFunds(
                "Payment amount too small for any penalties".to_string(),
            ));
        }

        let description = request
            .description
            .unwrap_or_else(|| format!("Payment for {penalties_paid} penalties"));
        let transaction = self
            .record_transaction(user_id, request.amount, Some(description))
            .await?;

        log::info!(
            "Processed payment of {} for user {user_id}, settled {penalties_paid} penalties",
            request.amount
        );

        Ok(PaymentResponse {
            transaction: TransactionResponse::from(transaction),
            penalties_paid,
        })
    }

    /// Pay exactly one penalty and record the matching transaction.
    pub async fn pay_penalty(&self, penalty_id: i64) -> AppResult<TransactionResponse> {
        let penalty = penalties::Entity::find_by_id(penalty_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Penalty with ID {penalty_id} not found")))?;

        if penalty.is_paid() {
            return Err(AppError::PaymentError(
                "Penalty is already paid".to_string(),
            ));
        }

        let description = format!("Payment for penalty: {}", penalty.reason);
        let user_id = penalty.user_id;
        let amount = penalty.amount;

        let mut model = penalty.into_active_model();
        model.paid_date = Set(Some(Utc::now().date_naive()));
        model.update(&self.pool).await?;

        let transaction = self
            .record_transaction(user_id, amount, Some(description))
            .await?;
        Ok(TransactionResponse::from(transaction))
    }

    pub async fn payment_summary(&self, user_id: i64) -> AppResult<PaymentSummary> {
        self.require_user(user_id).await?;

        let penalties = penalties::Entity::find()
            .filter(penalties::Column::UserId.eq(user_id))
            .filter(penalties::Column::Archived.eq(false))
            .all(&self.pool)
            .await?;
        let transactions = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .all(&self.pool)
            .await?;

        let total_penalties: Decimal = penalties.iter().map(|p| p.amount).sum();
        let paid_penalties: Decimal = penalties
            .iter()
            .filter(|p| p.is_paid())
            .map(|p| p.amount)
            .sum();
        let total_payments: Decimal = transactions.iter().map(|t| t.amount).sum();
        let last_payment_date = transactions.iter().map(|t| t.created_at).max();

        Ok(PaymentSummary {
            total_penalties: total_penalties.round_dp(2),
            paid_penalties: paid_penalties.round_dp(2),
            unpaid_penalties: (total_penalties - paid_penalties).round_dp(2),
            total_payments: total_payments.round_dp(2),
            last_payment_date,
        })
    }

    async fn require_user(&self, user_id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with ID {user_id} not found")))
    }

    async fn record_transaction(
        &self,
        user_id: i64,
        amount: Decimal,
        description: Option<String>,
    ) -> AppResult<transactions::Model> {
        let transaction = transactions::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            amount: Set(amount),
            description: Set(description),
            created_at: Set(Utc::now()),
        }
        .insert(&self.pool)
        .await?;
        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};
    use rust_decimal_macros::dec;
    use sea_orm::Database;

    async fn setup() -> (DatabaseConnection, i64) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let team = crate::entities::teams::ActiveModel {
            team_id: NotSet,
            name: Set("Firsts".to_string()),
        }
        .insert(&db)
        .await
        .unwrap();
        let user = users::ActiveModel {
            id: NotSet,
            full_name: Set("Alice Example".to_string()),
            team_id: Set(team.team_id),
        }
        .insert(&db)
        .await
        .unwrap();

        (db, user.id)
    }

    async fn insert_penalty(
        db: &DatabaseConnection,
        user_id: i64,
        amount: Decimal,
        day: u32,
    ) -> i64 {
        penalties::ActiveModel {
            id: NotSet,
            user_id: Set(user_id),
            team_id: Set(1),
            created_date: Set(NaiveDate::from_ymd_opt(2025, 3, day).unwrap()),
            reason: Set("Late to training".to_string()),
            amount: Set(amount),
            currency: Set("EUR".to_string()),
            archived: Set(false),
            subject: Set(None),
            paid_date: Set(None),
        }
        .insert(db)
        .await
        .unwrap()
        .id
    }

    fn payment(amount: Decimal) -> PaymentRequest {
        PaymentRequest {
            amount,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_payment_settles_oldest_first() {
        let (db, user_id) = setup().await;
        let oldest = insert_penalty(&db, user_id, dec!(10.00), 1).await;
        let newer = insert_penalty(&db, user_id, dec!(10.00), 5).await;

        let service = FinancialService::new(db.clone());
        let response = service.process_payment(user_id, payment(dec!(10.00))).await.unwrap();
        assert_eq!(response.penalties_paid, 1);

        let rows = penalties::Entity::find().all(&db).await.unwrap();
        let paid = rows.iter().find(|p| p.id == oldest).unwrap();
        let open = rows.iter().find(|p| p.id == newer).unwrap();
        assert!(paid.is_paid());
        assert!(!open.is_paid());
    }

    #[tokio::test]
    async fn test_payment_skips_uncoverable_penalties() {
        let (db, user_id) = setup().await;
        insert_penalty(&db, user_id, dec!(50.00), 1).await;
        let small = insert_penalty(&db, user_id, dec!(5.00), 5).await;

        let service = FinancialService::new(db.clone());
        // 20.00 cannot cover the older 50.00 penalty; the remaining budget
        // still settles the later 5.00 one
        let response = service.process_payment(user_id, payment(dec!(20.00))).await.unwrap();
        assert_eq!(response.penalties_paid, 1);

        let rows = penalties::Entity::find().all(&db).await.unwrap();
        assert!(rows.iter().find(|p| p.id == small).unwrap().is_paid());
    }

    #[tokio::test]
    async fn test_payment_too_small_errors() {
        let (db, user_id) = setup().await;
        insert_penalty(&db, user_id, dec!(50.00), 1).await;

        let service = FinancialService::new(db);
        let err = service.process_payment(user_id, payment(dec!(1.00))).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientFunds(_)));
    }

    #[tokio::test]
    async fn test_payment_without_open_penalties_errors() {
        let (db, user_id) = setup().await;
        let service = FinancialService::new(db);

        let err = service.process_payment(user_id, payment(dec!(10.00))).await.unwrap_err();
        assert!(matches!(err, AppError::PaymentError(_)));
    }

    #[tokio::test]
    async fn test_pay_penalty_records_transaction() {
        let (db, user_id) = setup().await;
        let penalty_id = insert_penalty(&db, user_id, dec!(7.50), 1).await;

        let service = FinancialService::new(db.clone());
        let transaction = service.pay_penalty(penalty_id).await.unwrap();
        assert_eq!(transaction.amount, dec!(7.50));
        assert_eq!(transaction.user_id, user_id);

        let err = service.pay_penalty(penalty_id).await.unwrap_err();
        assert!(matches!(err, AppError::PaymentError(_)));
    }

    #[tokio::test]
    async fn test_payment_summary_totals() {
        let (db, user_id) = setup().await;
        insert_penalty(&db, user_id, dec!(10.00), 1).await;
        let paid_id = insert_penalty(&db, user_id, dec!(4.00), 2).await;

        let service = FinancialService::new(db);
        service.pay_penalty(paid_id).await.unwrap();

        let summary = service.payment_summary(user_id).await.unwrap();
        assert_eq!(summary.total_penalties, dec!(14.00));
        assert_eq!(summary.paid_penalties, dec!(4.00));
        assert_eq!(summary.unpaid_penalties, dec!(10.00));
        assert_eq!(summary.total_payments, dec!(4.00));
        assert!(summary.last_payment_date.is_some());
    }
}
