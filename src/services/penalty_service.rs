use crate::entities::{penalties, users};
use crate::error::{AppError, AppResult};
use crate::models::penalty::DEFAULT_CURRENCY;
use crate::models::{CreatePenaltyRequest, PenaltyQuery, PenaltyResponse, UpdatePenaltyRequest};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, NotSet,
    QueryFilter, QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct PenaltyService {
    pool: DatabaseConnection,
}

impl PenaltyService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_penalty(&self, request: CreatePenaltyRequest) -> AppResult<PenaltyResponse> {
        request.validate()?;

        let user = users::Entity::find_by_id(request.user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("User with ID {} not found", request.user_id))
            })?;

        let penalty = penalties::ActiveModel {
            id: NotSet,
            user_id: Set(user.id),
            // Denormalized copy of the owner's team at creation time
            team_id: Set(user.team_id),
            created_date: Set(request
                .created_date
                .unwrap_or_else(|| Utc::now().date_naive())),
            reason: Set(request.reason.trim().to_string()),
            amount: Set(request.amount),
            currency: Set(request
                .currency
                .unwrap_or_else(|| DEFAULT_CURRENCY.to_string())),
            archived: Set(false),
            subject: Set(request.subject),
            paid_date: Set(None),
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Created penalty {} for user {}: {} {}",
            penalty.id,
            penalty.user_id,
            penalty.amount,
            penalty.currency
        );
        Ok(PenaltyResponse::from(penalty))
    }

    pub async fn list_penalties(&self, query: &PenaltyQuery) -> AppResult<Vec<PenaltyResponse>> {
        let mut find = penalties::Entity::find();

        if let Some(paid) = query.paid {
            find = if paid {
                find.filter(penalties::Column::PaidDate.is_not_null())
            } else {
                find.filter(penalties::Column::PaidDate.is_null())
            };
        }
        if let Some(archived) = query.archived {
            find = find.filter(penalties::Column::Archived.eq(archived));
        }

        let skip = query.skip.unwrap_or(0);
        let limit = query.limit.unwrap_or(100).clamp(1, 100);

        let penalties = find
            .order_by_asc(penalties::Column::CreatedDate)
            .order_by_asc(penalties::Column::Id)
            .offset(skip)
            .limit(limit)
            .all(&self.pool)
            .await?;

        Ok(penalties.into_iter().map(PenaltyResponse::from).collect())
    }

    pub async fn get_penalty(&self, penalty_id: i64) -> AppResult<PenaltyResponse> {
        let penalty = self.find_penalty(penalty_id).await?;
        Ok(PenaltyResponse::from(penalty))
    }

    pub async fn update_penalty(
        &self,
        penalty_id: i64,
        request: UpdatePenaltyRequest,
    ) -> AppResult<PenaltyResponse> {
        request.validate()?;
        if request.is_empty() {
            return Err(AppError::ValidationError("No fields to update".to_string()));
        }

        let mut model = self.find_penalty(penalty_id).await?.into_active_model();

        if let Some(created_date) = request.created_date {
            model.created_date = Set(created_date);
        }
        if let Some(reason) = request.reason {
            model.reason = Set(reason.trim().to_string());
        }
        if let Some(amount) = request.amount {
            model.amount = Set(amount);
        }
        if let Some(currency) = request.currency {
            model.currency = Set(currency);
        }
        if let Some(subject) = request.subject {
            model.subject = Set(Some(subject));
        }
        if let Some(archived) = request.archived {
            model.archived = Set(archived);
        }
        if let Some(paid_date) = request.paid_date {
            model.paid_date = Set(Some(paid_date));
        }

        let updated = model.update(&self.pool).await?;
        Ok(PenaltyResponse::from(updated))
    }

    pub async fn delete_penalty(&self, penalty_id: i64) -> AppResult<()> {
        let penalty = self.find_penalty(penalty_id).await?;
        penalties::Entity::delete_by_id(penalty.id)
            .exec(&self.pool)
            .await?;
        log::info!("Deleted penalty {penalty_id}");
        Ok(())
    }

    pub async fn mark_paid(&self, penalty_id: i64) -> AppResult<PenaltyResponse> {
        let penalty = self.find_penalty(penalty_id).await?;
        if penalty.is_paid() {
            return Err(AppError::ValidationError(
                "Penalty is already paid".to_string(),
            ));
        }

        let mut model = penalty.into_active_model();
        model.paid_date = Set(Some(Utc::now().date_naive()));
        let updated = model.update(&self.pool).await?;

        log::info!("Marked penalty {penalty_id} as paid");
        Ok(PenaltyResponse::from(updated))
    }

    async fn find_penalty(&self, penalty_id: i64) -> AppResult<penalties::Model> {
        penalties::Entity::find_by_id(penalty_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Penalty with ID {penalty_id} not found")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn create_request(user_id: i64) -> CreatePenaltyRequest {
        CreatePenaltyRequest {
            user_id,
            created_date: None,
            reason: "Late to training".to_string(),
            amount: dec!(5.00),
            currency: None,
            subject: None,
        }
    }

    #[tokio::test]
    async fn test_create_stamps_owner_team() {
        let (db, user_id) = setup().await;
        let service = PenaltyService::new(db);

        let penalty = service.create_penalty(create_request(user_id)).await.unwrap();
        assert_eq!(penalty.user_id, user_id);
        assert_eq!(penalty.team_id, 1);
        assert_eq!(penalty.currency, "EUR");
        assert!(!penalty.paid);
        assert!(!penalty.archived);
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_user() {
        let (db, _) = setup().await;
        let service = PenaltyService::new(db);

        let err = service.create_penalty(create_request(999)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_mark_paid_rejects_double_settle() {
        let (db, user_id) = setup().await;
        let service = PenaltyService::new(db);

        let penalty = service.create_penalty(create_request(user_id)).await.unwrap();
        let paid = service.mark_paid(penalty.id).await.unwrap();
        assert!(paid.paid);
        assert!(paid.paid_date.is_some());

        let err = service.mark_paid(penalty.id).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_list_filters_by_paid() {
        let (db, user_id) = setup().await;
        let service = PenaltyService::new(db);

        let first = service.create_penalty(create_request(user_id)).await.unwrap();
        service.create_penalty(create_request(user_id)).await.unwrap();
        service.mark_paid(first.id).await.unwrap();

        let open = service
            .list_penalties(&PenaltyQuery {
                skip: None,
                limit: None,
                paid: Some(false),
                archived: None,
            })
            .await
            .unwrap();
        assert_eq!(open.len(), 1);
        assert!(!open[0].paid);

        let paid = service
            .list_penalties(&PenaltyQuery {
                skip: None,
                limit: None,
                paid: Some(true),
                archived: None,
            })
            .await
            .unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].id, first.id);
    }
}
