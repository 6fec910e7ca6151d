use crate::entities::{penalties, teams, users};
use crate::error::{AppError, AppResult};
use crate::models::{
    CreateUserRequest, PenaltyResponse, UserResponse, UserWithBalance, UserWithPenalties,
};
use crate::services::balance::per_user_summary;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, Set,
};

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, request: CreateUserRequest) -> AppResult<UserResponse> {
        request.validate()?;

        let team = teams::Entity::find_by_id(request.team_id)
            .one(&self.pool)
            .await?;
        if team.is_none() {
            return Err(AppError::NotFound(format!(
                "Team with ID {} not found",
                request.team_id
            )));
        }

        let user = users::ActiveModel {
            id: NotSet,
            full_name: Set(request.full_name.trim().to_string()),
            team_id: Set(request.team_id),
        }
        .insert(&self.pool)
        .await?;

        log::info!("Created user {} ({})", user.id, user.full_name);
        Ok(UserResponse::from(user))
    }

    /// The per-user summary table: every user in insertion order, flattened
    /// with its computed balance.
    pub async fn list_users_with_balances(&self) -> AppResult<Vec<UserWithBalance>> {
        let users = users::Entity::find()
            .order_by_asc(users::Column::Id)
            .all(&self.pool)
            .await?;
        let penalties = penalties::Entity::find().all(&self.pool).await?;

        let balances = per_user_summary(&users, &penalties);
        Ok(users
            .into_iter()
            .zip(balances)
            .map(|(user, balance)| UserWithBalance::new(user, balance))
            .collect())
    }

    pub async fn get_user(&self, user_id: i64) -> AppResult<users::Model> {
        users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with ID {user_id} not found")))
    }

    pub async fn get_user_with_penalties(&self, user_id: i64) -> AppResult<UserWithPenalties> {
        let user = self.get_user(user_id).await?;

        let penalties = penalties::Entity::find()
            .filter(penalties::Column::UserId.eq(user_id))
            .order_by_asc(penalties::Column::CreatedDate)
            .all(&self.pool)
            .await?;

        Ok(UserWithPenalties {
            user: UserResponse::from(user),
            penalties: penalties.into_iter().map(PenaltyResponse::from).collect(),
        })
    }
}
