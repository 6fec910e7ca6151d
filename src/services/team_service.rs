use crate::entities::teams;
use crate::error::{AppError, AppResult};
use crate::models::{CreateTeamRequest, ListQuery, TeamResponse};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter,
    QueryOrder, QuerySelect, Set,
};

#[derive(Clone)]
pub struct TeamService {
    pool: DatabaseConnection,
}

impl TeamService {
    pub fn new(pool: DatabaseConnection) -> Self {
        Self { pool }
    }

    pub async fn create_team(&self, request: CreateTeamRequest) -> AppResult<TeamResponse> {
        request.validate()?;

        let existing = teams::Entity::find()
            .filter(teams::Column::Name.eq(request.name.trim()))
            .one(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(AppError::ValidationError(format!(
                "Team '{}' already exists",
                request.name.trim()
            )));
        }

        let team = teams::ActiveModel {
            team_id: NotSet,
            name: Set(request.name.trim().to_string()),
        }
        .insert(&self.pool)
        .await?;

        log::info!("Created team {} ({})", team.team_id, team.name);
        Ok(TeamResponse::from(team))
    }

    pub async fn list_teams(&self, query: &ListQuery) -> AppResult<Vec<TeamResponse>> {
        let teams = teams::Entity::find()
            .order_by_asc(teams::Column::TeamId)
            .offset(query.get_skip())
            .limit(query.get_limit())
            .all(&self.pool)
            .await?;

        Ok(teams.into_iter().map(TeamResponse::from).collect())
    }

    pub async fn get_team(&self, team_id: i64) -> AppResult<teams::Model> {
        teams::Entity::find_by_id(team_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Team with ID {team_id} not found")))
    }
}
