use crate::entities::teams;
use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTeamRequest {
    pub name: String,
}

impl CreateTeamRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Team name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TeamResponse {
    pub team_id: i64,
    pub name: String,
}

impl From<teams::Model> for TeamResponse {
    fn from(team: teams::Model) -> Self {
        Self {
            team_id: team.team_id,
            name: team.name,
        }
    }
}
