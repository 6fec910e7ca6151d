use crate::models::*;
use crate::services::TeamService;
use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/teams",
    tag = "teams",
    request_body = CreateTeamRequest,
    responses(
        (status = 201, description = "Team created", body = TeamResponse),
        (status = 400, description = "Invalid or duplicate team name")
    )
)]
pub async fn create_team(
    team_service: web::Data<TeamService>,
    request: web::Json<CreateTeamRequest>,
) -> Result<HttpResponse> {
    match team_service.create_team(request.into_inner()).await {
        Ok(team) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": team
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/teams",
    tag = "teams",
    params(
        ("skip" = Option<u64>, Query, description = "Skip N teams"),
        ("limit" = Option<u64>, Query, description = "Limit the number of teams returned")
    ),
    responses(
        (status = 200, description = "List of teams", body = [TeamResponse])
    )
)]
pub async fn list_teams(
    team_service: web::Data<TeamService>,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse> {
    match team_service.list_teams(&query.into_inner()).await {
        Ok(teams) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": teams
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn team_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/teams")
            .route("", web::post().to(create_team))
            .route("", web::get().to(list_teams)),
    );
}
