use crate::models::*;
use crate::services::{BalanceService, UserService};
use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid user data"),
        (status = 404, description = "Team not found")
    )
)]
pub async fn create_user(
    user_service: web::Data<UserService>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse> {
    match user_service.create_user(request.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Users with computed balances, in insertion order", body = [UserWithBalance])
    )
)]
pub async fn list_users(user_service: web::Data<UserService>) -> Result<HttpResponse> {
    match user_service.list_users_with_balances().await {
        Ok(users) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": users
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User with its penalties", body = UserWithPenalties),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    user_service: web::Data<UserService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match user_service.get_user_with_penalties(path.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": user
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/users/{id}/balance",
    tag = "users",
    params(
        ("id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Computed balance for one user", body = UserBalance),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_balance(
    user_service: web::Data<UserService>,
    balance_service: web::Data<BalanceService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = path.into_inner();
    // 404 for unknown users; the aggregator itself would just return zeros
    if let Err(e) = user_service.get_user(user_id).await {
        return Ok(e.error_response());
    }
    match balance_service.user_balance(user_id).await {
        Ok(balance) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": balance
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/users")
            .route("", web::post().to(create_user))
            .route("", web::get().to(list_users))
            .route("/{id}", web::get().to(get_user))
            .route("/{id}/balance", web::get().to(get_user_balance)),
    );
}
