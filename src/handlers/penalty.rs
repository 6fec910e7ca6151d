use crate::models::*;
use crate::services::{BalanceService, PenaltyService};
use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/penalties",
    tag = "penalties",
    request_body = CreatePenaltyRequest,
    responses(
        (status = 201, description = "Penalty created", body = PenaltyResponse),
        (status = 400, description = "Invalid penalty data"),
        (status = 404, description = "User not found")
    )
)]
pub async fn create_penalty(
    penalty_service: web::Data<PenaltyService>,
    request: web::Json<CreatePenaltyRequest>,
) -> Result<HttpResponse> {
    match penalty_service.create_penalty(request.into_inner()).await {
        Ok(penalty) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": penalty
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/penalties",
    tag = "penalties",
    params(
        ("skip" = Option<u64>, Query, description = "Skip N penalties"),
        ("limit" = Option<u64>, Query, description = "Limit the number of penalties returned"),
        ("paid" = Option<bool>, Query, description = "Filter by paid status"),
        ("archived" = Option<bool>, Query, description = "Filter by archived flag")
    ),
    responses(
        (status = 200, description = "List of penalties", body = [PenaltyResponse])
    )
)]
pub async fn list_penalties(
    penalty_service: web::Data<PenaltyService>,
    query: web::Query<PenaltyQuery>,
) -> Result<HttpResponse> {
    match penalty_service.list_penalties(&query.into_inner()).await {
        Ok(penalties) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": penalties
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/penalties/{id}",
    tag = "penalties",
    params(
        ("id" = i64, Path, description = "Penalty ID")
    ),
    responses(
        (status = 200, description = "Penalty details", body = PenaltyResponse),
        (status = 404, description = "Penalty not found")
    )
)]
pub async fn get_penalty(
    penalty_service: web::Data<PenaltyService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match penalty_service.get_penalty(path.into_inner()).await {
        Ok(penalty) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": penalty
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/penalties/{id}",
    tag = "penalties",
    request_body = UpdatePenaltyRequest,
    params(
        ("id" = i64, Path, description = "Penalty ID")
    ),
    responses(
        (status = 200, description = "Penalty updated", body = PenaltyResponse),
        (status = 400, description = "Invalid update"),
        (status = 404, description = "Penalty not found")
    )
)]
pub async fn update_penalty(
    penalty_service: web::Data<PenaltyService>,
    path: web::Path<i64>,
    request: web::Json<UpdatePenaltyRequest>,
) -> Result<HttpResponse> {
    match penalty_service
        .update_penalty(path.into_inner(), request.into_inner())
        .await
    {
        Ok(penalty) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": penalty
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/penalties/{id}",
    tag = "penalties",
    params(
        ("id" = i64, Path, description = "Penalty ID")
    ),
    responses(
        (status = 204, description = "Penalty deleted"),
        (status = 404, description = "Penalty not found")
    )
)]
pub async fn delete_penalty(
    penalty_service: web::Data<PenaltyService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match penalty_service.delete_penalty(path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/penalties/{id}/mark-paid",
    tag = "penalties",
    params(
        ("id" = i64, Path, description = "Penalty ID")
    ),
    responses(
        (status = 200, description = "Penalty marked as paid", body = PenaltyResponse),
        (status = 400, description = "Penalty is already paid"),
        (status = 404, description = "Penalty not found")
    )
)]
pub async fn mark_penalty_paid(
    penalty_service: web::Data<PenaltyService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match penalty_service.mark_paid(path.into_inner()).await {
        Ok(penalty) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": penalty
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/penalties/statistics/summary",
    tag = "penalties",
    responses(
        (status = 200, description = "Portfolio-wide open/paid counts and sums", body = PortfolioTotals)
    )
)]
pub async fn penalties_summary(balance_service: web::Data<BalanceService>) -> Result<HttpResponse> {
    match balance_service.portfolio_totals().await {
        Ok(totals) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": totals
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn penalty_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/penalties")
            .route("", web::post().to(create_penalty))
            .route("", web::get().to(list_penalties))
            .route("/statistics/summary", web::get().to(penalties_summary))
            .route("/{id}", web::get().to(get_penalty))
            .route("/{id}", web::put().to(update_penalty))
            .route("/{id}", web::delete().to(delete_penalty))
            .route("/{id}/mark-paid", web::post().to(mark_penalty_paid)),
    );
}
