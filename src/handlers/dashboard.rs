use crate::models::*;
use crate::services::BalanceService;
use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Portfolio totals plus the per-user summary table", body = DashboardSummary)
    )
)]
pub async fn get_dashboard(balance_service: web::Data<BalanceService>) -> Result<HttpResponse> {
    match balance_service.dashboard().await {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn dashboard_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/dashboard").route("", web::get().to(get_dashboard)));
}
