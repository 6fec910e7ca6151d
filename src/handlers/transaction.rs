use crate::models::*;
use crate::services::FinancialService;
use actix_web::{web, HttpResponse, ResponseError, Result};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/transactions",
    tag = "transactions",
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction recorded", body = TransactionResponse),
        (status = 400, description = "Invalid transaction data"),
        (status = 404, description = "User not found")
    )
)]
pub async fn create_transaction(
    financial_service: web::Data<FinancialService>,
    request: web::Json<CreateTransactionRequest>,
) -> Result<HttpResponse> {
    match financial_service
        .create_transaction(request.into_inner())
        .await
    {
        Ok(transaction) => Ok(HttpResponse::Created().json(json!({
            "success": true,
            "data": transaction
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/transactions/user/{user_id}",
    tag = "transactions",
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's transactions, newest first", body = [TransactionResponse]),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_transactions(
    financial_service: web::Data<FinancialService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match financial_service.user_transactions(path.into_inner()).await {
        Ok(transactions) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": transactions
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/transactions/pay/{user_id}",
    tag = "transactions",
    request_body = PaymentRequest,
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Payment applied to open penalties, oldest first", body = PaymentResponse),
        (status = 400, description = "No open penalties, or amount too small"),
        (status = 404, description = "User not found")
    )
)]
pub async fn pay_user(
    financial_service: web::Data<FinancialService>,
    path: web::Path<i64>,
    request: web::Json<PaymentRequest>,
) -> Result<HttpResponse> {
    match financial_service
        .process_payment(path.into_inner(), request.into_inner())
        .await
    {
        Ok(payment) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": payment
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/transactions/pay-penalty/{penalty_id}",
    tag = "transactions",
    params(
        ("penalty_id" = i64, Path, description = "Penalty ID")
    ),
    responses(
        (status = 200, description = "Penalty paid and transaction recorded", body = TransactionResponse),
        (status = 400, description = "Penalty is already paid"),
        (status = 404, description = "Penalty not found")
    )
)]
pub async fn pay_penalty(
    financial_service: web::Data<FinancialService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match financial_service.pay_penalty(path.into_inner()).await {
        Ok(transaction) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": transaction
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/transactions/summary/{user_id}",
    tag = "transactions",
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "Payment summary for a user", body = PaymentSummary),
        (status = 404, description = "User not found")
    )
)]
pub async fn payment_summary(
    financial_service: web::Data<FinancialService>,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match financial_service.payment_summary(path.into_inner()).await {
        Ok(summary) => Ok(HttpResponse::Ok().json(json!({
            "success": true,
            "data": summary
        }))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn transaction_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/transactions")
            .route("", web::post().to(create_transaction))
            .route("/user/{user_id}", web::get().to(get_user_transactions))
            .route("/pay/{user_id}", web::post().to(pay_user))
            .route("/pay-penalty/{penalty_id}", web::post().to(pay_penalty))
            .route("/summary/{user_id}", web::get().to(payment_summary)),
    );
}
