use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::team::create_team,
        handlers::team::list_teams,
        handlers::user::create_user,
        handlers::user::list_users,
        handlers::user::get_user,
        handlers::user::get_user_balance,
        handlers::penalty::create_penalty,
        handlers::penalty::list_penalties,
        handlers::penalty::get_penalty,
        handlers::penalty::update_penalty,
        handlers::penalty::delete_penalty,
        handlers::penalty::mark_penalty_paid,
        handlers::penalty::penalties_summary,
        handlers::transaction::create_transaction,
        handlers::transaction::get_user_transactions,
        handlers::transaction::pay_user,
        handlers::transaction::pay_penalty,
        handlers::transaction::payment_summary,
        handlers::dashboard::get_dashboard,
    ),
    components(
        schemas(
            CreateTeamRequest,
            TeamResponse,
            CreateUserRequest,
            UserResponse,
            UserWithBalance,
            UserWithPenalties,
            CreatePenaltyRequest,
            UpdatePenaltyRequest,
            PenaltyResponse,
            BalanceStatus,
            UserBalance,
            PortfolioTotals,
            DashboardSummary,
            CreateTransactionRequest,
            PaymentRequest,
            TransactionResponse,
            PaymentResponse,
            PaymentSummary,
        )
    ),
    tags(
        (name = "teams", description = "Team management API"),
        (name = "users", description = "User management and balance API"),
        (name = "penalties", description = "Penalty CRUD and statistics API"),
        (name = "transactions", description = "Payment and transaction API"),
        (name = "dashboard", description = "Summary dashboard API"),
    ),
    info(
        title = "Balance Up API",
        version = "1.0.0",
        description = "Per-user penalty tracking with team balances"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
