use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use budget_api::routes::create_router;
use budget_api::shared::clients::mailer_from_config;
use budget_api::shared::config::AppConfig;
use budget_api::shared::database::Database;
use budget_api::shared::services::AppState;

// Import models for OpenAPI schema
use budget_api::domains::audit::models::{
    AuditAction, AuditLog, AuditLogsResponse, AuditQuery, EntityType,
};
use budget_api::domains::auth::models::{
    MessageResponse, RefreshTokenRequest, RefreshTokenResponse, SigninRequest, SigninResponse,
    SignupRequest, SignupResponse, TokenPair, UserResponse,
};
use budget_api::domains::budget::models::{
    Budget, BudgetInvite, BudgetMember, BudgetSummary, BudgetsResponse, CreateBudgetRequest,
    CreateInviteRequest, InviteStatus, InviteTokenRequest, InvitesResponse, MembersResponse, Role,
    UpdateBudgetRequest, UpdateMemberRequest,
};
use budget_api::domains::ledger::models::{
    Account, AccountsResponse, CreateAccountRequest, CreateMonthRequest, CreateTransactionRequest,
    Month, MonthDetailResponse, MonthsResponse, RecalculationResponse, Transaction,
    TransactionsResponse, UpdateAccountRequest, UpdateMonthRequest, UpdateTransactionRequest,
};

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        budget_api::domains::auth::handlers::auth_handler::signup,
        budget_api::domains::auth::handlers::auth_handler::signin,
        budget_api::domains::auth::handlers::auth_handler::refresh,
        budget_api::domains::auth::handlers::auth_handler::logout,
        budget_api::domains::auth::handlers::auth_handler::logout_all,
        budget_api::domains::auth::handlers::auth_handler::get_me,
        budget_api::domains::budget::handlers::budget_handler::create_budget,
        budget_api::domains::budget::handlers::budget_handler::list_budgets,
        budget_api::domains::budget::handlers::budget_handler::get_budget,
        budget_api::domains::budget::handlers::budget_handler::update_budget,
        budget_api::domains::budget::handlers::budget_handler::delete_budget,
        budget_api::domains::budget::handlers::member_handler::list_members,
        budget_api::domains::budget::handlers::member_handler::update_member,
        budget_api::domains::budget::handlers::member_handler::remove_member,
        budget_api::domains::budget::handlers::invite_handler::create_invite,
        budget_api::domains::budget::handlers::invite_handler::list_invites,
        budget_api::domains::budget::handlers::invite_handler::revoke_invite,
        budget_api::domains::budget::handlers::invite_handler::accept_invite,
        budget_api::domains::budget::handlers::invite_handler::decline_invite,
        budget_api::domains::ledger::handlers::month_handler::list_months,
        budget_api::domains::ledger::handlers::month_handler::get_month,
        budget_api::domains::ledger::handlers::month_handler::create_month,
        budget_api::domains::ledger::handlers::month_handler::update_month,
        budget_api::domains::ledger::handlers::month_handler::delete_month,
        budget_api::domains::ledger::handlers::month_handler::recalculate_budget,
        budget_api::domains::ledger::handlers::account_handler::list_accounts,
        budget_api::domains::ledger::handlers::account_handler::create_account,
        budget_api::domains::ledger::handlers::account_handler::update_account,
        budget_api::domains::ledger::handlers::account_handler::delete_account,
        budget_api::domains::ledger::handlers::transaction_handler::list_transactions,
        budget_api::domains::ledger::handlers::transaction_handler::create_transaction,
        budget_api::domains::ledger::handlers::transaction_handler::update_transaction,
        budget_api::domains::ledger::handlers::transaction_handler::delete_transaction,
        budget_api::domains::audit::handlers::audit_handler::list_audit_logs,
        budget_api::domains::realtime::handlers::ws_handler::ws_handler
    ),
    components(schemas(
        SignupRequest,
        SignupResponse,
        SigninRequest,
        SigninResponse,
        TokenPair,
        RefreshTokenRequest,
        RefreshTokenResponse,
        MessageResponse,
        UserResponse,
        Role,
        Budget,
        BudgetSummary,
        BudgetsResponse,
        CreateBudgetRequest,
        UpdateBudgetRequest,
        BudgetMember,
        MembersResponse,
        UpdateMemberRequest,
        InviteStatus,
        BudgetInvite,
        CreateInviteRequest,
        InviteTokenRequest,
        InvitesResponse,
        Month,
        MonthsResponse,
        MonthDetailResponse,
        CreateMonthRequest,
        UpdateMonthRequest,
        RecalculationResponse,
        Account,
        AccountsResponse,
        CreateAccountRequest,
        UpdateAccountRequest,
        Transaction,
        TransactionsResponse,
        CreateTransactionRequest,
        UpdateTransactionRequest,
        AuditAction,
        EntityType,
        AuditLog,
        AuditQuery,
        AuditLogsResponse
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Auth", description = "Authentication API endpoints"),
        (name = "Budgets", description = "Budget API endpoints"),
        (name = "Members", description = "Budget membership and roles"),
        (name = "Invites", description = "Email invitations"),
        (name = "Months", description = "Months and balance recalculation"),
        (name = "Accounts", description = "Accounts within a month"),
        (name = "Transactions", description = "Transactions within a month"),
        (name = "Audit", description = "Audit log"),
        (name = "Realtime", description = "WebSocket change feed")
    ),
    info(
        title = "Budget API Server",
        description = "Shared household budgeting API with month-chained balances",
        version = "1.0.0"
    )
)]
struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 로깅 초기화 (RUST_LOG 우선)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,budget_api=debug")),
        )
        .init();

    // 설정 로드 (.env 포함)
    let config = AppConfig::from_env()?;

    // DB 연결 + 마이그레이션
    let db = Database::connect(&config.database_url, config.database_max_connections).await?;
    db.initialize().await?;

    // 메일 클라이언트 (엔드포인트가 없으면 로그 전용)
    let mailer = mailer_from_config(&config)?;

    // AppState 생성 (모든 Service 초기화)
    let app_state = AppState::new(db, config.clone(), mailer);

    // 만료 토큰 정리 스케줄러 시작
    app_state.auth_state.token_cleanup_scheduler.start();

    // CORS 설정
    let origin = config
        .cors_origin
        .parse::<HeaderValue>()
        .with_context(|| format!("Invalid CORS_ORIGIN: {}", config.cors_origin))?;
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true);

    // Router 생성
    let app = Router::new()
        .merge(create_router())
        .merge(
            SwaggerUi::new("/api")
                .url("/api-docs/openapi.json", ApiDoc::openapi())
        )
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // 서버 시작
    let listener = TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!(addr = %config.bind_addr, "server running");
    tracing::info!("Swagger UI available at /api");

    // 서버 실행
    axum::serve(listener, app).await?;

    Ok(())
}
