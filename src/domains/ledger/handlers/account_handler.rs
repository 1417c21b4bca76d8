use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use crate::domains::auth::models::MessageResponse;
use crate::domains::ledger::models::{
    Account, AccountsResponse, CreateAccountRequest, UpdateAccountRequest,
};
use crate::shared::errors::ApiError;
use crate::shared::middleware::AuthenticatedUser;
use crate::shared::services::AppState;

#[utoipa::path(
    get,
    path = "/api/budgets/{id}/months/{month_id}/accounts",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        ("month_id" = u64, Path, description = "Month ID")
    ),
    responses(
        (status = 200, description = "Accounts of the month", body = AccountsResponse),
        (status = 404, description = "Budget or month not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Accounts"
)]
pub async fn list_accounts(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((budget_id, month_id)): Path<(u64, u64)>,
) -> Result<Json<AccountsResponse>, ApiError> {
    let accounts = app_state
        .ledger_state
        .account_service
        .list_accounts(budget_id, month_id, user.user_id)
        .await?;

    Ok(Json(AccountsResponse { accounts }))
}

#[utoipa::path(
    post,
    path = "/api/budgets/{id}/months/{month_id}/accounts",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        ("month_id" = u64, Path, description = "Month ID")
    ),
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = Account),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Requires EDITOR role"),
        (status = 404, description = "Budget or month not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Accounts"
)]
pub async fn create_account(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((budget_id, month_id)): Path<(u64, u64)>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    let account = app_state
        .ledger_state
        .account_service
        .create_account(budget_id, month_id, user.user_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(account)))
}

#[utoipa::path(
    put,
    path = "/api/budgets/{id}/accounts/{account_id}",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        ("account_id" = u64, Path, description = "Account ID")
    ),
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated", body = Account),
        (status = 403, description = "Requires EDITOR role"),
        (status = 404, description = "Budget or account not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Accounts"
)]
pub async fn update_account(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((budget_id, account_id)): Path<(u64, u64)>,
    Json(request): Json<UpdateAccountRequest>,
) -> Result<Json<Account>, ApiError> {
    let account = app_state
        .ledger_state
        .account_service
        .update_account(budget_id, account_id, user.user_id, request)
        .await?;

    Ok(Json(account))
}

#[utoipa::path(
    delete,
    path = "/api/budgets/{id}/accounts/{account_id}",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        ("account_id" = u64, Path, description = "Account ID")
    ),
    responses(
        (status = 200, description = "Account deleted", body = MessageResponse),
        (status = 403, description = "Requires EDITOR role"),
        (status = 404, description = "Budget or account not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Accounts"
)]
pub async fn delete_account(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((budget_id, account_id)): Path<(u64, u64)>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .ledger_state
        .account_service
        .delete_account(budget_id, account_id, user.user_id)
        .await?;

    Ok(Json(MessageResponse::new("Account deleted")))
}
