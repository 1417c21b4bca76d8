use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use crate::domains::auth::models::MessageResponse;
use crate::domains::ledger::models::{
    CreateTransactionRequest, Transaction, TransactionsResponse, UpdateTransactionRequest,
};
use crate::shared::errors::ApiError;
use crate::shared::middleware::AuthenticatedUser;
use crate::shared::services::AppState;

/// 월의 거래 목록 (날짜 오름차순, 같은 날짜는 금액 내림차순)
#[utoipa::path(
    get,
    path = "/api/budgets/{id}/months/{month_id}/transactions",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        ("month_id" = u64, Path, description = "Month ID")
    ),
    responses(
        (status = 200, description = "Transactions in running-balance order", body = TransactionsResponse),
        (status = 404, description = "Budget or month not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Transactions"
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((budget_id, month_id)): Path<(u64, u64)>,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let transactions = app_state
        .ledger_state
        .transaction_service
        .list_transactions(budget_id, month_id, user.user_id)
        .await?;

    Ok(Json(TransactionsResponse { transactions }))
}

#[utoipa::path(
    post,
    path = "/api/budgets/{id}/months/{month_id}/transactions",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        ("month_id" = u64, Path, description = "Month ID")
    ),
    request_body = CreateTransactionRequest,
    responses(
        (status = 201, description = "Transaction created", body = Transaction),
        (status = 400, description = "Empty description or invalid date"),
        (status = 403, description = "Requires EDITOR role"),
        (status = 404, description = "Budget or month not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Transactions"
)]
pub async fn create_transaction(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((budget_id, month_id)): Path<(u64, u64)>,
    Json(request): Json<CreateTransactionRequest>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let transaction = app_state
        .ledger_state
        .transaction_service
        .create_transaction(budget_id, month_id, user.user_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(transaction)))
}

#[utoipa::path(
    put,
    path = "/api/budgets/{id}/transactions/{transaction_id}",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        ("transaction_id" = u64, Path, description = "Transaction ID")
    ),
    request_body = UpdateTransactionRequest,
    responses(
        (status = 200, description = "Transaction updated", body = Transaction),
        (status = 400, description = "Empty description or invalid date"),
        (status = 403, description = "Requires EDITOR role"),
        (status = 404, description = "Budget or transaction not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Transactions"
)]
pub async fn update_transaction(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((budget_id, transaction_id)): Path<(u64, u64)>,
    Json(request): Json<UpdateTransactionRequest>,
) -> Result<Json<Transaction>, ApiError> {
    let transaction = app_state
        .ledger_state
        .transaction_service
        .update_transaction(budget_id, transaction_id, user.user_id, request)
        .await?;

    Ok(Json(transaction))
}

#[utoipa::path(
    delete,
    path = "/api/budgets/{id}/transactions/{transaction_id}",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        ("transaction_id" = u64, Path, description = "Transaction ID")
    ),
    responses(
        (status = 200, description = "Transaction deleted", body = MessageResponse),
        (status = 403, description = "Requires EDITOR role"),
        (status = 404, description = "Budget or transaction not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Transactions"
)]
pub async fn delete_transaction(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((budget_id, transaction_id)): Path<(u64, u64)>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .ledger_state
        .transaction_service
        .delete_transaction(budget_id, transaction_id, user.user_id)
        .await?;

    Ok(Json(MessageResponse::new("Transaction deleted")))
}
