use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use crate::domains::auth::models::MessageResponse;
use crate::domains::ledger::models::{
    CreateMonthRequest, Month, MonthDetailResponse, MonthsResponse, RecalculationResponse,
    UpdateMonthRequest,
};
use crate::shared::errors::ApiError;
use crate::shared::middleware::AuthenticatedUser;
use crate::shared::services::AppState;

/// 월 목록 (position 순, 파생 잔액 포함)
#[utoipa::path(
    get,
    path = "/api/budgets/{id}/months",
    params(("id" = u64, Path, description = "Budget ID")),
    responses(
        (status = 200, description = "Months with derived balances", body = MonthsResponse),
        (status = 404, description = "Budget not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Months"
)]
pub async fn list_months(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(budget_id): Path<u64>,
) -> Result<Json<MonthsResponse>, ApiError> {
    let months = app_state
        .ledger_state
        .month_service
        .list_months(budget_id, user.user_id)
        .await?;

    Ok(Json(MonthsResponse { months }))
}

/// 월 상세 (계좌 + 거래)
#[utoipa::path(
    get,
    path = "/api/budgets/{id}/months/{month_id}",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        ("month_id" = u64, Path, description = "Month ID")
    ),
    responses(
        (status = 200, description = "Month with accounts and transactions", body = MonthDetailResponse),
        (status = 404, description = "Budget or month not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Months"
)]
pub async fn get_month(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((budget_id, month_id)): Path<(u64, u64)>,
) -> Result<Json<MonthDetailResponse>, ApiError> {
    let detail = app_state
        .ledger_state
        .month_service
        .get_month(budget_id, month_id, user.user_id)
        .await?;

    Ok(Json(detail))
}

/// 월 추가 (EDITOR)
/// Append a month; accounts of the previous month are copied
#[utoipa::path(
    post,
    path = "/api/budgets/{id}/months",
    params(("id" = u64, Path, description = "Budget ID")),
    request_body = CreateMonthRequest,
    responses(
        (status = 201, description = "Month created", body = Month),
        (status = 403, description = "Requires EDITOR role"),
        (status = 404, description = "Budget not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Months"
)]
pub async fn create_month(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(budget_id): Path<u64>,
    Json(request): Json<CreateMonthRequest>,
) -> Result<(StatusCode, Json<Month>), ApiError> {
    let month = app_state
        .ledger_state
        .month_service
        .create_month(budget_id, user.user_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(month)))
}

#[utoipa::path(
    put,
    path = "/api/budgets/{id}/months/{month_id}",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        ("month_id" = u64, Path, description = "Month ID")
    ),
    request_body = UpdateMonthRequest,
    responses(
        (status = 200, description = "Month updated", body = Month),
        (status = 403, description = "Requires EDITOR role"),
        (status = 404, description = "Budget or month not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Months"
)]
pub async fn update_month(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((budget_id, month_id)): Path<(u64, u64)>,
    Json(request): Json<UpdateMonthRequest>,
) -> Result<Json<Month>, ApiError> {
    let month = app_state
        .ledger_state
        .month_service
        .update_month(budget_id, month_id, user.user_id, request)
        .await?;

    Ok(Json(month))
}

#[utoipa::path(
    delete,
    path = "/api/budgets/{id}/months/{month_id}",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        ("month_id" = u64, Path, description = "Month ID")
    ),
    responses(
        (status = 200, description = "Month deleted", body = MessageResponse),
        (status = 400, description = "Cannot delete the only month"),
        (status = 403, description = "Requires EDITOR role"),
        (status = 404, description = "Budget or month not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Months"
)]
pub async fn delete_month(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((budget_id, month_id)): Path<(u64, u64)>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .ledger_state
        .month_service
        .delete_month(budget_id, month_id, user.user_id)
        .await?;

    Ok(Json(MessageResponse::new("Month deleted")))
}

/// 예산 전체 잔액 재계산 (EDITOR)
/// Recompute every derived balance of the budget
#[utoipa::path(
    post,
    path = "/api/budgets/{id}/recalculate",
    params(("id" = u64, Path, description = "Budget ID")),
    responses(
        (status = 200, description = "Recalculation report", body = RecalculationResponse),
        (status = 403, description = "Requires EDITOR role"),
        (status = 404, description = "Budget not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Months"
)]
pub async fn recalculate_budget(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(budget_id): Path<u64>,
) -> Result<Json<RecalculationResponse>, ApiError> {
    let report = app_state
        .ledger_state
        .recalculation_service
        .recalculate_budget(budget_id, user.user_id)
        .await?;

    Ok(Json(report.into()))
}
