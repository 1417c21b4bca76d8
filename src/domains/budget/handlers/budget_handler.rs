use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use crate::domains::auth::models::MessageResponse;
use crate::domains::budget::models::{
    Budget, BudgetSummary, BudgetsResponse, CreateBudgetRequest, UpdateBudgetRequest,
};
use crate::shared::errors::ApiError;
use crate::shared::middleware::AuthenticatedUser;
use crate::shared::services::AppState;

/// 예산 생성
/// Create budget
///
/// 호출자가 OWNER가 되고 첫 달이 함께 생성됩니다.
#[utoipa::path(
    post,
    path = "/api/budgets",
    request_body = CreateBudgetRequest,
    responses(
        (status = 201, description = "Budget created", body = BudgetSummary),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Unauthorized"),
    ),
    security(("BearerAuth" = [])),
    tag = "Budgets"
)]
pub async fn create_budget(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<CreateBudgetRequest>,
) -> Result<(StatusCode, Json<BudgetSummary>), ApiError> {
    let budget = app_state
        .budget_state
        .budget_service
        .create_budget(user.user_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(budget)))
}

/// 내 예산 목록
/// List budgets of the caller
#[utoipa::path(
    get,
    path = "/api/budgets",
    responses(
        (status = 200, description = "Budgets with the caller's role", body = BudgetsResponse),
        (status = 401, description = "Unauthorized"),
    ),
    security(("BearerAuth" = [])),
    tag = "Budgets"
)]
pub async fn list_budgets(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<BudgetsResponse>, ApiError> {
    let budgets = app_state
        .budget_state
        .budget_service
        .list_budgets(user.user_id)
        .await?;

    Ok(Json(BudgetsResponse { budgets }))
}

#[utoipa::path(
    get,
    path = "/api/budgets/{id}",
    params(("id" = u64, Path, description = "Budget ID")),
    responses(
        (status = 200, description = "Budget", body = BudgetSummary),
        (status = 404, description = "Budget not found or caller is not a member"),
    ),
    security(("BearerAuth" = [])),
    tag = "Budgets"
)]
pub async fn get_budget(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(budget_id): Path<u64>,
) -> Result<Json<BudgetSummary>, ApiError> {
    let budget = app_state
        .budget_state
        .budget_service
        .get_budget(budget_id, user.user_id)
        .await?;

    Ok(Json(budget))
}

/// 예산 이름 변경 (OWNER)
#[utoipa::path(
    put,
    path = "/api/budgets/{id}",
    params(("id" = u64, Path, description = "Budget ID")),
    request_body = UpdateBudgetRequest,
    responses(
        (status = 200, description = "Budget renamed", body = Budget),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Requires OWNER role"),
        (status = 404, description = "Budget not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Budgets"
)]
pub async fn update_budget(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(budget_id): Path<u64>,
    Json(request): Json<UpdateBudgetRequest>,
) -> Result<Json<Budget>, ApiError> {
    let budget = app_state
        .budget_state
        .budget_service
        .rename_budget(budget_id, user.user_id, request)
        .await?;

    Ok(Json(budget))
}

/// 예산 삭제 (OWNER)
#[utoipa::path(
    delete,
    path = "/api/budgets/{id}",
    params(("id" = u64, Path, description = "Budget ID")),
    responses(
        (status = 200, description = "Budget deleted", body = MessageResponse),
        (status = 403, description = "Requires OWNER role"),
        (status = 404, description = "Budget not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Budgets"
)]
pub async fn delete_budget(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(budget_id): Path<u64>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .budget_state
        .budget_service
        .delete_budget(budget_id, user.user_id)
        .await?;

    Ok(Json(MessageResponse::new("Budget deleted")))
}
