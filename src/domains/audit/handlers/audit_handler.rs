use axum::{
    extract::{Path, Query, State},
    Json,
};
use crate::domains::audit::models::{AuditLogsResponse, AuditQuery};
use crate::shared::errors::ApiError;
use crate::shared::middleware::AuthenticatedUser;
use crate::shared::services::AppState;

/// 예산 감사 로그 조회 (최신순)
/// List audit logs of a budget, newest first
///
/// # Query Parameters
/// - limit: 기본 50, 최대 200
/// - offset: 건너뛸 개수
/// - entity_type: budget | member | invite | month | account | transaction
#[utoipa::path(
    get,
    path = "/api/budgets/{id}/audit",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        AuditQuery
    ),
    responses(
        (status = 200, description = "Audit logs", body = AuditLogsResponse),
        (status = 400, description = "Unknown entity_type"),
        (status = 404, description = "Budget not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Audit"
)]
pub async fn list_audit_logs(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(budget_id): Path<u64>,
    Query(query): Query<AuditQuery>,
) -> Result<Json<AuditLogsResponse>, ApiError> {
    let logs = app_state
        .audit_state
        .audit_service
        .list(budget_id, user.user_id, &query)
        .await?;

    Ok(Json(AuditLogsResponse { logs }))
}
