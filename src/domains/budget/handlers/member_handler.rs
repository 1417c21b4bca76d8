use axum::{
    extract::{Path, State},
    Json,
};
use crate::domains::auth::models::MessageResponse;
use crate::domains::budget::models::{BudgetMember, MembersResponse, UpdateMemberRequest};
use crate::shared::errors::ApiError;
use crate::shared::middleware::AuthenticatedUser;
use crate::shared::services::AppState;

#[utoipa::path(
    get,
    path = "/api/budgets/{id}/members",
    params(("id" = u64, Path, description = "Budget ID")),
    responses(
        (status = 200, description = "Budget members", body = MembersResponse),
        (status = 404, description = "Budget not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Members"
)]
pub async fn list_members(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(budget_id): Path<u64>,
) -> Result<Json<MembersResponse>, ApiError> {
    let members = app_state
        .budget_state
        .member_service
        .list_members(budget_id, user.user_id)
        .await?;

    Ok(Json(MembersResponse { members }))
}

/// 멤버 역할 변경 (OWNER)
/// Change a member's role; the last OWNER cannot be demoted
#[utoipa::path(
    put,
    path = "/api/budgets/{id}/members/{user_id}",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        ("user_id" = u64, Path, description = "Member user ID")
    ),
    request_body = UpdateMemberRequest,
    responses(
        (status = 200, description = "Role updated", body = BudgetMember),
        (status = 400, description = "Last owner cannot be demoted"),
        (status = 403, description = "Requires OWNER role"),
        (status = 404, description = "Budget or member not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Members"
)]
pub async fn update_member(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((budget_id, member_user_id)): Path<(u64, u64)>,
    Json(request): Json<UpdateMemberRequest>,
) -> Result<Json<BudgetMember>, ApiError> {
    let member = app_state
        .budget_state
        .member_service
        .change_role(budget_id, user.user_id, member_user_id, request.role)
        .await?;

    Ok(Json(member))
}

/// 멤버 제거 (OWNER) 또는 탈퇴 (본인)
/// Remove a member, or leave the budget when `user_id` is the caller
#[utoipa::path(
    delete,
    path = "/api/budgets/{id}/members/{user_id}",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        ("user_id" = u64, Path, description = "Member user ID")
    ),
    responses(
        (status = 200, description = "Member removed", body = MessageResponse),
        (status = 400, description = "Last owner cannot leave"),
        (status = 403, description = "Requires OWNER role"),
        (status = 404, description = "Budget or member not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Members"
)]
pub async fn remove_member(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((budget_id, member_user_id)): Path<(u64, u64)>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .budget_state
        .member_service
        .remove_member(budget_id, user.user_id, member_user_id)
        .await?;

    Ok(Json(MessageResponse::new("Member removed")))
}
