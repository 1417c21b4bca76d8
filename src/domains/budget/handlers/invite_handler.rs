use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use crate::domains::budget::models::{
    BudgetInvite, BudgetMember, CreateInviteRequest, InviteTokenRequest, InvitesResponse,
};
use crate::shared::errors::ApiError;
use crate::shared::middleware::AuthenticatedUser;
use crate::shared::services::AppState;

/// 초대 생성 (OWNER)
/// Invite an email address; the token is delivered by mail only
#[utoipa::path(
    post,
    path = "/api/budgets/{id}/invites",
    params(("id" = u64, Path, description = "Budget ID")),
    request_body = CreateInviteRequest,
    responses(
        (status = 201, description = "Invite created and mailed", body = BudgetInvite),
        (status = 400, description = "Invalid email or role"),
        (status = 403, description = "Requires OWNER role"),
        (status = 409, description = "Email already belongs to a member"),
    ),
    security(("BearerAuth" = [])),
    tag = "Invites"
)]
pub async fn create_invite(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(budget_id): Path<u64>,
    Json(request): Json<CreateInviteRequest>,
) -> Result<(StatusCode, Json<BudgetInvite>), ApiError> {
    let invite = app_state
        .budget_state
        .invite_service
        .create_invite(budget_id, user.user_id, request)
        .await?;

    Ok((StatusCode::CREATED, Json(invite)))
}

/// 대기 중 초대 목록 (OWNER)
#[utoipa::path(
    get,
    path = "/api/budgets/{id}/invites",
    params(("id" = u64, Path, description = "Budget ID")),
    responses(
        (status = 200, description = "Pending invites", body = InvitesResponse),
        (status = 403, description = "Requires OWNER role"),
        (status = 404, description = "Budget not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Invites"
)]
pub async fn list_invites(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(budget_id): Path<u64>,
) -> Result<Json<InvitesResponse>, ApiError> {
    let invites = app_state
        .budget_state
        .invite_service
        .list_invites(budget_id, user.user_id)
        .await?;

    Ok(Json(InvitesResponse { invites }))
}

#[utoipa::path(
    delete,
    path = "/api/budgets/{id}/invites/{invite_id}",
    params(
        ("id" = u64, Path, description = "Budget ID"),
        ("invite_id" = u64, Path, description = "Invite ID")
    ),
    responses(
        (status = 200, description = "Invite revoked", body = BudgetInvite),
        (status = 400, description = "Invite is no longer pending"),
        (status = 403, description = "Requires OWNER role"),
        (status = 404, description = "Invite not found"),
    ),
    security(("BearerAuth" = [])),
    tag = "Invites"
)]
pub async fn revoke_invite(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path((budget_id, invite_id)): Path<(u64, u64)>,
) -> Result<Json<BudgetInvite>, ApiError> {
    let invite = app_state
        .budget_state
        .invite_service
        .revoke_invite(budget_id, user.user_id, invite_id)
        .await?;

    Ok(Json(invite))
}

/// 초대 수락
/// Accept an invitation with the mailed token
#[utoipa::path(
    post,
    path = "/api/invites/accept",
    request_body = InviteTokenRequest,
    responses(
        (status = 200, description = "Caller joined the budget", body = BudgetMember),
        (status = 400, description = "Expired, revoked, used, or addressed to another email"),
        (status = 404, description = "Unknown token"),
    ),
    security(("BearerAuth" = [])),
    tag = "Invites"
)]
pub async fn accept_invite(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<InviteTokenRequest>,
) -> Result<Json<BudgetMember>, ApiError> {
    let member = app_state
        .budget_state
        .invite_service
        .accept_invite(user.user_id, &user.email, &request.token)
        .await?;

    Ok(Json(member))
}

#[utoipa::path(
    post,
    path = "/api/invites/decline",
    request_body = InviteTokenRequest,
    responses(
        (status = 200, description = "Invite declined", body = BudgetInvite),
        (status = 400, description = "Expired, revoked, used, or addressed to another email"),
        (status = 404, description = "Unknown token"),
    ),
    security(("BearerAuth" = [])),
    tag = "Invites"
)]
pub async fn decline_invite(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<InviteTokenRequest>,
) -> Result<Json<BudgetInvite>, ApiError> {
    let invite = app_state
        .budget_state
        .invite_service
        .decline_invite(user.user_id, &user.email, &request.token)
        .await?;

    Ok(Json(invite))
}
