use axum::{
    routing::{delete, get, post, put},
    Router,
};
use crate::shared::services::AppState;

use super::handlers::{budget_handler, invite_handler, member_handler};

/// 예산 라우터 생성
/// Create budget router (nested under `/api/budgets`)
///
/// # Routes
///
/// ## Budgets
/// - `GET    /api/budgets` - 내 예산 목록
/// - `POST   /api/budgets` - 예산 생성
/// - `GET    /api/budgets/:id` - 예산 조회
/// - `PUT    /api/budgets/:id` - 이름 변경
/// - `DELETE /api/budgets/:id` - 예산 삭제
///
/// ## Members
/// - `GET    /api/budgets/:id/members`
/// - `PUT    /api/budgets/:id/members/:user_id` - 역할 변경
/// - `DELETE /api/budgets/:id/members/:user_id` - 제거 / 탈퇴
///
/// ## Invites
/// - `GET    /api/budgets/:id/invites`
/// - `POST   /api/budgets/:id/invites`
/// - `DELETE /api/budgets/:id/invites/:invite_id`
pub fn create_budget_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(budget_handler::list_budgets).post(budget_handler::create_budget),
        )
        .route(
            "/:id",
            get(budget_handler::get_budget)
                .put(budget_handler::update_budget)
                .delete(budget_handler::delete_budget),
        )
        .route("/:id/members", get(member_handler::list_members))
        .route(
            "/:id/members/:user_id",
            put(member_handler::update_member).delete(member_handler::remove_member),
        )
        .route(
            "/:id/invites",
            get(invite_handler::list_invites).post(invite_handler::create_invite),
        )
        .route("/:id/invites/:invite_id", delete(invite_handler::revoke_invite))
}

/// 초대 수락/거절 라우터 (`/api/invites`)
pub fn create_invite_router() -> Router<AppState> {
    Router::new()
        .route("/accept", post(invite_handler::accept_invite))
        .route("/decline", post(invite_handler::decline_invite))
}
