// Audit domain routes
// 감사 로그 라우터
use axum::{routing::get, Router};
use crate::domains::audit::handlers::audit_handler;
use crate::shared::services::AppState;

/// Create audit router (merged under `/api/budgets`)
pub fn create_audit_router() -> Router<AppState> {
    Router::new().route("/:id/audit", get(audit_handler::list_audit_logs))
}
