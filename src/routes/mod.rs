// Routes module: 라우팅 설정
// 역할: 모든 도메인의 라우터를 조합
// Routes module: combines all domain routers

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde_json::{json, Value};
use crate::shared::services::AppState;

// 각 도메인의 routes import
use crate::domains::auth::routes::create_auth_router;
use crate::domains::budget::routes::{create_budget_router, create_invite_router};
use crate::domains::ledger::routes::create_ledger_router;
use crate::domains::audit::routes::create_audit_router;
use crate::domains::realtime::routes::create_realtime_router;

/// Create main router (combines all domain routers)
/// 메인 라우터 생성 (모든 도메인 라우터 조합)
///
/// 원장/감사 라우트는 모두 `/api/budgets/:id/...` 아래에 있으므로
/// 예산 라우터에 병합한 뒤 한 번만 nest 합니다.
pub fn create_router() -> Router<AppState> {
    let budgets = create_budget_router()
        .merge(create_ledger_router())
        .merge(create_audit_router());

    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", create_auth_router())
        .nest("/api/budgets", budgets)
        .nest("/api/invites", create_invite_router())
        .merge(create_realtime_router())
}

/// 헬스 체크 (DB 연결 포함)
/// Liveness check; 503 when the database is unreachable
async fn health(State(app_state): State<AppState>) -> (StatusCode, Json<Value>) {
    match app_state.db.ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            tracing::warn!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({ "status": "unavailable" })),
            )
        }
    }
}
