// Realtime domain routes
// 실시간 구독 라우터
use axum::{routing::get, Router};
use crate::domains::realtime::handlers::ws_handler;
use crate::shared::services::AppState;

/// Create realtime router (`/api/ws`)
pub fn create_realtime_router() -> Router<AppState> {
    Router::new().route("/api/ws", get(ws_handler::ws_handler))
}
