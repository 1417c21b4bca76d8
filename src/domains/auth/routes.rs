use axum::{
    routing::{get, post},
    Router,
};
use crate::shared::services::AppState;

use super::handlers::auth_handler;

/// 인증 라우터 생성
/// Create auth router (nested under `/api/auth`)
///
/// - `POST /signup`, `POST /signin`
/// - `POST /refresh` - Refresh Token Rotation
/// - `POST /logout` - 토큰 하나 무효화
/// - `POST /logout-all` - 모든 기기 로그아웃 (Bearer)
/// - `GET  /me`
pub fn create_auth_router() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth_handler::signup))
        .route("/signin", post(auth_handler::signin))
        .route("/refresh", post(auth_handler::refresh))
        .route("/logout", post(auth_handler::logout))
        .route("/logout-all", post(auth_handler::logout_all))
        .route("/me", get(auth_handler::get_me))
}
