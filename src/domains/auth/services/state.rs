// Auth domain state
// 인증 도메인 상태
use crate::shared::database::Database;
use crate::domains::auth::services::{AuthService, JwtService, TokenCleanupScheduler};

/// Auth domain state
/// 인증 서비스, JWT 검증기(미들웨어/WebSocket 공용), 토큰 정리 스케줄러
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: AuthService,
    pub jwt_service: JwtService,
    pub token_cleanup_scheduler: TokenCleanupScheduler,
}

impl AuthState {
    pub fn new(db: Database, jwt_service: JwtService) -> Self {
        let auth_service = AuthService::new(db, jwt_service.clone());
        let token_cleanup_scheduler = TokenCleanupScheduler::new(auth_service.clone());

        Self {
            auth_service,
            jwt_service,
            token_cleanup_scheduler,
        }
    }
}
