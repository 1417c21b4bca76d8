use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use crate::domains::auth::services::AuthService;
use crate::shared::errors::AuthError;

/// 기본 정리 주기 (1시간)
const DEFAULT_PERIOD: Duration = Duration::from_secs(60 * 60);

/// Refresh Token 정리 스케줄러
/// Refresh Token Cleanup Scheduler
///
/// 역할:
/// - 주기적으로 만료/무효화된 Refresh Token 행을 삭제
///
/// 처리 흐름:
/// 1. 서버 시작 시 백그라운드 태스크 실행
/// 2. 주기마다 `AuthService::purge_stale_tokens` 호출
/// 3. 실패는 로그만 남기고 다음 주기에 재시도
#[derive(Clone)]
pub struct TokenCleanupScheduler {
    auth_service: AuthService,
    period: Duration,
}

impl TokenCleanupScheduler {
    pub fn new(auth_service: AuthService) -> Self {
        Self::with_period(auth_service, DEFAULT_PERIOD)
    }

    pub fn with_period(auth_service: AuthService, period: Duration) -> Self {
        Self { auth_service, period }
    }

    /// 한 번 정리 실행
    /// Run a single cleanup pass; returns the number of deleted rows
    pub async fn run_once(&self) -> Result<u64, AuthError> {
        let deleted = self.auth_service.purge_stale_tokens().await?;
        if deleted > 0 {
            tracing::info!(deleted, "stale refresh tokens purged");
        }
        Ok(deleted)
    }

    /// 스케줄러 시작
    /// Start scheduler in the background
    pub fn start(&self) -> JoinHandle<()> {
        let scheduler = self.clone();

        tokio::spawn(async move {
            let mut ticker = interval(scheduler.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;

                if let Err(e) = scheduler.run_once().await {
                    tracing::warn!(error = %e, "refresh token cleanup failed");
                }
            }
        })
    }
}
