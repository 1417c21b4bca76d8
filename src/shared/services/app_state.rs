use std::sync::Arc;
use crate::shared::clients::Mailer;
use crate::shared::config::AppConfig;
use crate::shared::database::Database;
use crate::domains::auth::services::state::AuthState;
use crate::domains::auth::services::JwtService;
use crate::domains::budget::services::state::BudgetState;
use crate::domains::ledger::services::state::LedgerState;
use crate::domains::audit::services::state::AuditState;
use crate::domains::realtime::services::{EventHub, RealtimeState};

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 각 도메인의 State를 조합하여 전체 애플리케이션 상태를 관리합니다.
/// 모든 변경 서비스는 같은 `EventHub`를 공유하여 실시간 구독자에게 알립니다.
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 (공유)
    /// Database connection (shared)
    pub db: Database,
    pub config: Arc<AppConfig>,
    pub auth_state: AuthState,
    pub budget_state: BudgetState,
    pub ledger_state: LedgerState,
    pub audit_state: AuditState,
    pub realtime_state: RealtimeState,
}

impl AppState {
    /// Create AppState with database, configuration and mailer
    /// 모든 도메인 State를 초기화하고 조합
    pub fn new(db: Database, config: AppConfig, mailer: Arc<dyn Mailer>) -> Self {
        // 1. 공유 서비스 생성 (JWT, 이벤트 허브)
        let jwt_service = JwtService::from_config(&config);
        let event_hub = EventHub::new(config.event_channel_capacity);

        // 2. 각 도메인 State 생성
        let auth_state = AuthState::new(db.clone(), jwt_service);
        let budget_state = BudgetState::new(db.clone(), event_hub.clone(), mailer, &config);
        let ledger_state = LedgerState::new(db.clone(), event_hub.clone());
        let audit_state = AuditState::new(db.clone());
        let realtime_state = RealtimeState::new(event_hub);

        // 3. AppState 조합
        Self {
            db,
            config: Arc::new(config),
            auth_state,
            budget_state,
            ledger_state,
            audit_state,
            realtime_state,
        }
    }
}
