// Audit domain state
// 감사 로그 도메인 상태
use crate::shared::database::Database;
use crate::domains::audit::services::AuditService;

/// Audit domain state
#[derive(Clone)]
pub struct AuditState {
    pub audit_service: AuditService,
}

impl AuditState {
    pub fn new(db: Database) -> Self {
        Self {
            audit_service: AuditService::new(db),
        }
    }
}
