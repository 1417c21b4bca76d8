// Budget domain state
// 예산 도메인 상태
use std::sync::Arc;
use crate::shared::clients::Mailer;
use crate::shared::config::AppConfig;
use crate::shared::database::Database;
use crate::domains::budget::services::{BudgetService, InviteService, MemberService};
use crate::domains::realtime::services::EventHub;

/// Budget domain state
/// 예산 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct BudgetState {
    pub budget_service: BudgetService,
    pub member_service: MemberService,
    pub invite_service: InviteService,
}

impl BudgetState {
    pub fn new(db: Database, events: EventHub, mailer: Arc<dyn Mailer>, config: &AppConfig) -> Self {
        Self {
            budget_service: BudgetService::new(db.clone(), events.clone()),
            member_service: MemberService::new(db.clone(), events.clone()),
            invite_service: InviteService::new(db, events, mailer, config),
        }
    }
}
