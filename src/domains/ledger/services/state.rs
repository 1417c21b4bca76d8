// Ledger domain state
// 원장 도메인 상태
use crate::shared::database::Database;
use crate::domains::ledger::services::{
    AccountService, MonthService, RecalculationService, TransactionService,
};
use crate::domains::realtime::services::EventHub;

/// Ledger domain state
/// 원장 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct LedgerState {
    pub month_service: MonthService,
    pub account_service: AccountService,
    pub transaction_service: TransactionService,
    pub recalculation_service: RecalculationService,
}

impl LedgerState {
    pub fn new(db: Database, events: EventHub) -> Self {
        Self {
            month_service: MonthService::new(db.clone(), events.clone()),
            account_service: AccountService::new(db.clone(), events.clone()),
            transaction_service: TransactionService::new(db.clone(), events.clone()),
            recalculation_service: RecalculationService::new(db, events),
        }
    }
}
