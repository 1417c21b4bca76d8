// =====================================================
// RecalculationService - 잔액 재계산 연결 계층
// =====================================================
// 역할: DB ↔ 재계산 엔진 연결
//
// 1. 예산의 월 체인 전체를 읽음 (월, 계좌 합계, 거래)
// 2. engine::recompute_from 으로 변경 지점부터 전방 전파
// 3. 리포트에 포함된(값이 바뀐) 월/거래만 다시 저장
//
// 모든 원장 변경은 같은 트랜잭션 안에서 이 함수를 호출합니다.
// =====================================================

use std::collections::HashMap;
use rust_decimal::Decimal;
use sqlx::PgConnection;
use crate::shared::database::{AccountRepository, Database, MonthRepository, TransactionRepository};
use crate::shared::errors::BudgetError;
use crate::domains::budget::models::Role;
use crate::domains::budget::services::access;
use crate::domains::ledger::engine::{self, MonthState, RecalcReport, TransactionState};
use crate::domains::ledger::models::{Month, RecalculationResponse, Transaction};
use crate::domains::audit::models::{AuditAction, EntityType};
use crate::domains::realtime::models::BudgetEvent;
use crate::domains::realtime::services::EventHub;

/// DB 행으로 엔진 입력 체인 구성 (저장된 파생 값 포함)
/// Build the engine chain from stored rows, keeping stored derived values
pub fn build_chain(
    months: &[Month],
    account_totals: &HashMap<u64, Decimal>,
    transactions: Vec<Transaction>,
) -> Vec<MonthState> {
    let mut by_month: HashMap<u64, Vec<TransactionState>> = HashMap::new();
    for tx in transactions {
        let mut state = TransactionState::new(tx.id, tx.date, tx.amount, tx.paid);
        state.balance = tx.balance;
        by_month.entry(tx.month_id).or_default().push(state);
    }

    months
        .iter()
        .map(|m| {
            let total = account_totals.get(&m.id).copied().unwrap_or(Decimal::ZERO);
            let mut state = MonthState::new(m.id, m.position, m.started, total)
                .with_transactions(by_month.remove(&m.id).unwrap_or_default());
            state.starting_balance = m.starting_balance;
            state.closing_balance = m.closing_balance;
            state
        })
        .collect()
}

/// 재계산 시작 인덱스 (position 이상인 첫 월)
/// Index of the first month whose position is `>= from_position`
pub fn start_index(chain: &[MonthState], from_position: i32) -> usize {
    chain
        .iter()
        .position(|m| m.position >= from_position)
        .unwrap_or(chain.len())
}

/// 변경된 월의 position부터 재계산 후 바뀐 값만 저장
/// Recalculate from `from_position` forward inside the caller's transaction
pub async fn recalculate_from(
    conn: &mut PgConnection,
    budget_id: u64,
    from_position: i32,
) -> Result<RecalcReport, BudgetError> {
    let months = MonthRepository::list(conn, budget_id).await?;
    let totals = AccountRepository::totals_by_month(conn, budget_id).await?;
    let transactions = TransactionRepository::list_by_budget(conn, budget_id).await?;

    let mut chain = build_chain(&months, &totals, transactions);
    chain.sort_by_key(|m| m.position);
    let from_index = start_index(&chain, from_position);

    let report = engine::recompute_from(&mut chain, from_index)?;
    persist(conn, &chain, &report).await?;

    tracing::debug!(
        budget_id,
        from_position,
        visited = report.months_visited,
        changed_months = report.changed_months.len(),
        changed_transactions = report.changed_transactions.len(),
        "balances recalculated"
    );

    Ok(report)
}

async fn persist(conn: &mut PgConnection, chain: &[MonthState], report: &RecalcReport) -> Result<(), BudgetError> {
    if report.is_empty() {
        return Ok(());
    }

    for month in chain.iter().filter(|m| report.changed_months.contains(&m.id)) {
        MonthRepository::update_balances(conn, month.id, month.starting_balance, month.closing_balance).await?;
    }

    let balances: HashMap<u64, Decimal> = chain
        .iter()
        .flat_map(|m| m.transactions.iter())
        .map(|tx| (tx.id, tx.balance))
        .collect();
    for tx_id in &report.changed_transactions {
        if let Some(balance) = balances.get(tx_id) {
            TransactionRepository::update_balance(conn, *tx_id, *balance).await?;
        }
    }

    Ok(())
}

/// 수동 전체 재계산 서비스
/// Full-chain recalculation on demand
#[derive(Clone)]
pub struct RecalculationService {
    db: Database,
    events: EventHub,
}

impl RecalculationService {
    pub fn new(db: Database, events: EventHub) -> Self {
        Self { db, events }
    }

    /// 예산 전체 재계산 (EDITOR)
    /// Recompute the whole chain of a budget
    pub async fn recalculate_budget(&self, budget_id: u64, user_id: u64) -> Result<RecalcReport, BudgetError> {
        let mut tx = self.db.pool().begin().await?;
        access::require_role_for_update(&mut tx, budget_id, user_id, Role::Editor).await?;

        let report = recalculate_from(&mut tx, budget_id, i32::MIN).await?;
        tx.commit().await?;

        if !report.is_empty() {
            tracing::info!(budget_id, changed_months = report.changed_months.len(), "budget chain repaired");
            let payload = RecalculationResponse::from(report.clone());
            self.events.publish(
                BudgetEvent::new(budget_id, EntityType::Budget, AuditAction::Update, budget_id, user_id, &payload)
                    .with_recalculated(report.changed_months.clone()),
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    fn month(id: u64, position: i32, started: bool, start: Decimal, close: Decimal) -> Month {
        Month {
            id,
            budget_id: 1,
            position,
            label: format!("2024-{:02}", position),
            started,
            starting_balance: start,
            closing_balance: close,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn transaction(id: u64, month_id: u64, day: u32, amount: Decimal, balance: Decimal) -> Transaction {
        Transaction {
            id,
            month_id,
            description: format!("tx {}", id),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            amount,
            paid: false,
            balance,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_build_chain_keeps_stored_values() {
        let months = vec![month(10, 1, true, dec(100), dec(80))];
        let totals = HashMap::from([(10, dec(100))]);
        let txs = vec![transaction(1, 10, 3, dec(-20), dec(80))];

        let chain = build_chain(&months, &totals, txs);

        assert_eq!(chain.len(), 1);
        assert_eq!(chain[0].accounts_total, dec(100));
        assert_eq!(chain[0].closing_balance, dec(80));
        assert_eq!(chain[0].transactions[0].balance, dec(80));
    }

    #[test]
    fn test_consistent_chain_produces_empty_report() {
        let months = vec![
            month(10, 1, true, dec(100), dec(80)),
            month(11, 2, false, dec(80), dec(80)),
        ];
        let totals = HashMap::from([(10, dec(100))]);
        let txs = vec![transaction(1, 10, 3, dec(-20), dec(80))];

        let mut chain = build_chain(&months, &totals, txs);
        let report = engine::recompute_from(&mut chain, 0).unwrap();

        assert!(report.is_empty());
        assert_eq!(report.months_visited, 2);
    }

    #[test]
    fn test_missing_account_total_is_zero() {
        let months = vec![month(10, 1, true, Decimal::ZERO, Decimal::ZERO)];
        let chain = build_chain(&months, &HashMap::new(), Vec::new());
        assert_eq!(chain[0].accounts_total, Decimal::ZERO);
    }

    #[test]
    fn test_start_index() {
        let months = vec![
            month(1, 1, true, Decimal::ZERO, Decimal::ZERO),
            month(2, 3, false, Decimal::ZERO, Decimal::ZERO),
            month(3, 4, false, Decimal::ZERO, Decimal::ZERO),
        ];
        let chain = build_chain(&months, &HashMap::new(), Vec::new());

        assert_eq!(start_index(&chain, i32::MIN), 0);
        assert_eq!(start_index(&chain, 2), 1);
        assert_eq!(start_index(&chain, 4), 2);
        assert_eq!(start_index(&chain, 9), 3);
    }
}
