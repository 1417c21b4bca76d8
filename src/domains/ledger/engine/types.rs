// =====================================================
// Recalculation Engine Types
// =====================================================
// 역할: 잔액 재계산 엔진이 사용하는 순수 데이터 구조
//
// DB 모델(Month, Account, Transaction)과 분리되어 있으며,
// 서비스 계층이 DB에서 읽은 값으로 MonthState 체인을 만들고
// 엔진이 계산한 결과 중 바뀐 값만 다시 저장합니다.
// =====================================================

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

/// 재계산 에러
/// Recalculation failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecalcError {
    /// 잔액이 Decimal 표현 범위를 벗어남
    #[error("Balance out of range in month {month_id}")]
    BalanceOverflow { month_id: u64 },
}

/// 재계산 대상 거래
/// Transaction as seen by the recalculation engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionState {
    /// 거래 ID
    pub id: u64,

    /// 거래 날짜 (정렬 1순위, 오름차순)
    /// Transaction date (primary sort key, ascending)
    pub date: NaiveDate,

    /// 부호 있는 금액 (수입 +, 지출 -), 정렬 2순위 (내림차순)
    /// Signed amount; secondary sort key, descending
    pub amount: Decimal,

    /// 이미 계좌 잔고에 반영된 거래인지 여부
    /// Paid transactions are already reflected in account balances
    pub paid: bool,

    /// 이 거래 직후의 누적 잔액 (계산 값)
    /// Running balance right after this transaction (derived)
    pub balance: Decimal,
}

impl TransactionState {
    pub fn new(id: u64, date: NaiveDate, amount: Decimal, paid: bool) -> Self {
        Self {
            id,
            date,
            amount,
            paid,
            balance: Decimal::ZERO,
        }
    }
}

/// 재계산 대상 월
/// Month as seen by the recalculation engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthState {
    /// 월 ID
    pub id: u64,

    /// 예산 내 순서 (오름차순으로 체인 구성)
    /// Position within the budget; the chain is ordered by it
    pub position: i32,

    /// "시작된" 월은 이전 월과 무관하게 계좌 합계에서 시작 잔액을 가져옴
    /// A started month anchors the chain on its account total
    pub started: bool,

    /// 이 월의 계좌 잔고 합계
    /// Sum of the month's account balances
    pub accounts_total: Decimal,

    /// 시작 잔액 (계산 값)
    pub starting_balance: Decimal,

    /// 마감 잔액 (계산 값)
    pub closing_balance: Decimal,

    pub transactions: Vec<TransactionState>,
}

impl MonthState {
    pub fn new(id: u64, position: i32, started: bool, accounts_total: Decimal) -> Self {
        Self {
            id,
            position,
            started,
            accounts_total,
            starting_balance: Decimal::ZERO,
            closing_balance: Decimal::ZERO,
            transactions: Vec::new(),
        }
    }

    pub fn with_transactions(mut self, transactions: Vec<TransactionState>) -> Self {
        self.transactions = transactions;
        self
    }

    /// 미결제 거래 금액 합계 (범위 초과 시 None)
    /// Sum of unpaid transaction amounts, `None` on overflow
    pub fn unpaid_total(&self) -> Option<Decimal> {
        self.transactions
            .iter()
            .filter(|tx| !tx.paid)
            .try_fold(Decimal::ZERO, |acc, tx| acc.checked_add(tx.amount))
    }
}

/// 재계산 결과 중 값이 바뀐 항목
/// What a recalculation pass actually changed
///
/// 서비스 계층은 여기에 포함된 월/거래만 DB에 다시 씁니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecalcReport {
    /// 시작/마감 잔액이 바뀐 월 ID
    pub changed_months: Vec<u64>,

    /// 누적 잔액이 바뀐 거래 ID
    pub changed_transactions: Vec<u64>,

    /// 재계산한 월 수 (변경 여부와 무관)
    pub months_visited: usize,
}

impl RecalcReport {
    pub fn is_empty(&self) -> bool {
        self.changed_months.is_empty() && self.changed_transactions.is_empty()
    }
}
