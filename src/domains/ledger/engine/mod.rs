// =====================================================
// Recalculation Engine - 잔액 재계산 엔진
// =====================================================
// 역할: 월 체인의 시작/마감 잔액과 거래별 누적 잔액을 계산하는
//       유일한 순수 함수 모음 (DB/네트워크 의존 없음)
//
// 규칙:
// - 월은 position 오름차순으로 체인을 이룸
// - 시작 잔액:
//     * 첫 번째 월 또는 started 월 → 계좌 잔고 합계
//     * 그 외 → 이전 월의 마감 잔액
// - 마감 잔액 = 시작 잔액 + 미결제 거래 금액 합계
// - 거래별 누적 잔액:
//     (날짜 오름차순, 금액 내림차순)으로 안정 정렬 후
//     왼쪽부터 미결제 금액을 누적
//
// 어떤 월이 바뀌면 그 월부터 뒤쪽만 다시 계산하면 됨
// (앞쪽 월은 절대 영향을 받지 않음)
//
// 모든 덧셈은 checked_add: 범위를 넘으면 RecalcError로 실패하고
// 입력 체인은 부분적으로만 갱신된 상태일 수 있음
// =====================================================

pub mod types;

pub use types::*;

use rust_decimal::Decimal;
use std::collections::HashMap;

/// 거래 정렬: 날짜 오름차순, 같은 날짜면 금액 내림차순
/// Stable sort by (date ascending, amount descending)
///
/// 같은 날짜에 수입(+)이 지출(-)보다 먼저 오므로,
/// 하루 안에서 잔액이 불필요하게 마이너스로 내려가지 않습니다.
pub fn order_transactions(transactions: &mut [TransactionState]) {
    transactions.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| b.amount.cmp(&a.amount)));
}

/// 단일 월 재계산
/// Recompute one month from a given starting balance
///
/// 거래를 정렬하고 누적 잔액을 채운 뒤 시작/마감 잔액을 설정합니다.
pub fn recompute_month(month: &mut MonthState, starting_balance: Decimal) -> Result<(), RecalcError> {
    order_transactions(&mut month.transactions);

    let month_id = month.id;
    let mut running = starting_balance;
    for tx in month.transactions.iter_mut() {
        if !tx.paid {
            running = running
                .checked_add(tx.amount)
                .ok_or(RecalcError::BalanceOverflow { month_id })?;
        }
        tx.balance = running;
    }

    month.starting_balance = starting_balance;
    month.closing_balance = running;
    Ok(())
}

/// 월의 시작 잔액 결정
/// Resolve a month's starting balance from its predecessor
fn anchor_balance(previous_closing: Option<Decimal>, month: &MonthState) -> Decimal {
    match previous_closing {
        Some(closing) if !month.started => closing,
        _ => month.accounts_total,
    }
}

/// `from_index` 이후의 월만 재계산 (전방 전파)
/// Recompute months at index `>= from_index`, propagating forward
///
/// 체인은 먼저 position 기준으로 안정 정렬됩니다. `from_index`는 정렬된
/// 순서 기준이며, 그 앞의 월들은 이미 일관된 상태라고 가정하고
/// 건드리지 않습니다 (`from_index - 1` 월의 마감 잔액만 읽음).
///
/// # Returns
/// 실제로 값이 바뀐 월/거래 목록
///
/// # Errors
/// 누적 잔액이 범위를 넘으면 `RecalcError::BalanceOverflow`
pub fn recompute_from(months: &mut [MonthState], from_index: usize) -> Result<RecalcReport, RecalcError> {
    months.sort_by_key(|m| m.position);

    let mut report = RecalcReport::default();
    if from_index >= months.len() {
        return Ok(report);
    }

    let mut previous_closing = match from_index {
        0 => None,
        i => Some(months[i - 1].closing_balance),
    };

    for month in months[from_index..].iter_mut() {
        let before_start = month.starting_balance;
        let before_close = month.closing_balance;
        let before_balances: HashMap<u64, Decimal> = month
            .transactions
            .iter()
            .map(|tx| (tx.id, tx.balance))
            .collect();

        let starting = anchor_balance(previous_closing, month);
        recompute_month(month, starting)?;

        if month.starting_balance != before_start || month.closing_balance != before_close {
            report.changed_months.push(month.id);
        }
        for tx in &month.transactions {
            if before_balances.get(&tx.id) != Some(&tx.balance) {
                report.changed_transactions.push(tx.id);
            }
        }

        report.months_visited += 1;
        previous_closing = Some(month.closing_balance);
    }

    Ok(report)
}

/// 전체 체인 재계산
/// Recompute the whole chain and return it in position order
pub fn recompute(months: Vec<MonthState>) -> Result<Vec<MonthState>, RecalcError> {
    let mut months = months;
    recompute_from(&mut months, 0)?;
    Ok(months)
}

/// 체인 불변식 검사 (디버깅/테스트용)
/// Check the chain invariants; returns the first violated month id
pub fn find_inconsistency(months: &[MonthState]) -> Option<u64> {
    let mut previous_closing: Option<Decimal> = None;

    for month in months {
        let expected_start = anchor_balance(previous_closing, month);
        let expected_close = month
            .unpaid_total()
            .and_then(|total| month.starting_balance.checked_add(total));
        if month.starting_balance != expected_start || Some(month.closing_balance) != expected_close {
            return Some(month.id);
        }
        previous_closing = Some(month.closing_balance);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn dec(value: i64) -> Decimal {
        Decimal::new(value, 0)
    }

    fn tx(id: u64, day: u32, amount: i64, paid: bool) -> TransactionState {
        TransactionState::new(id, date(day), dec(amount), paid)
    }

    #[test]
    fn test_order_by_date_then_amount_desc() {
        let mut txs = vec![
            tx(1, 5, -20, false),
            tx(2, 1, -10, false),
            tx(3, 5, 100, false),
            tx(4, 5, -20, true),
        ];

        order_transactions(&mut txs);

        let ids: Vec<u64> = txs.iter().map(|t| t.id).collect();
        // 같은 날짜/금액(1, 4)은 입력 순서 유지
        assert_eq!(ids, vec![2, 3, 1, 4]);
    }

    #[test]
    fn test_running_balance_skips_paid() {
        let mut month = MonthState::new(1, 0, true, dec(1000)).with_transactions(vec![
            tx(1, 2, -100, false),
            tx(2, 3, -50, true),
            tx(3, 4, 300, false),
        ]);

        recompute_month(&mut month, dec(1000)).unwrap();

        let balances: Vec<Decimal> = month.transactions.iter().map(|t| t.balance).collect();
        assert_eq!(balances, vec![dec(900), dec(900), dec(1200)]);
        assert_eq!(month.starting_balance, dec(1000));
        assert_eq!(month.closing_balance, dec(1200));
    }

    #[test]
    fn test_empty_month_closes_at_start() {
        let mut month = MonthState::new(1, 0, false, dec(0));
        recompute_month(&mut month, dec(42)).unwrap();
        assert_eq!(month.closing_balance, dec(42));
    }

    #[test]
    fn test_chain_inherits_closing_balance() {
        let months = vec![
            MonthState::new(1, 0, true, dec(500)).with_transactions(vec![tx(1, 1, -200, false)]),
            MonthState::new(2, 1, false, dec(9999)).with_transactions(vec![tx(2, 1, 50, false)]),
            MonthState::new(3, 2, false, dec(0)),
        ];

        let result = recompute(months).unwrap();

        assert_eq!(result[0].closing_balance, dec(300));
        // 시작되지 않은 월은 계좌 합계(9999)를 무시하고 이전 마감 잔액을 사용
        assert_eq!(result[1].starting_balance, dec(300));
        assert_eq!(result[1].closing_balance, dec(350));
        assert_eq!(result[2].starting_balance, dec(350));
        assert_eq!(find_inconsistency(&result), None);
    }

    #[test]
    fn test_started_month_anchors_on_accounts() {
        let months = vec![
            MonthState::new(1, 0, true, dec(100)).with_transactions(vec![tx(1, 1, -40, false)]),
            MonthState::new(2, 1, true, dec(1000)).with_transactions(vec![tx(2, 1, -40, false)]),
        ];

        let result = recompute(months).unwrap();

        assert_eq!(result[1].starting_balance, dec(1000));
        assert_eq!(result[1].closing_balance, dec(960));
    }

    #[test]
    fn test_first_month_uses_accounts_even_if_not_started() {
        let result = recompute(vec![MonthState::new(1, 0, false, dec(75))]).unwrap();
        assert_eq!(result[0].starting_balance, dec(75));
    }

    #[test]
    fn test_chain_is_ordered_by_position() {
        let months = vec![
            MonthState::new(2, 5, false, dec(0)),
            MonthState::new(1, 1, true, dec(10)),
        ];

        let result = recompute(months).unwrap();

        assert_eq!(result[0].id, 1);
        assert_eq!(result[1].starting_balance, dec(10));
    }

    #[test]
    fn test_recompute_from_reports_only_changes() {
        let mut months = recompute(vec![
            MonthState::new(1, 0, true, dec(100)).with_transactions(vec![tx(1, 1, -10, false)]),
            MonthState::new(2, 1, false, dec(0)).with_transactions(vec![tx(2, 1, -10, false)]),
            MonthState::new(3, 2, true, dec(500)).with_transactions(vec![tx(3, 1, -10, false)]),
        ])
        .unwrap();

        // 두 번째 월 거래 금액 변경
        months[1].transactions[0].amount = dec(-30);
        let report = recompute_from(&mut months, 1).unwrap();

        assert_eq!(report.months_visited, 2);
        assert_eq!(report.changed_months, vec![2]);
        assert_eq!(report.changed_transactions, vec![2]);
        // 세 번째 월은 started라서 영향 없음
        assert_eq!(months[2].starting_balance, dec(500));
    }

    #[test]
    fn test_recompute_from_past_end_is_noop() {
        let mut months = vec![MonthState::new(1, 0, true, dec(1))];
        let report = recompute_from(&mut months, 3).unwrap();
        assert!(report.is_empty());
        assert_eq!(report.months_visited, 0);
    }

    #[test]
    fn test_new_transaction_is_reported() {
        let mut months = recompute(vec![MonthState::new(1, 0, true, dec(100))]).unwrap();
        months[0].transactions.push(tx(7, 3, 0, false));

        let report = recompute_from(&mut months, 0).unwrap();

        // 잔액 0 -> 100 으로 채워짐
        assert_eq!(report.changed_transactions, vec![7]);
        assert!(report.changed_months.is_empty());
    }

    #[test]
    fn test_find_inconsistency_detects_stale_month() {
        let mut months = recompute(vec![
            MonthState::new(1, 0, true, dec(100)),
            MonthState::new(2, 1, false, dec(0)),
        ])
        .unwrap();
        months[0].closing_balance = dec(50);

        assert_eq!(find_inconsistency(&months), Some(1));
    }

    #[test]
    fn test_unpaid_overflow_is_an_error() {
        let months = vec![MonthState::new(1, 0, true, Decimal::ZERO).with_transactions(vec![
            TransactionState::new(1, date(1), Decimal::MAX, false),
            TransactionState::new(2, date(2), Decimal::MAX, false),
        ])];

        assert_eq!(recompute(months), Err(RecalcError::BalanceOverflow { month_id: 1 }));
    }

    #[test]
    fn test_overflow_carried_into_next_month_is_an_error() {
        let mut months = vec![
            MonthState::new(1, 0, true, Decimal::MAX),
            MonthState::new(2, 1, false, dec(0)).with_transactions(vec![tx(1, 1, 1, false)]),
        ];

        assert_eq!(
            recompute_from(&mut months, 0),
            Err(RecalcError::BalanceOverflow { month_id: 2 })
        );
    }

    #[test]
    fn test_paid_transactions_never_overflow() {
        let months = vec![MonthState::new(1, 0, true, Decimal::MAX).with_transactions(vec![
            TransactionState::new(1, date(1), Decimal::MAX, true),
        ])];

        let result = recompute(months).unwrap();
        assert_eq!(result[0].closing_balance, Decimal::MAX);
        assert_eq!(find_inconsistency(&result), None);
    }

    #[test]
    fn test_find_inconsistency_flags_overflowing_total() {
        let mut month = MonthState::new(1, 0, true, Decimal::ZERO).with_transactions(vec![
            TransactionState::new(1, date(1), Decimal::MAX, false),
            TransactionState::new(2, date(2), Decimal::MAX, false),
        ]);
        month.closing_balance = Decimal::MAX;

        assert_eq!(month.unpaid_total(), None);
        assert_eq!(find_inconsistency(&[month]), Some(1));
    }
}
