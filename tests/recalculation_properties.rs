// =====================================================
// 잔액 재계산 엔진 속성 테스트 (proptest)
// =====================================================
// 목적: 임의의 월 체인에 대해 재계산 규칙이 항상 성립하는지 검증
//
// 검증 항목:
// 1. 재계산 후 체인 불변식 (시작 잔액 앵커, 마감 = 시작 + 미결제 합계)
// 2. 멱등성 (두 번 계산해도 같은 결과, 두 번째 보고서는 비어 있음)
// 3. 거래 정렬 (날짜 오름차순, 같은 날짜는 금액 내림차순)
// 4. 누적 잔액 (미결제 거래만 누적, 마지막 거래 = 마감 잔액)
// 5. 부분 재계산은 앞쪽 월을 건드리지 않고 전체 재계산과 같은 결과
// =====================================================

use budget_api::domains::ledger::engine::{
    find_inconsistency, recompute, recompute_from, MonthState, TransactionState,
};
use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;

/// 센트 단위 정수 → Decimal (소수점 2자리)
fn cents(n: i64) -> Decimal {
    Decimal::new(n, 2)
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

/// (day, amount_cents, paid)
fn transaction_strategy() -> impl Strategy<Value = (u32, i64, bool)> {
    (1u32..=28, -50_000i64..50_000, any::<bool>())
}

/// (started, accounts_total_cents, transactions)
fn month_strategy() -> impl Strategy<Value = (bool, i64, Vec<(u32, i64, bool)>)> {
    (
        any::<bool>(),
        -100_000i64..1_000_000,
        prop::collection::vec(transaction_strategy(), 0..12),
    )
}

/// 월 체인 생성: position은 중복 없이 섞인 순서로 들어옴
fn chain_strategy() -> impl Strategy<Value = Vec<MonthState>> {
    prop::collection::vec(month_strategy(), 1..8)
        .prop_flat_map(|raw| {
            let positions: Vec<i32> = (1..=raw.len() as i32).collect();
            (Just(raw), Just(positions).prop_shuffle())
        })
        .prop_map(|(raw, positions)| build_chain(raw, positions))
}

fn build_chain(raw: Vec<(bool, i64, Vec<(u32, i64, bool)>)>, positions: Vec<i32>) -> Vec<MonthState> {
    let mut next_tx_id = 1u64;

    raw.into_iter()
        .zip(positions)
        .enumerate()
        .map(|(i, ((started, total, txs), position))| {
            let transactions = txs
                .into_iter()
                .map(|(d, amount, paid)| {
                    let tx = TransactionState::new(next_tx_id, day(d), cents(amount), paid);
                    next_tx_id += 1;
                    tx
                })
                .collect();

            MonthState::new(i as u64 + 1, position, started, cents(total))
                .with_transactions(transactions)
        })
        .collect()
}

proptest! {
    #[test]
    fn recomputed_chain_satisfies_invariants(chain in chain_strategy()) {
        let months = recompute(chain).unwrap();

        prop_assert_eq!(find_inconsistency(&months), None);

        // position 오름차순
        for pair in months.windows(2) {
            prop_assert!(pair[0].position < pair[1].position);
        }

        // 첫 번째 월은 항상 계좌 합계에서 시작
        prop_assert_eq!(months[0].starting_balance, months[0].accounts_total);
    }

    #[test]
    fn recompute_is_idempotent(chain in chain_strategy()) {
        let once = recompute(chain).unwrap();
        let mut twice = once.clone();
        let report = recompute_from(&mut twice, 0).unwrap();

        prop_assert!(report.is_empty());
        prop_assert_eq!(report.months_visited, once.len());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn transactions_are_ordered_and_accumulate(chain in chain_strategy()) {
        let months = recompute(chain).unwrap();

        for month in &months {
            for pair in month.transactions.windows(2) {
                let (a, b) = (&pair[0], &pair[1]);
                prop_assert!(a.date < b.date || (a.date == b.date && a.amount >= b.amount));
            }

            let mut running = month.starting_balance;
            for tx in &month.transactions {
                if !tx.paid {
                    running += tx.amount;
                }
                prop_assert_eq!(tx.balance, running);
            }

            prop_assert_eq!(month.closing_balance, running);
            prop_assert_eq!(
                month.closing_balance,
                month.starting_balance + month.unpaid_total().unwrap()
            );
        }
    }

    #[test]
    fn unstarted_months_chain_from_previous_closing(chain in chain_strategy()) {
        let months = recompute(chain).unwrap();

        for pair in months.windows(2) {
            let (prev, month) = (&pair[0], &pair[1]);
            if month.started {
                prop_assert_eq!(month.starting_balance, month.accounts_total);
            } else {
                prop_assert_eq!(month.starting_balance, prev.closing_balance);
            }
        }
    }

    #[test]
    fn partial_recompute_leaves_prefix_and_matches_full(
        chain in chain_strategy(),
        pick in any::<prop::sample::Index>(),
        delta in -100_000i64..100_000,
        extra in transaction_strategy(),
    ) {
        let mut months = recompute(chain).unwrap();
        let k = pick.index(months.len());

        // k번째 월만 변경 (계좌 합계 + 거래 추가)
        months[k].accounts_total += cents(delta);
        let (d, amount, paid) = extra;
        months[k]
            .transactions
            .push(TransactionState::new(1_000_000, day(d), cents(amount), paid));

        let prefix_before: Vec<MonthState> = months[..k].to_vec();

        let mut partial = months.clone();
        recompute_from(&mut partial, k).unwrap();

        prop_assert_eq!(&partial[..k], &prefix_before[..]);
        prop_assert_eq!(find_inconsistency(&partial), None);
        prop_assert_eq!(partial, recompute(months).unwrap());
    }
}

#[test]
fn test_started_month_breaks_the_chain() {
    let months = vec![
        MonthState::new(1, 1, true, cents(100_000)).with_transactions(vec![
            TransactionState::new(1, day(5), cents(-30_000), false),
            TransactionState::new(2, day(5), cents(50_000), false),
            TransactionState::new(3, day(1), cents(-10_000), true),
        ]),
        MonthState::new(2, 2, false, cents(0)),
        MonthState::new(3, 3, true, cents(7_777)),
    ];

    let months = recompute(months).unwrap();

    // 같은 날짜: 수입(+500)이 지출(-300)보다 먼저, 결제 거래는 누적 제외
    let ids: Vec<u64> = months[0].transactions.iter().map(|tx| tx.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
    assert_eq!(months[0].transactions[0].balance, cents(100_000));
    assert_eq!(months[0].transactions[1].balance, cents(150_000));
    assert_eq!(months[0].closing_balance, cents(120_000));

    assert_eq!(months[1].starting_balance, cents(120_000));
    assert_eq!(months[1].closing_balance, cents(120_000));

    assert_eq!(months[2].starting_balance, cents(7_777));
}
