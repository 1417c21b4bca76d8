// =====================================================
// 잔액 재계산 벤치마크 (criterion)
// =====================================================
// 목적: 월 수/거래 수에 따른 재계산 비용 측정
//
// - full: 전체 체인 재계산 (recompute_from(0))
// - tail: 마지막 월만 바뀐 경우의 부분 재계산
//
// 실행: cargo bench --bench recalculation_benchmark
// =====================================================

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;

use budget_api::domains::ledger::engine::{recompute, recompute_from, MonthState, TransactionState};

const CHAIN_SIZES: [usize; 3] = [12, 60, 240];
const TRANSACTIONS_PER_MONTH: usize = 80;

/// 결정적인 테스트 체인 생성 (12개월마다 started 월)
fn build_chain(month_count: usize) -> Vec<MonthState> {
    let mut tx_id = 1u64;

    (0..month_count)
        .map(|m| {
            let transactions = (0..TRANSACTIONS_PER_MONTH)
                .map(|t| {
                    let day = (t % 28) as u32 + 1;
                    let date = NaiveDate::from_ymd_opt(2024, 1, day).expect("valid day");
                    let amount = Decimal::new(((t as i64 * 7_919) % 20_000) - 10_000, 2);
                    let tx = TransactionState::new(tx_id, date, amount, t % 5 == 0);
                    tx_id += 1;
                    tx
                })
                .collect();

            MonthState::new(m as u64 + 1, m as i32 + 1, m % 12 == 0, Decimal::new(250_000, 2))
                .with_transactions(transactions)
        })
        .collect()
}

fn bench_full_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute_full");

    for &size in CHAIN_SIZES.iter() {
        let chain = build_chain(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &chain, |b, chain| {
            b.iter(|| {
                let mut months = chain.clone();
                black_box(recompute_from(&mut months, 0))
            });
        });
    }

    group.finish();
}

fn bench_tail_recompute(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute_tail");

    for &size in CHAIN_SIZES.iter() {
        // 이미 일관된 체인에서 마지막 월만 변경
        let mut chain = recompute(build_chain(size)).expect("chain within range");
        let last = chain.len() - 1;
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid day");
        chain[last]
            .transactions
            .push(TransactionState::new(u64::MAX, date, Decimal::ONE, false));

        group.bench_with_input(BenchmarkId::from_parameter(size), &chain, |b, chain| {
            b.iter(|| {
                let mut months = chain.clone();
                black_box(recompute_from(&mut months, last))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_full_recompute, bench_tail_recompute);
criterion_main!(benches);
