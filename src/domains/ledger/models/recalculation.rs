use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::ledger::engine::RecalcReport;

/// 재계산 결과 응답
/// Result of a recalculation pass
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecalculationResponse {
    /// 잔액이 바뀐 월 ID
    pub changed_months: Vec<u64>,

    /// 누적 잔액이 바뀐 거래 ID
    pub changed_transactions: Vec<u64>,

    /// 재계산한 월 수
    pub months_visited: usize,
}

impl From<RecalcReport> for RecalculationResponse {
    fn from(report: RecalcReport) -> Self {
        Self {
            changed_months: report.changed_months,
            changed_transactions: report.changed_transactions,
            months_visited: report.months_visited,
        }
    }
}
