use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use crate::domains::ledger::models::{Account, Transaction};

// =====================================================
// Month 모델
// =====================================================
// 역할: 예산 안의 한 기간 (계좌와 거래를 보유)
//
// - position: 예산 내 순서 (체인 순서)
// - started: true면 계좌 잔고 합계에서 시작 잔액을 가져옴
// - starting_balance / closing_balance: 재계산 엔진이 채우는 파생 값
// =====================================================

/// 월 정보
/// Month within a budget
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[schema(as = Month)]
pub struct Month {
    pub id: u64,
    pub budget_id: u64,

    /// Position in the budget's month chain
    /// 예산 내 순서
    pub position: i32,

    /// Display label (e.g. "2024-03")
    #[schema(example = "2024-03")]
    pub label: String,

    /// Started months anchor the balance chain on their account total
    /// 시작된 월은 계좌 합계를 시작 잔액으로 사용
    pub started: bool,

    #[schema(value_type = String, example = "1500.00")]
    pub starting_balance: Decimal,

    #[schema(value_type = String, example = "1320.50")]
    pub closing_balance: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 월 생성 요청
/// Create month request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[schema(as = CreateMonthRequest)]
pub struct CreateMonthRequest {
    /// Label (defaults to the month after the previous one)
    #[schema(example = "2024-04")]
    pub label: Option<String>,

    /// Whether the month anchors the chain (default false)
    pub started: Option<bool>,
}

/// 월 수정 요청
/// Update month request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[schema(as = UpdateMonthRequest)]
pub struct UpdateMonthRequest {
    pub label: Option<String>,
    pub started: Option<bool>,
}

/// 월 상세 응답 (계좌 + 거래 포함)
/// Month detail with accounts and transactions in running-balance order
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = MonthDetailResponse)]
pub struct MonthDetailResponse {
    pub month: Month,
    pub accounts: Vec<Account>,
    pub transactions: Vec<Transaction>,
}

/// 월 목록 응답
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = MonthsResponse)]
pub struct MonthsResponse {
    pub months: Vec<Month>,
}

/// 월 생성 시 사용하는 내부 모델 (DB 저장용)
/// Internal model for inserting months
#[derive(Debug)]
pub struct MonthCreate {
    pub budget_id: u64,
    pub position: i32,
    pub label: String,
    pub started: bool,
}

/// 월 레이블 최대 길이 (months.label)
pub const MAX_LABEL_LEN: usize = 50;

/// 현재 월 레이블 ("YYYY-MM")
/// Label of the current calendar month
pub fn current_label() -> String {
    let today = Utc::now().date_naive();
    format!("{:04}-{:02}", today.year(), today.month())
}

/// "YYYY-MM" 레이블의 다음 달 계산
/// Next calendar month after a "YYYY-MM" label
///
/// 형식이 다르면 None (사용자가 임의 레이블을 쓴 경우)
pub fn next_label(label: &str) -> Option<String> {
    let first_day = NaiveDate::parse_from_str(&format!("{}-01", label.trim()), "%Y-%m-%d").ok()?;
    let (year, month) = match first_day.month() {
        12 => (first_day.year() + 1, 1),
        m => (first_day.year(), m + 1),
    };
    Some(format!("{:04}-{:02}", year, month))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_label() {
        assert_eq!(next_label("2024-03").as_deref(), Some("2024-04"));
        assert_eq!(next_label("2024-12").as_deref(), Some("2025-01"));
        assert_eq!(next_label(" 2023-09 ").as_deref(), Some("2023-10"));
    }

    #[test]
    fn test_next_label_rejects_free_text() {
        assert_eq!(next_label("March"), None);
        assert_eq!(next_label("2024-13"), None);
    }

    #[test]
    fn test_current_label_shape() {
        let label = current_label();
        assert_eq!(label.len(), 7);
        assert!(next_label(&label).is_some());
    }
}
