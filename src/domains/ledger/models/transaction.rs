use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

// =====================================================
// Transaction 모델
// =====================================================
// 역할: 월 안의 날짜가 있는 현금 이동
//
// - amount: 부호 있는 금액 (수입 +, 지출 -)
// - paid: true면 이미 계좌 잔고에 반영됨 (누적 잔액에 더하지 않음)
// - balance: 재계산 엔진이 채우는 누적 잔액
// =====================================================

/// 거래 정보
/// Dated, signed cash movement within a month
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[schema(as = Transaction)]
pub struct Transaction {
    pub id: u64,
    pub month_id: u64,

    #[schema(example = "Rent")]
    pub description: String,

    #[schema(value_type = String, example = "2024-03-01")]
    pub date: NaiveDate,

    /// Signed amount (income positive, expense negative)
    /// 부호 있는 금액
    #[schema(value_type = String, example = "-950.00")]
    pub amount: Decimal,

    /// Already reflected in account balances
    /// 이미 계좌 잔고에 반영된 거래
    pub paid: bool,

    /// Running balance after this transaction (derived)
    /// 누적 잔액 (파생 값)
    #[schema(value_type = String, example = "550.00")]
    pub balance: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 거래 생성 요청
/// Create transaction request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = CreateTransactionRequest)]
pub struct CreateTransactionRequest {
    #[schema(example = "Rent")]
    pub description: String,

    /// Date in YYYY-MM-DD
    #[schema(example = "2024-03-01")]
    pub date: String,

    #[schema(value_type = String, example = "-950.00")]
    pub amount: Decimal,

    pub paid: Option<bool>,
}

/// 거래 수정 요청 (보낸 필드만 변경)
/// Update transaction request (only provided fields change)
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[schema(as = UpdateTransactionRequest)]
pub struct UpdateTransactionRequest {
    pub description: Option<String>,
    pub date: Option<String>,

    #[schema(value_type = Option<String>)]
    pub amount: Option<Decimal>,

    pub paid: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = TransactionsResponse)]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
}

/// 거래 저장용 내부 모델 (검증 완료된 값)
/// Validated values for inserting/updating a transaction
#[derive(Debug, Clone)]
pub struct TransactionWrite {
    pub description: String,
    pub date: NaiveDate,
    pub amount: Decimal,
    pub paid: bool,
}

/// "YYYY-MM-DD" 날짜 파싱
/// Parse a transaction date
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date("03/01/2024"), None);
    }
}
