use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// 계좌 (월 안의 잔고 단위)
/// Named balance bucket within a month
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[schema(as = Account)]
pub struct Account {
    pub id: u64,
    pub month_id: u64,

    #[schema(example = "Checking")]
    pub name: String,

    /// 현재 잔고
    /// Current balance
    #[schema(value_type = String, example = "1500.00")]
    pub balance: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 계좌 생성 요청
/// Create account request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = CreateAccountRequest)]
pub struct CreateAccountRequest {
    #[schema(example = "Checking")]
    pub name: String,

    #[schema(value_type = String, example = "1500.00")]
    pub balance: Decimal,
}

/// 계좌 수정 요청
/// Update account request
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[schema(as = UpdateAccountRequest)]
pub struct UpdateAccountRequest {
    pub name: Option<String>,

    #[schema(value_type = Option<String>)]
    pub balance: Option<Decimal>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = AccountsResponse)]
pub struct AccountsResponse {
    pub accounts: Vec<Account>,
}
