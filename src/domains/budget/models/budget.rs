use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};
use crate::domains::budget::models::Role;

/// 예산 정보
/// Budget: named collection of months shared by members
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[schema(as = Budget)]
pub struct Budget {
    pub id: u64,

    #[schema(example = "Household")]
    pub name: String,

    /// 생성한 사용자 ID
    /// User that created the budget
    pub created_by: u64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 내 역할이 포함된 예산 요약
/// Budget together with the caller's role
#[derive(Debug, Serialize, ToSchema, Clone)]
#[schema(as = BudgetSummary)]
pub struct BudgetSummary {
    #[serde(flatten)]
    pub budget: Budget,
    pub role: Role,
}

/// 예산 생성 요청
/// Create budget request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = CreateBudgetRequest)]
pub struct CreateBudgetRequest {
    #[schema(example = "Household")]
    pub name: String,

    /// 첫 번째 월 레이블 (기본값: 현재 "YYYY-MM")
    /// Label of the first month (defaults to the current "YYYY-MM")
    #[schema(example = "2024-03")]
    pub first_month: Option<String>,
}

/// 예산 이름 변경 요청
/// Rename budget request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = UpdateBudgetRequest)]
pub struct UpdateBudgetRequest {
    #[schema(example = "Family budget")]
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = BudgetsResponse)]
pub struct BudgetsResponse {
    pub budgets: Vec<BudgetSummary>,
}
