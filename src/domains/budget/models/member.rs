use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use chrono::{DateTime, Utc};
use crate::domains::budget::models::Role;

/// 예산 멤버
/// Budget membership
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[schema(as = BudgetMember)]
pub struct BudgetMember {
    pub id: u64,
    pub budget_id: u64,
    pub user_id: u64,

    /// 사용자 이메일 (users 조인)
    #[schema(example = "user@example.com")]
    pub email: String,

    pub username: Option<String>,
    pub role: Role,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 역할 변경 요청
/// Change member role request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = UpdateMemberRequest)]
pub struct UpdateMemberRequest {
    pub role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = MembersResponse)]
pub struct MembersResponse {
    pub members: Vec<BudgetMember>,
}
