// =====================================================
// Access Guard - 예산 접근 제어
// =====================================================
// 역할: NestJS의 RolesGuard 같은 것
//
// - 멤버가 아니면 BudgetNotFound (404) → 예산 존재 여부를 숨김
// - 멤버지만 역할이 부족하면 Forbidden (403)
// - 변경 작업은 require_role_for_update: 예산 행을 먼저 잠가
//   같은 예산의 변경 트랜잭션을 한 번에 하나씩 실행
//   (재계산 체인, 마지막 OWNER 검사가 항상 최신 커밋을 봄)
// =====================================================

use sqlx::PgConnection;
use crate::shared::database::{BudgetRepository, MemberRepository};
use crate::shared::errors::BudgetError;
use crate::domains::budget::models::Role;

/// 최소 역할 확인 후 호출자의 실제 역할 반환
/// Require at least `required`; returns the caller's role
pub async fn require_role(
    conn: &mut PgConnection,
    budget_id: u64,
    user_id: u64,
    required: Role,
) -> Result<Role, BudgetError> {
    let role = MemberRepository::find_role(conn, budget_id, user_id)
        .await?
        .ok_or(BudgetError::BudgetNotFound { id: budget_id })?;

    check(role, required)
}

/// 예산 행을 잠근 뒤 역할 확인 (트랜잭션 안에서 호출)
/// Lock the budget row, then require at least `required`
pub async fn require_role_for_update(
    conn: &mut PgConnection,
    budget_id: u64,
    user_id: u64,
    required: Role,
) -> Result<Role, BudgetError> {
    if !BudgetRepository::lock(conn, budget_id).await? {
        return Err(BudgetError::BudgetNotFound { id: budget_id });
    }

    require_role(conn, budget_id, user_id, required).await
}

/// 역할 비교 (DB 없이 판단)
/// Pure role check
pub fn check(role: Role, required: Role) -> Result<Role, BudgetError> {
    if role.allows(required) {
        Ok(role)
    } else {
        Err(BudgetError::Forbidden { required })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_allows_higher_roles() {
        assert_eq!(check(Role::Owner, Role::Viewer).unwrap(), Role::Owner);
        assert_eq!(check(Role::Editor, Role::Editor).unwrap(), Role::Editor);
    }

    #[test]
    fn test_check_rejects_lower_roles() {
        match check(Role::Viewer, Role::Editor) {
            Err(BudgetError::Forbidden { required }) => assert_eq!(required, Role::Editor),
            other => panic!("expected Forbidden, got {:?}", other),
        }
        assert!(check(Role::Editor, Role::Owner).is_err());
    }
}
