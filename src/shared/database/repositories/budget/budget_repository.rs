use sqlx::{postgres::PgRow, PgConnection, Row};
use anyhow::{Context, Result};
use crate::domains::budget::models::{Budget, BudgetSummary, Role};

// =====================================================
// BudgetRepository
// =====================================================
// 모든 메서드가 커넥션을 인자로 받음
// → 서비스가 하나의 DB 트랜잭션 안에서 변경 + 감사 로그를 함께 기록
// =====================================================

pub struct BudgetRepository;

impl BudgetRepository {
    fn row_to_budget(row: &PgRow) -> Budget {
        Budget {
            id: row.get::<i64, _>("id") as u64,
            name: row.get("name"),
            created_by: row.get::<i64, _>("created_by") as u64,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    pub async fn create(conn: &mut PgConnection, name: &str, created_by: u64) -> Result<Budget> {
        let row = sqlx::query(
            r#"
            INSERT INTO budgets (name, created_by, created_at, updated_at)
            VALUES ($1, $2, NOW(), NOW())
            RETURNING id, name, created_by, created_at, updated_at
            "#,
        )
        .bind(name)
        .bind(created_by as i64)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to create budget")?;

        Ok(Self::row_to_budget(&row))
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: u64) -> Result<Option<Budget>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, created_by, created_at, updated_at
            FROM budgets
            WHERE id = $1
            "#,
        )
        .bind(id as i64)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch budget")?;

        Ok(row.as_ref().map(Self::row_to_budget))
    }

    /// 예산 행 잠금 (트랜잭션 종료까지 유지)
    /// Lock the budget row; concurrent mutations of one budget run one at a time
    ///
    /// # Returns
    /// 예산이 존재하면 true
    pub async fn lock(conn: &mut PgConnection, id: u64) -> Result<bool> {
        let row = sqlx::query("SELECT id FROM budgets WHERE id = $1 FOR UPDATE")
            .bind(id as i64)
            .fetch_optional(&mut *conn)
            .await
            .context("Failed to lock budget")?;

        Ok(row.is_some())
    }

    /// 사용자가 멤버인 예산 목록 (역할 포함)
    /// Budgets the user is a member of, with the user's role
    pub async fn list_for_user(conn: &mut PgConnection, user_id: u64) -> Result<Vec<BudgetSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT b.id, b.name, b.created_by, b.created_at, b.updated_at, m.role
            FROM budgets b
            JOIN budget_members m ON m.budget_id = b.id
            WHERE m.user_id = $1
            ORDER BY b.created_at ASC, b.id ASC
            "#,
        )
        .bind(user_id as i64)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to list budgets for user")?;

        rows.iter()
            .map(|row| {
                let role: String = row.get("role");
                Ok(BudgetSummary {
                    budget: Self::row_to_budget(row),
                    role: role.parse::<Role>()?,
                })
            })
            .collect()
    }

    pub async fn rename(conn: &mut PgConnection, id: u64, name: &str) -> Result<Budget> {
        let row = sqlx::query(
            r#"
            UPDATE budgets
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_by, created_at, updated_at
            "#,
        )
        .bind(id as i64)
        .bind(name)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to rename budget")?;

        Ok(Self::row_to_budget(&row))
    }

    /// 예산 삭제 (멤버/초대/월/계좌/거래는 FK CASCADE)
    /// Delete budget; dependent rows cascade
    pub async fn delete(conn: &mut PgConnection, id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM budgets WHERE id = $1")
            .bind(id as i64)
            .execute(&mut *conn)
            .await
            .context("Failed to delete budget")?;

        Ok(result.rows_affected() > 0)
    }
}
