use sqlx::{postgres::PgRow, PgConnection, Row};
use anyhow::{Context, Result};
use crate::domains::budget::models::{BudgetMember, Role};

pub struct MemberRepository;

const MEMBER_COLUMNS: &str = r#"
    m.id, m.budget_id, m.user_id, u.email, u.username, m.role, m.created_at, m.updated_at
"#;

impl MemberRepository {
    fn row_to_member(row: &PgRow) -> Result<BudgetMember> {
        let role: String = row.get("role");
        Ok(BudgetMember {
            id: row.get::<i64, _>("id") as u64,
            budget_id: row.get::<i64, _>("budget_id") as u64,
            user_id: row.get::<i64, _>("user_id") as u64,
            email: row.get("email"),
            username: row.get("username"),
            role: role.parse()?,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    /// 멤버 추가 (이미 멤버면 역할을 덮어씀)
    /// Add member, or overwrite the role of an existing one
    pub async fn upsert(
        conn: &mut PgConnection,
        budget_id: u64,
        user_id: u64,
        role: Role,
    ) -> Result<BudgetMember> {
        sqlx::query(
            r#"
            INSERT INTO budget_members (budget_id, user_id, role, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            ON CONFLICT (budget_id, user_id)
            DO UPDATE SET role = EXCLUDED.role, updated_at = NOW()
            "#,
        )
        .bind(budget_id as i64)
        .bind(user_id as i64)
        .bind(role.as_str())
        .execute(&mut *conn)
        .await
        .context("Failed to add budget member")?;

        Self::find(conn, budget_id, user_id)
            .await?
            .context("Budget member missing right after insert")
    }

    pub async fn find(
        conn: &mut PgConnection,
        budget_id: u64,
        user_id: u64,
    ) -> Result<Option<BudgetMember>> {
        let sql = format!(
            "SELECT {} FROM budget_members m JOIN users u ON u.id = m.user_id \
             WHERE m.budget_id = $1 AND m.user_id = $2",
            MEMBER_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(budget_id as i64)
            .bind(user_id as i64)
            .fetch_optional(&mut *conn)
            .await
            .context("Failed to fetch budget member")?;

        row.as_ref().map(Self::row_to_member).transpose()
    }

    /// 역할만 조회 (접근 제어용)
    /// Role lookup for access checks
    pub async fn find_role(
        conn: &mut PgConnection,
        budget_id: u64,
        user_id: u64,
    ) -> Result<Option<Role>> {
        let role: Option<String> = sqlx::query_scalar(
            "SELECT role FROM budget_members WHERE budget_id = $1 AND user_id = $2",
        )
        .bind(budget_id as i64)
        .bind(user_id as i64)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch member role")?;

        role.map(|r| r.parse::<Role>()).transpose()
    }

    /// 이메일로 멤버 여부 확인 (초대 중복 방지)
    pub async fn is_member_email(conn: &mut PgConnection, budget_id: u64, email: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM budget_members m JOIN users u ON u.id = m.user_id
                WHERE m.budget_id = $1 AND LOWER(u.email) = LOWER($2)
            )
            "#,
        )
        .bind(budget_id as i64)
        .bind(email)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to check membership by email")?;

        Ok(exists)
    }

    pub async fn list(conn: &mut PgConnection, budget_id: u64) -> Result<Vec<BudgetMember>> {
        let sql = format!(
            "SELECT {} FROM budget_members m JOIN users u ON u.id = m.user_id \
             WHERE m.budget_id = $1 ORDER BY m.created_at ASC, m.id ASC",
            MEMBER_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(budget_id as i64)
            .fetch_all(&mut *conn)
            .await
            .context("Failed to list budget members")?;

        rows.iter().map(Self::row_to_member).collect()
    }

    pub async fn count_owners(conn: &mut PgConnection, budget_id: u64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM budget_members WHERE budget_id = $1 AND role = 'OWNER'",
        )
        .bind(budget_id as i64)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to count budget owners")?;

        Ok(count)
    }

    pub async fn update_role(
        conn: &mut PgConnection,
        budget_id: u64,
        user_id: u64,
        role: Role,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE budget_members
            SET role = $3, updated_at = NOW()
            WHERE budget_id = $1 AND user_id = $2
            "#,
        )
        .bind(budget_id as i64)
        .bind(user_id as i64)
        .bind(role.as_str())
        .execute(&mut *conn)
        .await
        .context("Failed to update member role")?;

        Ok(())
    }

    pub async fn remove(conn: &mut PgConnection, budget_id: u64, user_id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM budget_members WHERE budget_id = $1 AND user_id = $2")
            .bind(budget_id as i64)
            .bind(user_id as i64)
            .execute(&mut *conn)
            .await
            .context("Failed to remove budget member")?;

        Ok(result.rows_affected() > 0)
    }
}
