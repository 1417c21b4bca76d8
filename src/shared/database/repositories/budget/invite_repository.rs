use sqlx::{postgres::PgRow, PgConnection, Row};
use anyhow::{Context, Result};
use crate::domains::budget::models::{BudgetInvite, InviteCreate, InviteStatus};

pub struct InviteRepository;

impl InviteRepository {
    fn row_to_invite(row: &PgRow) -> Result<BudgetInvite> {
        let role: String = row.get("role");
        let status: String = row.get("status");
        Ok(BudgetInvite {
            id: row.get::<i64, _>("id") as u64,
            budget_id: row.get::<i64, _>("budget_id") as u64,
            email: row.get("email"),
            role: role.parse()?,
            status: status.parse()?,
            invited_by: row.get::<i64, _>("invited_by") as u64,
            token_hash: row.get("token_hash"),
            expires_at: row.get("expires_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }

    pub async fn create(conn: &mut PgConnection, data: &InviteCreate) -> Result<BudgetInvite> {
        let row = sqlx::query(
            r#"
            INSERT INTO budget_invites
                (budget_id, email, role, status, invited_by, token_hash, expires_at, created_at, updated_at)
            VALUES ($1, $2, $3, 'PENDING', $4, $5, $6, NOW(), NOW())
            RETURNING id, budget_id, email, role, status, invited_by, token_hash, expires_at, created_at, updated_at
            "#,
        )
        .bind(data.budget_id as i64)
        .bind(&data.email)
        .bind(data.role.as_str())
        .bind(data.invited_by as i64)
        .bind(&data.token_hash)
        .bind(data.expires_at)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to create invite")?;

        Self::row_to_invite(&row)
    }

    pub async fn find_by_id(conn: &mut PgConnection, budget_id: u64, id: u64) -> Result<Option<BudgetInvite>> {
        let row = sqlx::query(
            r#"
            SELECT id, budget_id, email, role, status, invited_by, token_hash, expires_at, created_at, updated_at
            FROM budget_invites
            WHERE budget_id = $1 AND id = $2
            "#,
        )
        .bind(budget_id as i64)
        .bind(id as i64)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch invite")?;

        row.as_ref().map(Self::row_to_invite).transpose()
    }

    /// 토큰 해시로 조회 (수락 시 행 잠금)
    /// Find by token hash, locking the row for the accept/decline flow
    pub async fn find_by_token_hash_for_update(
        conn: &mut PgConnection,
        token_hash: &str,
    ) -> Result<Option<BudgetInvite>> {
        let row = sqlx::query(
            r#"
            SELECT id, budget_id, email, role, status, invited_by, token_hash, expires_at, created_at, updated_at
            FROM budget_invites
            WHERE token_hash = $1
            FOR UPDATE
            "#,
        )
        .bind(token_hash)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch invite by token")?;

        row.as_ref().map(Self::row_to_invite).transpose()
    }

    /// 대기 중인(만료 전) 초대 목록
    /// Pending, unexpired invites of a budget
    pub async fn list_pending(conn: &mut PgConnection, budget_id: u64) -> Result<Vec<BudgetInvite>> {
        let rows = sqlx::query(
            r#"
            SELECT id, budget_id, email, role, status, invited_by, token_hash, expires_at, created_at, updated_at
            FROM budget_invites
            WHERE budget_id = $1 AND status = 'PENDING' AND expires_at > NOW()
            ORDER BY created_at DESC
            "#,
        )
        .bind(budget_id as i64)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to list pending invites")?;

        rows.iter().map(Self::row_to_invite).collect()
    }

    /// 같은 이메일의 대기 중 초대를 REVOKED로 변경 (재초대 시)
    /// Revoke pending invites for an email; returns the revoked rows
    pub async fn revoke_pending_for_email(
        conn: &mut PgConnection,
        budget_id: u64,
        email: &str,
    ) -> Result<Vec<BudgetInvite>> {
        let rows = sqlx::query(
            r#"
            UPDATE budget_invites
            SET status = 'REVOKED', updated_at = NOW()
            WHERE budget_id = $1 AND LOWER(email) = LOWER($2) AND status = 'PENDING'
            RETURNING id, budget_id, email, role, status, invited_by, token_hash, expires_at, created_at, updated_at
            "#,
        )
        .bind(budget_id as i64)
        .bind(email)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to revoke previous invites")?;

        rows.iter().map(Self::row_to_invite).collect()
    }

    pub async fn set_status(
        conn: &mut PgConnection,
        id: u64,
        status: InviteStatus,
    ) -> Result<BudgetInvite> {
        let row = sqlx::query(
            r#"
            UPDATE budget_invites
            SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, budget_id, email, role, status, invited_by, token_hash, expires_at, created_at, updated_at
            "#,
        )
        .bind(id as i64)
        .bind(status.as_str())
        .fetch_one(&mut *conn)
        .await
        .context("Failed to update invite status")?;

        Self::row_to_invite(&row)
    }
}
