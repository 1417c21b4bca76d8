use sqlx::{postgres::PgRow, PgConnection, Row};
use anyhow::{Context, Result};
use crate::domains::auth::models::refresh_token::{RefreshToken, RefreshTokenCreate};

/// Refresh Token Repository
/// 원본 토큰은 저장하지 않고 SHA-256 해시만 다룹니다.
pub struct RefreshTokenRepository;

const TOKEN_COLUMNS: &str = "id, user_id, token_hash, expires_at, created_at, updated_at, revoked";

impl RefreshTokenRepository {
    fn row_to_token(row: &PgRow) -> RefreshToken {
        RefreshToken {
            id: row.get::<i64, _>("id") as u64,
            user_id: row.get::<i64, _>("user_id") as u64,
            token_hash: row.get("token_hash"),
            expires_at: row.get("expires_at"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            revoked: row.get("revoked"),
        }
    }

    pub async fn create(conn: &mut PgConnection, data: &RefreshTokenCreate) -> Result<RefreshToken> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO refresh_tokens (user_id, token_hash, expires_at, revoked, created_at, updated_at)
            VALUES ($1, $2, $3, FALSE, NOW(), NOW())
            RETURNING {}
            "#,
            TOKEN_COLUMNS
        ))
        .bind(data.user_id as i64)
        .bind(&data.token_hash)
        .bind(data.expires_at)
        .fetch_one(conn)
        .await
        .context("Failed to create refresh token")?;

        Ok(Self::row_to_token(&row))
    }

    /// 해시로 조회 후 행 잠금 (Rotation 동시 요청 직렬화)
    /// Find by hash and lock the row for the rest of the transaction
    pub async fn find_by_hash_for_update(
        conn: &mut PgConnection,
        token_hash: &str,
    ) -> Result<Option<RefreshToken>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM refresh_tokens WHERE token_hash = $1 FOR UPDATE",
            TOKEN_COLUMNS
        ))
        .bind(token_hash)
        .fetch_optional(conn)
        .await
        .context("Failed to find refresh token")?;

        Ok(row.as_ref().map(Self::row_to_token))
    }

    /// 토큰 하나 무효화; 살아 있던 토큰이었는지 반환
    /// Revoke one token; returns whether a live token was revoked
    pub async fn revoke(conn: &mut PgConnection, token_hash: &str) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE, updated_at = NOW()
            WHERE token_hash = $1 AND revoked = FALSE
            "#,
        )
        .bind(token_hash)
        .execute(conn)
        .await
        .context("Failed to revoke refresh token")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn revoke_all_for_user(conn: &mut PgConnection, user_id: u64) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE refresh_tokens
            SET revoked = TRUE, updated_at = NOW()
            WHERE user_id = $1 AND revoked = FALSE
            "#,
        )
        .bind(user_id as i64)
        .execute(conn)
        .await
        .context("Failed to revoke refresh tokens for user")?;

        Ok(result.rows_affected())
    }

    /// 만료/무효화된 토큰 삭제 (정리 스케줄러)
    pub async fn delete_stale(conn: &mut PgConnection) -> Result<u64> {
        let result = sqlx::query("DELETE FROM refresh_tokens WHERE expires_at < NOW() OR revoked = TRUE")
            .execute(conn)
            .await
            .context("Failed to delete stale refresh tokens")?;

        Ok(result.rows_affected())
    }
}
