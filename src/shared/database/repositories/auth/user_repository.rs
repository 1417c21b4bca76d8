use sqlx::{postgres::PgRow, PgConnection, Row};
use anyhow::{Context, Result};
use crate::domains::auth::models::user::User;

pub struct UserRepository;

const USER_COLUMNS: &str = "id, email, password_hash, username, created_at, updated_at";

impl UserRepository {
    fn row_to_user(row: &PgRow) -> User {
        User {
            id: row.get::<i64, _>("id") as u64,
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            username: row.get("username"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    /// 사용자 생성 (이메일은 정규화된 값이어야 함)
    /// Insert a user; `email` must already be normalized
    pub async fn create(
        conn: &mut PgConnection,
        email: &str,
        password_hash: &str,
        username: Option<&str>,
    ) -> Result<User> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (email, password_hash, username, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(email)
        .bind(password_hash)
        .bind(username)
        .fetch_one(conn)
        .await
        .context("Failed to create user")?;

        Ok(Self::row_to_user(&row))
    }

    /// 이메일로 조회 (대소문자 무시)
    /// Find by email, case-insensitive
    pub async fn find_by_email(conn: &mut PgConnection, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM users WHERE LOWER(email) = LOWER($1)",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(conn)
        .await
        .context("Failed to fetch user by email")?;

        Ok(row.as_ref().map(Self::row_to_user))
    }

    pub async fn find_by_id(conn: &mut PgConnection, id: u64) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id as i64)
            .fetch_optional(conn)
            .await
            .context("Failed to fetch user by id")?;

        Ok(row.as_ref().map(Self::row_to_user))
    }
}
