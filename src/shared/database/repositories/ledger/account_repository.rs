use sqlx::{postgres::PgRow, PgConnection, Row};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::collections::HashMap;
use crate::domains::ledger::models::Account;

pub struct AccountRepository;

impl AccountRepository {
    fn row_to_account(row: &PgRow) -> Account {
        Account {
            id: row.get::<i64, _>("id") as u64,
            month_id: row.get::<i64, _>("month_id") as u64,
            name: row.get("name"),
            balance: row.get("balance"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    pub async fn create(conn: &mut PgConnection, month_id: u64, name: &str, balance: Decimal) -> Result<Account> {
        let row = sqlx::query(
            r#"
            INSERT INTO accounts (month_id, name, balance, created_at, updated_at)
            VALUES ($1, $2, $3, NOW(), NOW())
            RETURNING id, month_id, name, balance, created_at, updated_at
            "#,
        )
        .bind(month_id as i64)
        .bind(name)
        .bind(balance)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to create account")?;

        Ok(Self::row_to_account(&row))
    }

    /// 이전 월의 계좌를 새 월로 복사 (이름 + 잔고)
    /// Copy accounts from one month into another
    pub async fn copy_to_month(conn: &mut PgConnection, from_month_id: u64, to_month_id: u64) -> Result<Vec<Account>> {
        let rows = sqlx::query(
            r#"
            INSERT INTO accounts (month_id, name, balance, created_at, updated_at)
            SELECT $2, name, balance, NOW(), NOW()
            FROM accounts
            WHERE month_id = $1
            ORDER BY id ASC
            RETURNING id, month_id, name, balance, created_at, updated_at
            "#,
        )
        .bind(from_month_id as i64)
        .bind(to_month_id as i64)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to copy accounts")?;

        Ok(rows.iter().map(Self::row_to_account).collect())
    }

    /// 예산 안의 계좌 조회 (월 조인으로 소속 확인)
    /// Find an account that belongs to the given budget
    pub async fn find_in_budget(conn: &mut PgConnection, budget_id: u64, account_id: u64) -> Result<Option<Account>> {
        let row = sqlx::query(
            r#"
            SELECT a.id, a.month_id, a.name, a.balance, a.created_at, a.updated_at
            FROM accounts a
            JOIN months m ON m.id = a.month_id
            WHERE m.budget_id = $1 AND a.id = $2
            "#,
        )
        .bind(budget_id as i64)
        .bind(account_id as i64)
        .fetch_optional(&mut *conn)
        .await
        .context("Failed to fetch account")?;

        Ok(row.as_ref().map(Self::row_to_account))
    }

    pub async fn list_by_month(conn: &mut PgConnection, month_id: u64) -> Result<Vec<Account>> {
        let rows = sqlx::query(
            r#"
            SELECT id, month_id, name, balance, created_at, updated_at
            FROM accounts
            WHERE month_id = $1
            ORDER BY id ASC
            "#,
        )
        .bind(month_id as i64)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to list accounts")?;

        Ok(rows.iter().map(Self::row_to_account).collect())
    }

    /// 예산의 월별 계좌 잔고 합계 (계좌가 없는 월은 포함되지 않음)
    /// Per-month account totals for a budget
    pub async fn totals_by_month(conn: &mut PgConnection, budget_id: u64) -> Result<HashMap<u64, Decimal>> {
        let rows = sqlx::query(
            r#"
            SELECT a.month_id, COALESCE(SUM(a.balance), 0) AS total
            FROM accounts a
            JOIN months m ON m.id = a.month_id
            WHERE m.budget_id = $1
            GROUP BY a.month_id
            "#,
        )
        .bind(budget_id as i64)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to sum account balances")?;

        Ok(rows
            .iter()
            .map(|row| (row.get::<i64, _>("month_id") as u64, row.get::<Decimal, _>("total")))
            .collect())
    }

    pub async fn update(conn: &mut PgConnection, account_id: u64, name: &str, balance: Decimal) -> Result<Account> {
        let row = sqlx::query(
            r#"
            UPDATE accounts
            SET name = $2, balance = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING id, month_id, name, balance, created_at, updated_at
            "#,
        )
        .bind(account_id as i64)
        .bind(name)
        .bind(balance)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to update account")?;

        Ok(Self::row_to_account(&row))
    }

    pub async fn delete(conn: &mut PgConnection, account_id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(account_id as i64)
            .execute(&mut *conn)
            .await
            .context("Failed to delete account")?;

        Ok(result.rows_affected() > 0)
    }
}
