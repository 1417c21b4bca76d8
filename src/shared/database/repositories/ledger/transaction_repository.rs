use sqlx::{postgres::PgRow, PgConnection, Row};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use crate::domains::ledger::models::{Transaction, TransactionWrite};

pub struct TransactionRepository;

const TRANSACTION_COLUMNS: &str =
    "t.id, t.month_id, t.description, t.date, t.amount, t.paid, t.balance, t.created_at, t.updated_at";

impl TransactionRepository {
    fn row_to_transaction(row: &PgRow) -> Transaction {
        Transaction {
            id: row.get::<i64, _>("id") as u64,
            month_id: row.get::<i64, _>("month_id") as u64,
            description: row.get("description"),
            date: row.get("date"),
            amount: row.get("amount"),
            paid: row.get("paid"),
            balance: row.get("balance"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    pub async fn create(conn: &mut PgConnection, month_id: u64, data: &TransactionWrite) -> Result<Transaction> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions AS t (month_id, description, date, amount, paid, balance, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, 0, NOW(), NOW())
            RETURNING t.id, t.month_id, t.description, t.date, t.amount, t.paid, t.balance, t.created_at, t.updated_at
            "#,
        )
        .bind(month_id as i64)
        .bind(&data.description)
        .bind(data.date)
        .bind(data.amount)
        .bind(data.paid)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to create transaction")?;

        Ok(Self::row_to_transaction(&row))
    }

    /// 예산 안의 거래 조회
    /// Find a transaction that belongs to the given budget
    pub async fn find_in_budget(
        conn: &mut PgConnection,
        budget_id: u64,
        transaction_id: u64,
    ) -> Result<Option<Transaction>> {
        let sql = format!(
            "SELECT {} FROM transactions t JOIN months m ON m.id = t.month_id \
             WHERE m.budget_id = $1 AND t.id = $2",
            TRANSACTION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(budget_id as i64)
            .bind(transaction_id as i64)
            .fetch_optional(&mut *conn)
            .await
            .context("Failed to fetch transaction")?;

        Ok(row.as_ref().map(Self::row_to_transaction))
    }

    /// 월의 거래 목록 (누적 잔액 순서: 날짜 오름차순, 금액 내림차순, id)
    /// Transactions of a month in running-balance order
    pub async fn list_by_month(conn: &mut PgConnection, month_id: u64) -> Result<Vec<Transaction>> {
        let sql = format!(
            "SELECT {} FROM transactions t WHERE t.month_id = $1 \
             ORDER BY t.date ASC, t.amount DESC, t.id ASC",
            TRANSACTION_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(month_id as i64)
            .fetch_all(&mut *conn)
            .await
            .context("Failed to list transactions")?;

        Ok(rows.iter().map(Self::row_to_transaction).collect())
    }

    /// 예산 전체 거래 (재계산 체인 구성용, id 순)
    /// All transactions of a budget, for building the recalculation chain
    pub async fn list_by_budget(conn: &mut PgConnection, budget_id: u64) -> Result<Vec<Transaction>> {
        let sql = format!(
            "SELECT {} FROM transactions t JOIN months m ON m.id = t.month_id \
             WHERE m.budget_id = $1 ORDER BY t.id ASC",
            TRANSACTION_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(budget_id as i64)
            .fetch_all(&mut *conn)
            .await
            .context("Failed to list budget transactions")?;

        Ok(rows.iter().map(Self::row_to_transaction).collect())
    }

    pub async fn update(conn: &mut PgConnection, transaction_id: u64, data: &TransactionWrite) -> Result<Transaction> {
        let row = sqlx::query(
            r#"
            UPDATE transactions AS t
            SET description = $2, date = $3, amount = $4, paid = $5, updated_at = NOW()
            WHERE t.id = $1
            RETURNING t.id, t.month_id, t.description, t.date, t.amount, t.paid, t.balance, t.created_at, t.updated_at
            "#,
        )
        .bind(transaction_id as i64)
        .bind(&data.description)
        .bind(data.date)
        .bind(data.amount)
        .bind(data.paid)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to update transaction")?;

        Ok(Self::row_to_transaction(&row))
    }

    /// 누적 잔액 저장 (파생 값)
    pub async fn update_balance(conn: &mut PgConnection, transaction_id: u64, balance: Decimal) -> Result<()> {
        sqlx::query("UPDATE transactions SET balance = $2 WHERE id = $1")
            .bind(transaction_id as i64)
            .bind(balance)
            .execute(&mut *conn)
            .await
            .context("Failed to update transaction balance")?;

        Ok(())
    }

    pub async fn delete(conn: &mut PgConnection, transaction_id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(transaction_id as i64)
            .execute(&mut *conn)
            .await
            .context("Failed to delete transaction")?;

        Ok(result.rows_affected() > 0)
    }
}
