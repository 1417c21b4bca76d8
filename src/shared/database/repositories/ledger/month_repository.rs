use sqlx::{postgres::PgRow, PgConnection, Row};
use anyhow::{Context, Result};
use rust_decimal::Decimal;
use crate::domains::ledger::models::{Month, MonthCreate};

pub struct MonthRepository;

const MONTH_COLUMNS: &str =
    "id, budget_id, position, label, started, starting_balance, closing_balance, created_at, updated_at";

impl MonthRepository {
    fn row_to_month(row: &PgRow) -> Month {
        Month {
            id: row.get::<i64, _>("id") as u64,
            budget_id: row.get::<i64, _>("budget_id") as u64,
            position: row.get("position"),
            label: row.get("label"),
            started: row.get("started"),
            starting_balance: row.get("starting_balance"),
            closing_balance: row.get("closing_balance"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    pub async fn create(conn: &mut PgConnection, data: &MonthCreate) -> Result<Month> {
        let sql = format!(
            "INSERT INTO months (budget_id, position, label, started, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, NOW(), NOW()) RETURNING {}",
            MONTH_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(data.budget_id as i64)
            .bind(data.position)
            .bind(&data.label)
            .bind(data.started)
            .fetch_one(&mut *conn)
            .await
            .context("Failed to create month")?;

        Ok(Self::row_to_month(&row))
    }

    /// 예산 안의 월 조회 (다른 예산의 월 ID면 None)
    /// Find a month that belongs to the given budget
    pub async fn find_in_budget(conn: &mut PgConnection, budget_id: u64, month_id: u64) -> Result<Option<Month>> {
        let sql = format!(
            "SELECT {} FROM months WHERE budget_id = $1 AND id = $2",
            MONTH_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(budget_id as i64)
            .bind(month_id as i64)
            .fetch_optional(&mut *conn)
            .await
            .context("Failed to fetch month")?;

        Ok(row.as_ref().map(Self::row_to_month))
    }

    /// position 오름차순 월 목록
    /// Months of a budget ordered by position
    pub async fn list(conn: &mut PgConnection, budget_id: u64) -> Result<Vec<Month>> {
        let sql = format!(
            "SELECT {} FROM months WHERE budget_id = $1 ORDER BY position ASC",
            MONTH_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(budget_id as i64)
            .fetch_all(&mut *conn)
            .await
            .context("Failed to list months")?;

        Ok(rows.iter().map(Self::row_to_month).collect())
    }

    /// 마지막 월 (새 월 추가 시 position/레이블 계산용)
    pub async fn find_last(conn: &mut PgConnection, budget_id: u64) -> Result<Option<Month>> {
        let sql = format!(
            "SELECT {} FROM months WHERE budget_id = $1 ORDER BY position DESC LIMIT 1",
            MONTH_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(budget_id as i64)
            .fetch_optional(&mut *conn)
            .await
            .context("Failed to fetch last month")?;

        Ok(row.as_ref().map(Self::row_to_month))
    }

    pub async fn count(conn: &mut PgConnection, budget_id: u64) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM months WHERE budget_id = $1")
            .bind(budget_id as i64)
            .fetch_one(&mut *conn)
            .await
            .context("Failed to count months")?;

        Ok(count)
    }

    pub async fn update(
        conn: &mut PgConnection,
        month_id: u64,
        label: &str,
        started: bool,
    ) -> Result<Month> {
        let sql = format!(
            "UPDATE months SET label = $2, started = $3, updated_at = NOW() WHERE id = $1 RETURNING {}",
            MONTH_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(month_id as i64)
            .bind(label)
            .bind(started)
            .fetch_one(&mut *conn)
            .await
            .context("Failed to update month")?;

        Ok(Self::row_to_month(&row))
    }

    /// 재계산 결과 저장 (파생 값만 변경, updated_at은 그대로)
    /// Persist derived balances
    pub async fn update_balances(
        conn: &mut PgConnection,
        month_id: u64,
        starting_balance: Decimal,
        closing_balance: Decimal,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE months
            SET starting_balance = $2, closing_balance = $3
            WHERE id = $1
            "#,
        )
        .bind(month_id as i64)
        .bind(starting_balance)
        .bind(closing_balance)
        .execute(&mut *conn)
        .await
        .context("Failed to update month balances")?;

        Ok(())
    }

    pub async fn delete(conn: &mut PgConnection, month_id: u64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM months WHERE id = $1")
            .bind(month_id as i64)
            .execute(&mut *conn)
            .await
            .context("Failed to delete month")?;

        Ok(result.rows_affected() > 0)
    }
}
