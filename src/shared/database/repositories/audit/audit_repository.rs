use sqlx::{postgres::PgRow, PgConnection, Row};
use anyhow::{Context, Result};
use serde_json::Value;
use crate::domains::audit::models::{AuditAction, AuditEntry, AuditLog, EntityType};

pub struct AuditRepository;

impl AuditRepository {
    fn row_to_log(row: &PgRow) -> Result<AuditLog> {
        let entity_type: String = row.get("entity_type");
        let action: String = row.get("action");

        Ok(AuditLog {
            id: row.get::<i64, _>("id") as u64,
            budget_id: row.get::<i64, _>("budget_id") as u64,
            user_id: row.get::<i64, _>("user_id") as u64,
            entity_type: EntityType::parse(&entity_type)
                .with_context(|| format!("Unknown entity type in audit log: {}", entity_type))?,
            entity_id: row.get::<i64, _>("entity_id") as u64,
            action: AuditAction::parse(&action)
                .with_context(|| format!("Unknown audit action: {}", action))?,
            before: row.get("before"),
            after: row.get("after"),
            diff: row.get("diff"),
            created_at: row.get("created_at"),
        })
    }

    pub async fn insert(conn: &mut PgConnection, entry: &AuditEntry, diff: &Value) -> Result<u64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO audit_logs
                (budget_id, user_id, entity_type, entity_id, action, before, after, diff, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, NOW())
            RETURNING id
            "#,
        )
        .bind(entry.budget_id as i64)
        .bind(entry.user_id as i64)
        .bind(entry.entity_type.as_str())
        .bind(entry.entity_id as i64)
        .bind(entry.action.as_str())
        .bind(&entry.before)
        .bind(&entry.after)
        .bind(diff)
        .fetch_one(&mut *conn)
        .await
        .context("Failed to insert audit log")?;

        Ok(id as u64)
    }

    /// 예산의 감사 로그 (최신순)
    /// Audit logs of a budget, newest first
    pub async fn list(
        conn: &mut PgConnection,
        budget_id: u64,
        entity_type: Option<EntityType>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AuditLog>> {
        let rows = sqlx::query(
            r#"
            SELECT id, budget_id, user_id, entity_type, entity_id, action, before, after, diff, created_at
            FROM audit_logs
            WHERE budget_id = $1 AND ($2::TEXT IS NULL OR entity_type = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(budget_id as i64)
        .bind(entity_type.map(|t| t.as_str()))
        .bind(limit)
        .bind(offset)
        .fetch_all(&mut *conn)
        .await
        .context("Failed to list audit logs")?;

        rows.iter().map(Self::row_to_log).collect()
    }
}
