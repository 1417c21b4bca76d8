use crate::shared::database::{AuditRepository, Database};
use crate::shared::errors::BudgetError;
use crate::domains::audit::models::{AuditAction, AuditEntry, AuditLog, AuditQuery, EntityType};
use crate::domains::budget::models::Role;
use crate::domains::budget::services::access;
use serde_json::{json, Map, Value};
use sqlx::PgConnection;

/// 감사 로그 조회 기본/최대 개수
const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 200;

/// diff에서 제외하는 필드 (타임스탬프만 바뀐 것은 변경으로 보지 않음)
/// Fields ignored when diffing snapshots
const IGNORED_FIELDS: &[&str] = &["updated_at"];

/// 감사 로그 서비스
/// Audit trail service
///
/// 역할:
/// - 다른 서비스가 같은 DB 트랜잭션 안에서 변경 이력을 기록 (`record`)
/// - 예산별 감사 로그 조회 API
#[derive(Clone)]
pub struct AuditService {
    db: Database,
}

impl AuditService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// 변경 이력 기록 (호출자의 트랜잭션 안에서 실행)
    /// Record an audit entry inside the caller's transaction
    pub async fn record(conn: &mut PgConnection, entry: AuditEntry) -> Result<(), BudgetError> {
        let diff = compute_diff(entry.before.as_ref(), entry.after.as_ref());
        let id = AuditRepository::insert(conn, &entry, &diff).await?;

        tracing::debug!(
            audit_id = id,
            budget_id = entry.budget_id,
            entity = %entry.entity_type,
            entity_id = entry.entity_id,
            action = entry.action.as_str(),
            "audit entry recorded"
        );
        Ok(())
    }

    /// 예산 감사 로그 조회 (VIEWER 이상)
    /// List a budget's audit logs, newest first
    pub async fn list(
        &self,
        budget_id: u64,
        user_id: u64,
        query: &AuditQuery,
    ) -> Result<Vec<AuditLog>, BudgetError> {
        let mut conn = self.db.pool().acquire().await?;
        access::require_role(&mut conn, budget_id, user_id, Role::Viewer).await?;

        let entity_type = match query.entity_type.as_deref() {
            Some(raw) => Some(EntityType::parse(raw).ok_or_else(|| {
                BudgetError::Validation(format!("Unknown entity_type: {}", raw))
            })?),
            None => None,
        };
        let (limit, offset) = page(query.limit, query.offset);

        let logs = AuditRepository::list(&mut conn, budget_id, entity_type, limit, offset).await?;
        Ok(logs)
    }
}

/// limit/offset 보정
/// Clamp pagination parameters
fn page(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let offset = offset.unwrap_or(0).max(0);
    (limit, offset)
}

fn fields(value: Option<&Value>) -> Map<String, Value> {
    match value {
        Some(Value::Object(map)) => map.clone(),
        Some(other) => {
            let mut map = Map::new();
            map.insert("value".to_string(), other.clone());
            map
        }
        None => Map::new(),
    }
}

/// 변경 전/후 스냅샷의 최상위 필드 diff 계산
/// Top-level field diff between two snapshots
///
/// 결과: `{ field: { "from": old, "to": new } }`
/// - CREATE (before 없음): 모든 after 필드가 `from: null`
/// - DELETE (after 없음): 모든 before 필드가 `to: null`
pub fn compute_diff(before: Option<&Value>, after: Option<&Value>) -> Value {
    let before = fields(before);
    let after = fields(after);

    let mut keys: Vec<&String> = before.keys().chain(after.keys()).collect();
    keys.sort();
    keys.dedup();

    let mut diff = Map::new();
    for key in keys {
        if IGNORED_FIELDS.contains(&key.as_str()) {
            continue;
        }
        let old = before.get(key).cloned().unwrap_or(Value::Null);
        let new = after.get(key).cloned().unwrap_or(Value::Null);
        if old != new {
            diff.insert(key.clone(), json!({ "from": old, "to": new }));
        }
    }

    Value::Object(diff)
}

/// 변경 사항이 없는 UPDATE인지 (기록 생략 판단용)
/// Whether an update entry carries no effective change
pub fn is_noop(entry: &AuditEntry) -> bool {
    entry.action == AuditAction::Update
        && compute_diff(entry.before.as_ref(), entry.after.as_ref())
            .as_object()
            .map_or(true, |m| m.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_diff_only_changed_fields() {
        let before = json!({ "id": 1, "amount": "-10.00", "paid": false, "updated_at": "a" });
        let after = json!({ "id": 1, "amount": "-12.50", "paid": false, "updated_at": "b" });

        let diff = compute_diff(Some(&before), Some(&after));

        assert_eq!(diff, json!({ "amount": { "from": "-10.00", "to": "-12.50" } }));
    }

    #[test]
    fn test_create_diff_lists_all_fields() {
        let after = json!({ "id": 3, "name": "Cash" });
        let diff = compute_diff(None, Some(&after));

        assert_eq!(
            diff,
            json!({
                "id": { "from": null, "to": 3 },
                "name": { "from": null, "to": "Cash" }
            })
        );
    }

    #[test]
    fn test_delete_diff_nulls_out() {
        let before = json!({ "name": "Cash" });
        let diff = compute_diff(Some(&before), None);
        assert_eq!(diff, json!({ "name": { "from": "Cash", "to": null } }));
    }

    #[test]
    fn test_is_noop() {
        let value = json!({ "name": "x", "updated_at": "1" });
        let touched = json!({ "name": "x", "updated_at": "2" });
        let entry = AuditEntry::updated(1, 1, EntityType::Account, 5, &value, &touched);
        assert!(is_noop(&entry));

        let created = AuditEntry::created(1, 1, EntityType::Account, 5, &value);
        assert!(!is_noop(&created));
    }

    #[test]
    fn test_page_clamps() {
        assert_eq!(page(None, None), (50, 0));
        assert_eq!(page(Some(1000), Some(-5)), (200, 0));
        assert_eq!(page(Some(0), Some(10)), (1, 10));
    }
}
