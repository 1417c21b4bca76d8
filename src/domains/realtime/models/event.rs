use serde::{Deserialize, Serialize};
use serde_json::Value;
use chrono::{DateTime, Utc};
use uuid::Uuid;
use crate::domains::audit::models::{AuditAction, EntityType};

/// 예산 변경 이벤트 (WebSocket으로 전송)
/// Budget change event pushed to subscribers
///
/// 예시:
/// ```json
/// {
///   "type": "change",
///   "event_id": "5f0c...",
///   "budget_id": 1,
///   "entity_type": "transaction",
///   "action": "UPDATE",
///   "entity_id": 42,
///   "actor_id": 7,
///   "payload": { ... },
///   "recalculated_months": [3, 4],
///   "emitted_at": "2024-03-01T12:00:00Z"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetEvent {
    #[serde(rename = "type")]
    pub kind: String,

    pub event_id: Uuid,
    pub budget_id: u64,
    pub entity_type: EntityType,
    pub action: AuditAction,
    pub entity_id: u64,

    /// 변경한 사용자
    pub actor_id: u64,

    /// 변경 후 엔티티 (DELETE는 변경 전 엔티티)
    pub payload: Value,

    /// 잔액 재계산으로 값이 바뀐 월 ID
    /// Months whose balances changed as a consequence
    pub recalculated_months: Vec<u64>,

    pub emitted_at: DateTime<Utc>,
}

impl BudgetEvent {
    pub fn new<T: Serialize>(
        budget_id: u64,
        entity_type: EntityType,
        action: AuditAction,
        entity_id: u64,
        actor_id: u64,
        payload: &T,
    ) -> Self {
        Self {
            kind: "change".to_string(),
            event_id: Uuid::new_v4(),
            budget_id,
            entity_type,
            action,
            entity_id,
            actor_id,
            payload: serde_json::to_value(payload).unwrap_or(Value::Null),
            recalculated_months: Vec::new(),
            emitted_at: Utc::now(),
        }
    }

    pub fn with_recalculated(mut self, months: Vec<u64>) -> Self {
        self.recalculated_months = months;
        self
    }

    /// 특정 사용자가 예산에서 제거되었음을 알리는 이벤트인지
    /// Whether this event removes `user_id` from the budget
    ///
    /// 멤버 이벤트의 entity_id는 user_id 입니다.
    pub fn removes_member(&self, user_id: u64) -> bool {
        match (self.entity_type, self.action) {
            (EntityType::Member, AuditAction::Delete) => self.entity_id == user_id,
            (EntityType::Budget, AuditAction::Delete) => true,
            _ => false,
        }
    }
}

/// 구독자가 너무 느려 이벤트를 건너뛰었을 때 보내는 알림
/// Notice sent to a subscriber that lagged behind the channel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaggedNotice {
    #[serde(rename = "type")]
    pub kind: String,
    pub skipped: u64,
}

impl LaggedNotice {
    pub fn new(skipped: u64) -> Self {
        Self {
            kind: "lagged".to_string(),
            skipped,
        }
    }
}

/// WebSocket 연결 쿼리 파라미터
/// WebSocket connect query (`/api/ws?token=...&budget_id=...`)
#[derive(Debug, Deserialize)]
pub struct SubscribeQuery {
    pub token: String,
    pub budget_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_serialization_shape() {
        let event = BudgetEvent::new(1, EntityType::Transaction, AuditAction::Update, 42, 7, &json!({"id": 42}))
            .with_recalculated(vec![3, 4]);

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "change");
        assert_eq!(value["entity_type"], "transaction");
        assert_eq!(value["action"], "UPDATE");
        assert_eq!(value["recalculated_months"], json!([3, 4]));
    }

    #[test]
    fn test_removes_member() {
        let kicked = BudgetEvent::new(1, EntityType::Member, AuditAction::Delete, 9, 1, &json!({}));
        assert!(kicked.removes_member(9));
        assert!(!kicked.removes_member(10));

        let deleted = BudgetEvent::new(1, EntityType::Budget, AuditAction::Delete, 1, 1, &json!({}));
        assert!(deleted.removes_member(10));

        let edit = BudgetEvent::new(1, EntityType::Member, AuditAction::Update, 9, 1, &json!({}));
        assert!(!edit.removes_member(9));
    }
}
