use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use utoipa::{IntoParams, ToSchema};
use chrono::{DateTime, Utc};

// =====================================================
// AuditLog 모델
// =====================================================
// 역할: 생성/수정/삭제 이력 (변경 전/후 스냅샷과 diff)
//
// budget_id에는 FK가 없음 → 예산이 삭제되어도 이력은 남음
// =====================================================

/// 감사 로그 동작
/// Audited action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "CREATE",
            AuditAction::Update => "UPDATE",
            AuditAction::Delete => "DELETE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CREATE" => Some(AuditAction::Create),
            "UPDATE" => Some(AuditAction::Update),
            "DELETE" => Some(AuditAction::Delete),
            _ => None,
        }
    }
}

/// 감사 대상 엔티티 종류
/// Audited entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Budget,
    Member,
    Invite,
    Month,
    Account,
    Transaction,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Budget => "budget",
            EntityType::Member => "member",
            EntityType::Invite => "invite",
            EntityType::Month => "month",
            EntityType::Account => "account",
            EntityType::Transaction => "transaction",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "budget" => Some(EntityType::Budget),
            "member" => Some(EntityType::Member),
            "invite" => Some(EntityType::Invite),
            "month" => Some(EntityType::Month),
            "account" => Some(EntityType::Account),
            "transaction" => Some(EntityType::Transaction),
            _ => None,
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 감사 로그 레코드
/// Audit trail record
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[schema(as = AuditLog)]
pub struct AuditLog {
    pub id: u64,
    pub budget_id: u64,

    /// 변경한 사용자
    /// Acting user
    pub user_id: u64,

    pub entity_type: EntityType,
    pub entity_id: u64,
    pub action: AuditAction,

    /// 변경 전 스냅샷 (CREATE는 null)
    #[schema(value_type = Option<Object>)]
    pub before: Option<Value>,

    /// 변경 후 스냅샷 (DELETE는 null)
    #[schema(value_type = Option<Object>)]
    pub after: Option<Value>,

    /// 바뀐 필드: { field: { "from": old, "to": new } }
    #[schema(value_type = Object)]
    pub diff: Value,

    pub created_at: DateTime<Utc>,
}

/// 기록할 감사 항목 (DB 저장 전)
/// Audit entry to be recorded
#[derive(Debug, Clone)]
pub struct AuditEntry {
    pub budget_id: u64,
    pub user_id: u64,
    pub entity_type: EntityType,
    pub entity_id: u64,
    pub action: AuditAction,
    pub before: Option<Value>,
    pub after: Option<Value>,
}

impl AuditEntry {
    fn snapshot<T: Serialize>(value: &T) -> Option<Value> {
        match serde_json::to_value(value) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize audit snapshot");
                None
            }
        }
    }

    pub fn created<T: Serialize>(
        budget_id: u64,
        user_id: u64,
        entity_type: EntityType,
        entity_id: u64,
        after: &T,
    ) -> Self {
        Self {
            budget_id,
            user_id,
            entity_type,
            entity_id,
            action: AuditAction::Create,
            before: None,
            after: Self::snapshot(after),
        }
    }

    pub fn updated<T: Serialize>(
        budget_id: u64,
        user_id: u64,
        entity_type: EntityType,
        entity_id: u64,
        before: &T,
        after: &T,
    ) -> Self {
        Self {
            budget_id,
            user_id,
            entity_type,
            entity_id,
            action: AuditAction::Update,
            before: Self::snapshot(before),
            after: Self::snapshot(after),
        }
    }

    pub fn deleted<T: Serialize>(
        budget_id: u64,
        user_id: u64,
        entity_type: EntityType,
        entity_id: u64,
        before: &T,
    ) -> Self {
        Self {
            budget_id,
            user_id,
            entity_type,
            entity_id,
            action: AuditAction::Delete,
            before: Self::snapshot(before),
            after: None,
        }
    }
}

/// 감사 로그 조회 파라미터
/// Audit log query parameters
#[derive(Debug, Deserialize, ToSchema, IntoParams)]
pub struct AuditQuery {
    /// 최대 개수 (기본 50, 최대 200)
    pub limit: Option<i64>,

    /// 건너뛸 개수
    pub offset: Option<i64>,

    /// 엔티티 종류 필터 (예: "transaction")
    pub entity_type: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = AuditLogsResponse)]
pub struct AuditLogsResponse {
    pub logs: Vec<AuditLog>,
}
