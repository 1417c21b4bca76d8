use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::ToSchema;
use chrono::{DateTime, Utc};
use crate::domains::budget::models::Role;

// =====================================================
// Invite 모델
// =====================================================
// 역할: 이메일로 보내는 예산 초대
//
// 상태 흐름:
//   PENDING → ACCEPTED | DECLINED | REVOKED
//   (만료는 expires_at으로 판단, 상태는 PENDING 유지)
//
// 토큰 원본은 메일로만 전달되고 DB에는 SHA-256 해시만 저장
// =====================================================

/// 초대 상태
/// Invitation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum InviteStatus {
    Pending,
    Accepted,
    Declined,
    Revoked,
}

impl InviteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InviteStatus::Pending => "PENDING",
            InviteStatus::Accepted => "ACCEPTED",
            InviteStatus::Declined => "DECLINED",
            InviteStatus::Revoked => "REVOKED",
        }
    }
}

impl FromStr for InviteStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(InviteStatus::Pending),
            "ACCEPTED" => Ok(InviteStatus::Accepted),
            "DECLINED" => Ok(InviteStatus::Declined),
            "REVOKED" => Ok(InviteStatus::Revoked),
            other => anyhow::bail!("Unknown invite status: {}", other),
        }
    }
}

/// 예산 초대
/// Budget invitation (token hash is never serialized)
#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
#[schema(as = BudgetInvite)]
pub struct BudgetInvite {
    pub id: u64,
    pub budget_id: u64,

    #[schema(example = "friend@example.com")]
    pub email: String,

    pub role: Role,
    pub status: InviteStatus,
    pub invited_by: u64,

    #[serde(skip)]
    pub token_hash: String,

    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BudgetInvite {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// 초대 생성 요청
/// Create invitation request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = CreateInviteRequest)]
pub struct CreateInviteRequest {
    #[schema(example = "friend@example.com")]
    pub email: String,

    /// EDITOR 또는 VIEWER
    pub role: Role,
}

/// 초대 수락/거절 요청
/// Accept or decline an invitation
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = InviteTokenRequest)]
pub struct InviteTokenRequest {
    pub token: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(as = InvitesResponse)]
pub struct InvitesResponse {
    pub invites: Vec<BudgetInvite>,
}

/// 초대 생성 시 사용하는 내부 모델
#[derive(Debug)]
pub struct InviteCreate {
    pub budget_id: u64,
    pub email: String,
    pub role: Role,
    pub invited_by: u64,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_invite_expiry_and_serialization() {
        let now = Utc::now();
        let invite = BudgetInvite {
            id: 1,
            budget_id: 2,
            email: "a@b.c".to_string(),
            role: Role::Editor,
            status: InviteStatus::Pending,
            invited_by: 3,
            token_hash: "secret".to_string(),
            expires_at: now + Duration::days(7),
            created_at: now,
            updated_at: now,
        };

        assert!(!invite.is_expired(now));
        assert!(invite.is_expired(now + Duration::days(8)));

        let json = serde_json::to_value(&invite).unwrap();
        assert!(json.get("token_hash").is_none());
        assert_eq!(json["status"], "PENDING");
    }
}
