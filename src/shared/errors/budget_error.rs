use thiserror::Error;
use axum::{http::StatusCode, Json};
use serde_json::json;
use crate::domains::budget::models::Role;
use crate::domains::ledger::engine::RecalcError;

/// 예산/원장 관련 에러
/// Budget and ledger errors
///
/// 예산 멤버가 아닌 사용자에게는 403 대신 404를 돌려줍니다
/// (예산 존재 여부를 노출하지 않음).
#[derive(Error, Debug)]
pub enum BudgetError {
    #[error("Budget not found: id={id}")]
    BudgetNotFound { id: u64 },

    #[error("Month not found: id={id}")]
    MonthNotFound { id: u64 },

    #[error("Account not found: id={id}")]
    AccountNotFound { id: u64 },

    #[error("Transaction not found: id={id}")]
    TransactionNotFound { id: u64 },

    #[error("Member not found: user_id={user_id}")]
    MemberNotFound { user_id: u64 },

    #[error("Invite not found")]
    InviteNotFound,

    /// 역할 부족
    /// Caller's role is below the required one
    #[error("Requires {required} role")]
    Forbidden { required: Role },

    /// 마지막 OWNER는 강등/탈퇴 불가
    /// The last owner cannot be demoted or removed
    #[error("A budget must keep at least one owner")]
    LastOwner,

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// 만료/취소/사용된 초대
    /// Expired, revoked or already used invitation
    #[error("Invalid invite: {0}")]
    InvalidInvite(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<anyhow::Error> for BudgetError {
    fn from(err: anyhow::Error) -> Self {
        BudgetError::DatabaseError(format!("{:#}", err))
    }
}

/// 잔액 범위 초과는 요청 값 문제로 취급 (400)
impl From<RecalcError> for BudgetError {
    fn from(err: RecalcError) -> Self {
        tracing::warn!(error = %err, "recalculation rejected");
        BudgetError::Validation("balance out of range".to_string())
    }
}

impl From<sqlx::Error> for BudgetError {
    fn from(err: sqlx::Error) -> Self {
        BudgetError::DatabaseError(err.to_string())
    }
}

impl BudgetError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            BudgetError::BudgetNotFound { .. }
            | BudgetError::MonthNotFound { .. }
            | BudgetError::AccountNotFound { .. }
            | BudgetError::TransactionNotFound { .. }
            | BudgetError::MemberNotFound { .. }
            | BudgetError::InviteNotFound => StatusCode::NOT_FOUND,
            BudgetError::Forbidden { .. } => StatusCode::FORBIDDEN,
            BudgetError::LastOwner
            | BudgetError::Validation(_)
            | BudgetError::InvalidInvite(_) => StatusCode::BAD_REQUEST,
            BudgetError::Conflict(_) => StatusCode::CONFLICT,
            BudgetError::DatabaseError(_) | BudgetError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// BudgetError를 HTTP 응답으로 변환
impl From<BudgetError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: BudgetError) -> Self {
        let status = err.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %err, "budget request failed");
        }

        (status, Json(json!({ "error": err.to_string() })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(BudgetError::BudgetNotFound { id: 1 }.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            BudgetError::Forbidden { required: Role::Owner }.status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(BudgetError::LastOwner.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(BudgetError::Conflict("x".into()).status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_forbidden_message_names_role() {
        let (_, body) = <(StatusCode, Json<serde_json::Value>)>::from(BudgetError::Forbidden {
            required: Role::Editor,
        });
        assert_eq!(body.0["error"], "Requires EDITOR role");
    }

    #[test]
    fn test_balance_overflow_is_bad_request() {
        let err = BudgetError::from(RecalcError::BalanceOverflow { month_id: 3 });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let (_, body) = <(StatusCode, Json<serde_json::Value>)>::from(err);
        assert_eq!(body.0["error"], "Validation failed: balance out of range");
    }
}
