use serde::{Deserialize, Serialize};
use chrono::{Duration, Utc};

/// JWT Claims (Access Token 내용)
/// Access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 ID
    pub user_id: u64,

    /// 이메일 (초대 수락 시 초대 이메일과 비교)
    pub email: String,

    /// 만료 시간 (Unix timestamp)
    pub exp: i64,

    /// 발급 시간 (Unix timestamp)
    pub iat: i64,
}

impl Claims {
    /// 지금부터 `ttl` 동안 유효한 Claims 생성
    /// Create claims valid for `ttl` from now
    pub fn new(user_id: u64, email: String, ttl: Duration) -> Self {
        let now = Utc::now();

        Self {
            user_id,
            email,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        }
    }
}
