use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use crate::domains::auth::models::user::UserResponse;

// 회원가입 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = SignupRequest)]
pub struct SignupRequest {
    /// Email address
    /// 이메일 주소
    #[schema(example = "user@example.com")]
    pub email: String,

    /// Password, at least 8 characters (stored as argon2 hash)
    /// 비밀번호 (8자 이상, argon2 해시로 저장)
    #[schema(example = "password123")]
    pub password: String,

    /// Display name (optional)
    #[schema(example = "johndoe")]
    pub username: Option<String>,
}

// 회원가입 응답 모델
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = SignupResponse)]
pub struct SignupResponse {
    pub user: UserResponse,
    pub message: String,
}

// 로그인 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = SigninRequest)]
pub struct SigninRequest {
    #[schema(example = "user@example.com")]
    pub email: String,

    #[schema(example = "password123")]
    pub password: String,
}

/// 발급된 토큰 쌍
/// Issued token pair
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = TokenPair)]
pub struct TokenPair {
    /// JWT Access Token (짧은 수명)
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,

    /// Refresh Token (긴 수명, DB에는 해시로 저장)
    #[schema(example = "Zm9vYmFy...")]
    pub refresh_token: String,

    /// Access token lifetime in seconds
    /// Access Token 유효 시간 (초)
    #[schema(example = 3600)]
    pub expires_in: i64,
}

// 로그인 응답 모델
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = SigninResponse)]
pub struct SigninResponse {
    pub user: UserResponse,

    #[serde(flatten)]
    pub tokens: TokenPair,

    pub message: String,
}

// 토큰 갱신 / 로그아웃 요청 모델
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(as = RefreshTokenRequest)]
pub struct RefreshTokenRequest {
    #[schema(example = "Zm9vYmFy...")]
    pub refresh_token: String,
}

// 토큰 갱신 응답 모델
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = RefreshTokenResponse)]
pub struct RefreshTokenResponse {
    #[serde(flatten)]
    pub tokens: TokenPair,

    pub message: String,
}

/// 메시지만 담은 응답
/// Message-only response
#[derive(Debug, Serialize, ToSchema)]
#[schema(as = MessageResponse)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
