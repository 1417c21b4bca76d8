use crate::shared::config::AppConfig;
use crate::shared::errors::AuthError;
use crate::shared::utils::{generate_token, hash_token};
use crate::domains::auth::models::jwt::Claims;
use chrono::Duration;
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};

/// Refresh Token 바이트 수 (base64url 64자)
const REFRESH_TOKEN_BYTES: usize = 48;

/// JWT 서비스
/// JWT Service for token generation and verification
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl JwtService {
    /// JWT Service 생성
    /// Create JWT Service
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            &config.jwt_secret,
            Duration::hours(config.access_token_hours),
            Duration::days(config.refresh_token_days),
        )
    }

    /// Access Token 유효 시간 (초)
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    /// Access Token 발급 (짧은 수명, HS256)
    /// Generate Access Token (short lifetime)
    pub fn generate_access_token(&self, user_id: u64, email: String) -> Result<String, AuthError> {
        let claims = Claims::new(user_id, email, self.access_ttl);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to generate access token: {}", e)))
    }

    /// Refresh Token 생성 (랜덤 문자열, DB에는 해시만 저장)
    /// Generate Refresh Token (random string, to be stored hashed)
    pub fn generate_refresh_token(&self) -> String {
        generate_token(REFRESH_TOKEN_BYTES)
    }

    /// Refresh Token 해싱 (DB 저장용)
    /// Hash Refresh Token (for database storage)
    pub fn hash_refresh_token(&self, token: &str) -> String {
        hash_token(token)
    }

    /// Access Token 검증
    /// Verify Access Token
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| {
                if matches!(e.kind(), ErrorKind::ExpiredSignature) {
                    tracing::debug!("expired access token");
                }
                AuthError::InvalidToken
            })?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> JwtService {
        JwtService::new("test-secret", Duration::hours(1), Duration::days(7))
    }

    #[test]
    fn test_access_token_roundtrip() {
        let jwt = service();
        let token = jwt.generate_access_token(42, "alice@example.com".to_string()).unwrap();

        let claims = jwt.verify_access_token(&token).unwrap();
        assert_eq!(claims.user_id, 42);
        assert_eq!(claims.email, "alice@example.com");
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_signed_with_other_secret_is_rejected() {
        let other = JwtService::new("other-secret", Duration::hours(1), Duration::days(7));
        let token = other.generate_access_token(1, "a@b.c".to_string()).unwrap();

        assert!(matches!(service().verify_access_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = JwtService::new("test-secret", Duration::hours(-2), Duration::days(7));
        let token = jwt.generate_access_token(1, "a@b.c".to_string()).unwrap();

        assert!(matches!(jwt.verify_access_token(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_refresh_tokens_are_random_and_hashed() {
        let jwt = service();
        let a = jwt.generate_refresh_token();
        let b = jwt.generate_refresh_token();

        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
        assert_eq!(jwt.hash_refresh_token(&a), jwt.hash_refresh_token(&a));
        assert_ne!(jwt.hash_refresh_token(&a), a);
    }
}
