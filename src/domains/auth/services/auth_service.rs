use crate::shared::database::{Database, UserRepository, RefreshTokenRepository};
use crate::shared::utils::normalize_email;
use crate::domains::auth::models::{User, SignupRequest, SigninRequest, RefreshTokenCreate, TokenPair};
use crate::domains::auth::services::JwtService;
use crate::shared::errors::AuthError;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use chrono::Utc;
use sqlx::PgConnection;

/// 비밀번호 최소 길이
const MIN_PASSWORD_LEN: usize = 8;

// 인증 서비스
// 역할: NestJS의 Service 같은 것
// AuthService: handles authentication business logic
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(db: Database, jwt_service: JwtService) -> Self {
        Self { db, jwt_service }
    }

    // 회원가입 (비즈니스 로직)
    pub async fn signup(&self, request: SignupRequest) -> Result<User, AuthError> {
        // 0. 입력 검증
        let email = normalize_email(&request.email).map_err(AuthError::Validation)?;
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        let username = request
            .username
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty());

        // 1. 비밀번호 해싱 (DB 연결을 잡기 전에)
        let password_hash = Self::hash_password(&request.password)?;

        let mut conn = self.db.pool().acquire().await?;

        // 2. 이메일 중복 확인
        if UserRepository::find_by_email(&mut conn, &email).await?.is_some() {
            return Err(AuthError::EmailAlreadyExists { email });
        }

        // 3. 사용자 생성
        let user = UserRepository::create(&mut conn, &email, &password_hash, username).await?;

        tracing::info!(user_id = user.id, "user signed up");
        Ok(user)
    }

    // 로그인 (비즈니스 로직)
    // Returns: (User, token pair)
    pub async fn signin(&self, request: SigninRequest) -> Result<(User, TokenPair), AuthError> {
        let mut tx = self.db.pool().begin().await?;

        // 1. 이메일로 사용자 조회
        let user = UserRepository::find_by_email(&mut tx, request.email.trim())
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // 2. 비밀번호 검증
        Self::verify_password(&request.password, &user.password_hash)?;

        // 3. 이전 세션 종료 후 새 토큰 발급
        let revoked = RefreshTokenRepository::revoke_all_for_user(&mut tx, user.id).await?;
        let tokens = self.issue_tokens(&mut tx, &user).await?;
        tx.commit().await?;

        tracing::info!(user_id = user.id, revoked_sessions = revoked, "user signed in");
        Ok((user, tokens))
    }

    /// Access Token + Refresh Token 발급 (Refresh Token은 해시로 DB 저장)
    /// Issue a token pair; the refresh token is stored hashed
    async fn issue_tokens(&self, conn: &mut PgConnection, user: &User) -> Result<TokenPair, AuthError> {
        let access_token = self.jwt_service.generate_access_token(user.id, user.email.clone())?;
        let refresh_token = self.jwt_service.generate_refresh_token();

        RefreshTokenRepository::create(
            conn,
            &RefreshTokenCreate {
                user_id: user.id,
                token_hash: self.jwt_service.hash_refresh_token(&refresh_token),
                expires_at: Utc::now() + self.jwt_service.refresh_ttl(),
            },
        )
        .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            expires_in: self.jwt_service.access_ttl_seconds(),
        })
    }

    /// Refresh Token 검증 후 새 토큰 쌍 발급 (Rotation)
    /// Verify a refresh token and rotate it
    ///
    /// 토큰 행을 잠그므로 같은 토큰으로 동시에 요청하면 하나만 성공합니다.
    pub async fn refresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let token_hash = self.jwt_service.hash_refresh_token(refresh_token.trim());
        let mut tx = self.db.pool().begin().await?;

        let stored = RefreshTokenRepository::find_by_hash_for_update(&mut tx, &token_hash)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        if !stored.is_usable(Utc::now()) {
            return Err(AuthError::InvalidToken);
        }

        let user = UserRepository::find_by_id(&mut tx, stored.user_id)
            .await?
            .ok_or(AuthError::InvalidToken)?;

        if !RefreshTokenRepository::revoke(&mut tx, &token_hash).await? {
            return Err(AuthError::InvalidToken);
        }
        let tokens = self.issue_tokens(&mut tx, &user).await?;
        tx.commit().await?;

        Ok(tokens)
    }

    /// 로그아웃 - Refresh Token 무효화
    /// Logout - Revoke refresh token
    pub async fn logout(&self, refresh_token: &str) -> Result<(), AuthError> {
        let token_hash = self.jwt_service.hash_refresh_token(refresh_token.trim());
        let mut conn = self.db.pool().acquire().await?;

        RefreshTokenRepository::revoke(&mut conn, &token_hash).await?;
        Ok(())
    }

    /// 사용자의 모든 Refresh Token 무효화 (모든 기기에서 로그아웃)
    /// Revoke all refresh tokens for user (logout from all devices)
    pub async fn logout_all_devices(&self, user_id: u64) -> Result<u64, AuthError> {
        let mut conn = self.db.pool().acquire().await?;
        let revoked = RefreshTokenRepository::revoke_all_for_user(&mut conn, user_id).await?;

        tracing::info!(user_id, revoked, "logged out from all devices");
        Ok(revoked)
    }

    /// 만료/무효화된 Refresh Token 정리
    /// Delete expired or revoked refresh tokens
    pub async fn purge_stale_tokens(&self) -> Result<u64, AuthError> {
        let mut conn = self.db.pool().acquire().await?;
        Ok(RefreshTokenRepository::delete_stale(&mut conn).await?)
    }

    fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::PasswordHashingFailed(format!("Failed to hash password: {}", e)))?
            .to_string();

        Ok(password_hash)
    }

    fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| AuthError::PasswordVerificationFailed(format!("Invalid password hash: {}", e)))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)?;

        Ok(())
    }

    pub async fn get_user_info(&self, user_id: u64) -> Result<User, AuthError> {
        let mut conn = self.db.pool().acquire().await?;

        UserRepository::find_by_id(&mut conn, user_id)
            .await?
            .ok_or(AuthError::UserNotFound { id: user_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_verifies() {
        let hash = AuthService::hash_password("correct horse").unwrap();

        assert!(AuthService::verify_password("correct horse", &hash).is_ok());
        assert!(matches!(
            AuthService::verify_password("wrong horse", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }
}
