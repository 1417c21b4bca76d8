/// 토큰 유틸리티
/// Token utilities
///
/// 역할:
/// - Refresh Token, 초대 토큰 등 랜덤 토큰 생성
/// - DB 저장용 SHA-256 해시 계산 (원본 토큰은 저장하지 않음)

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;
use sha2::{Digest, Sha256};

/// URL에 그대로 넣을 수 있는 랜덤 토큰 생성
/// Generate a URL-safe random token from `byte_len` random bytes
pub fn generate_token(byte_len: usize) -> String {
    let mut bytes = vec![0u8; byte_len];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// 토큰 해싱 (DB 저장용)
/// Hash a token for storage (hex-encoded SHA-256)
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
