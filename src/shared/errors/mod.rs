// Shared errors
pub mod auth_error;
pub mod budget_error;

pub use auth_error::*;
pub use budget_error::*;

use axum::{http::StatusCode, Json};

/// 핸들러 에러 응답 타입 (상태 코드 + {"error": ...})
/// Handler error response: status code with a JSON `{"error": ...}` body
pub type ApiError = (StatusCode, Json<serde_json::Value>);
