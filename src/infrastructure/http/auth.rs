//! Bearer Token 认证提取器
//!
//! 从 Authorization 头解析会话令牌，解析成功即刷新活跃时间

use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use uuid::Uuid;

use super::error::ApiError;
use super::state::AppState;

/// 当前已认证用户
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: Uuid,
    pub token: String,
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or_else(|| ApiError::Unauthorized("Expected Bearer token".to_string()))?
            .trim();

        let session = state
            .session_manager
            .resolve(token)
            .map_err(|_| ApiError::Unauthorized("Invalid or expired session".to_string()))?;

        state.session_manager.touch(token);

        Ok(CurrentUser {
            user_id: session.user_id,
            token: token.to_string(),
        })
    }
}
