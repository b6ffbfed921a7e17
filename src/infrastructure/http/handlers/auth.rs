//! Auth HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{Login, Logout, RegisterUser};
use crate::infrastructure::http::auth::CurrentUser;
use crate::infrastructure::http::dto::{ApiResponse, Empty};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// 注册新用户，成功后直接返回会话令牌
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    let command = RegisterUser {
        email: req.email,
        password: req.password,
        name: req.name,
    };

    let result = state.register_user_handler.handle(command).await?;

    tracing::info!(user_id = %result.user_id, email = %result.email, "User registered");

    Ok(Json(ApiResponse::success(SessionResponse {
        token: result.token,
        user_id: result.user_id,
        email: result.email,
    })))
}

/// 登录，签发新会话令牌
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<SessionResponse>>, ApiError> {
    let command = Login {
        email: req.email,
        password: req.password,
    };

    let result = state.login_handler.handle(command).await?;

    tracing::info!(user_id = %result.user_id, "User logged in");

    Ok(Json(ApiResponse::success(SessionResponse {
        token: result.token,
        user_id: result.user_id,
        email: result.email,
    })))
}

/// 登出，撤销当前会话令牌
pub async fn logout(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state.logout_handler.handle(Logout {
        token: current_user.token,
    })?;

    tracing::info!(user_id = %current_user.user_id, "User logged out");

    Ok(Json(ApiResponse::ok()))
}
