//! Node HTTP Handlers - 内容生成与保存

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{GenerateNode, GetNode, NodeContentResponse, RefineNode, SaveNode};
use crate::infrastructure::http::auth::CurrentUser;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GetNodeRequest {
    pub project_id: Uuid,
    pub node_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct GenerateNodeRequest {
    pub project_id: Uuid,
    pub node_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct RefineNodeRequest {
    pub project_id: Uuid,
    pub node_id: Uuid,
    pub instruction: String,
}

#[derive(Debug, Deserialize)]
pub struct SaveNodeRequest {
    pub project_id: Uuid,
    pub node_id: Uuid,
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct NodeResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub position: usize,
    pub content_current: String,
}

impl From<NodeContentResponse> for NodeResponse {
    fn from(result: NodeContentResponse) -> Self {
        Self {
            id: result.id,
            project_id: result.project_id,
            title: result.title,
            position: result.position,
            content_current: result.content_current,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// 获取单个节点
pub async fn get_node(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(req): Json<GetNodeRequest>,
) -> Result<Json<ApiResponse<NodeResponse>>, ApiError> {
    let result = state
        .get_node_handler
        .handle(GetNode {
            owner_id: current_user.user_id,
            project_id: req.project_id,
            node_id: req.node_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(NodeResponse {
        id: result.id,
        project_id: req.project_id,
        title: result.title,
        position: result.position,
        content_current: result.content_current,
    })))
}

/// 生成节点内容（同一节点已有在途生成时返回冲突）
pub async fn generate_node(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(req): Json<GenerateNodeRequest>,
) -> Result<Json<ApiResponse<NodeResponse>>, ApiError> {
    let result = state
        .generate_node_handler
        .handle(GenerateNode {
            owner_id: current_user.user_id,
            project_id: req.project_id,
            node_id: req.node_id,
        })
        .await?;

    tracing::info!(node_id = %result.id, "Node content generated");

    Ok(Json(ApiResponse::success(NodeResponse::from(result))))
}

/// 按指令润色节点内容
pub async fn refine_node(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(req): Json<RefineNodeRequest>,
) -> Result<Json<ApiResponse<NodeResponse>>, ApiError> {
    let result = state
        .refine_node_handler
        .handle(RefineNode {
            owner_id: current_user.user_id,
            project_id: req.project_id,
            node_id: req.node_id,
            instruction: req.instruction,
        })
        .await?;

    tracing::info!(node_id = %result.id, "Node content refined");

    Ok(Json(ApiResponse::success(NodeResponse::from(result))))
}

/// 直接保存节点内容（不加生成锁，后写覆盖先写）
pub async fn save_node(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(req): Json<SaveNodeRequest>,
) -> Result<Json<ApiResponse<NodeResponse>>, ApiError> {
    let result = state
        .save_node_handler
        .handle(SaveNode {
            owner_id: current_user.user_id,
            project_id: req.project_id,
            node_id: req.node_id,
            content: req.content,
        })
        .await?;

    Ok(Json(ApiResponse::success(NodeResponse::from(result))))
}
