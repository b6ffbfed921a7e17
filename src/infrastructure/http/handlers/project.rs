//! Project HTTP Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{
    CreateProject, DeleteProject, GetProject, ListProjects, NodeView, ProjectDetailResponse,
    ProjectSummaryResponse,
};
use crate::infrastructure::http::auth::CurrentUser;
use crate::infrastructure::http::dto::{ApiResponse, Empty};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateProjectRequest {
    pub title: String,
    pub document_kind: String,
    #[serde(default)]
    pub main_prompt: String,
    pub node_titles: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GetProjectRequest {
    pub id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct DeleteProjectRequest {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ProjectNodeResponse {
    pub id: Uuid,
    pub title: String,
    pub position: usize,
    pub content_current: String,
}

impl From<NodeView> for ProjectNodeResponse {
    fn from(view: NodeView) -> Self {
        Self {
            id: view.id,
            title: view.title,
            position: view.position,
            content_current: view.content_current,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: Uuid,
    pub title: String,
    pub document_kind: String,
    pub main_prompt: String,
    pub created_at: String,
    pub nodes: Vec<ProjectNodeResponse>,
}

impl From<ProjectDetailResponse> for ProjectResponse {
    fn from(detail: ProjectDetailResponse) -> Self {
        Self {
            id: detail.id,
            title: detail.title,
            document_kind: detail.document_kind,
            main_prompt: detail.main_prompt,
            created_at: detail.created_at,
            nodes: detail.nodes.into_iter().map(ProjectNodeResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectSummary {
    pub id: Uuid,
    pub title: String,
    pub document_kind: String,
    pub main_prompt: String,
    pub created_at: String,
}

impl From<ProjectSummaryResponse> for ProjectSummary {
    fn from(summary: ProjectSummaryResponse) -> Self {
        Self {
            id: summary.id,
            title: summary.title,
            document_kind: summary.document_kind,
            main_prompt: summary.main_prompt,
            created_at: summary.created_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// 创建项目（标题、文档类型、主题与节点标题一次性给定）
pub async fn create_project(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    let command = CreateProject {
        owner_id: current_user.user_id,
        title: req.title,
        document_kind: req.document_kind,
        main_prompt: req.main_prompt,
        node_titles: req.node_titles,
    };

    let result = state.create_project_handler.handle(command).await?;

    tracing::info!(
        project_id = %result.id,
        title = %result.title,
        nodes = result.nodes.len(),
        "Project created"
    );

    Ok(Json(ApiResponse::success(ProjectResponse {
        id: result.id,
        title: result.title,
        document_kind: result.document_kind,
        main_prompt: result.main_prompt,
        created_at: result.created_at,
        nodes: result
            .nodes
            .into_iter()
            .map(|n| ProjectNodeResponse {
                id: n.id,
                title: n.title,
                position: n.position,
                content_current: String::new(),
            })
            .collect(),
    })))
}

/// 列出当前用户的项目
pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<ProjectSummary>>>, ApiError> {
    let result = state
        .list_projects_handler
        .handle(ListProjects {
            owner_id: current_user.user_id,
        })
        .await?;

    Ok(Json(ApiResponse::success(
        result.into_iter().map(ProjectSummary::from).collect(),
    )))
}

/// 获取项目详情（节点按 position 排列）
pub async fn get_project(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(req): Json<GetProjectRequest>,
) -> Result<Json<ApiResponse<ProjectResponse>>, ApiError> {
    let result = state
        .get_project_handler
        .handle(GetProject {
            owner_id: current_user.user_id,
            project_id: req.id,
        })
        .await?;

    Ok(Json(ApiResponse::success(ProjectResponse::from(result))))
}

/// 删除项目及其全部节点
pub async fn delete_project(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(req): Json<DeleteProjectRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    state
        .delete_project_handler
        .handle(DeleteProject {
            owner_id: current_user.user_id,
            project_id: req.id,
        })
        .await?;

    tracing::info!(project_id = %req.id, "Project deleted");

    Ok(Json(ApiResponse::ok()))
}
