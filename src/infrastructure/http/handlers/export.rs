//! Export HTTP Handlers - 文档工件下载

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::Response,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::ExportProject;
use crate::infrastructure::http::auth::CurrentUser;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ExportProjectRequest {
    pub id: Uuid,
    pub format: String,
}

/// 导出项目为文档工件，整体下载
///
/// 序列化失败时不产出任何字节，走统一错误信封
pub async fn export_project(
    State(state): State<Arc<AppState>>,
    current_user: CurrentUser,
    Json(req): Json<ExportProjectRequest>,
) -> Result<Response, ApiError> {
    let artifact = state
        .export_project_handler
        .handle(ExportProject {
            owner_id: current_user.user_id,
            project_id: req.id,
            format: req.format,
        })
        .await?;

    tracing::info!(
        project_id = %req.id,
        filename = %artifact.filename,
        bytes = artifact.bytes.len(),
        "Project exported"
    );

    // Content-Disposition 只接受 ASCII，标题中的其他字符降级为下划线
    let fallback_name = artifact
        .filename
        .chars()
        .map(|c| if c.is_ascii() && c != '"' { c } else { '_' })
        .collect::<String>();

    let content_length = artifact.bytes.len();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, artifact.content_type)
        .header(header::CONTENT_LENGTH, content_length)
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", fallback_name),
        )
        .body(Body::from(artifact.bytes))
        .map_err(|e| ApiError::Internal(format!("Failed to build response: {}", e)))
}
