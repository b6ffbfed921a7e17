//! Project Query Handlers

use std::sync::Arc;
use uuid::Uuid;

use crate::application::error::ApplicationError;
use crate::application::ports::{NodeRecord, ProjectRecord, ProjectRepositoryPort};
use crate::application::queries::{GetNode, GetProject, ListProjects};

// ============================================================================
// Response DTOs
// ============================================================================

/// 项目摘要响应（列表用，不带节点）
#[derive(Debug, Clone)]
pub struct ProjectSummaryResponse {
    pub id: Uuid,
    pub title: String,
    pub document_kind: String,
    pub main_prompt: String,
    pub created_at: String,
}

impl From<ProjectRecord> for ProjectSummaryResponse {
    fn from(record: ProjectRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            document_kind: record.document_kind,
            main_prompt: record.main_prompt,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

/// 节点视图
#[derive(Debug, Clone)]
pub struct NodeView {
    pub id: Uuid,
    pub title: String,
    pub position: usize,
    pub content_current: String,
}

impl From<NodeRecord> for NodeView {
    fn from(record: NodeRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            position: record.position,
            content_current: record.content_current,
        }
    }
}

/// 项目详情响应（节点按 position 升序）
#[derive(Debug, Clone)]
pub struct ProjectDetailResponse {
    pub id: Uuid,
    pub title: String,
    pub document_kind: String,
    pub main_prompt: String,
    pub created_at: String,
    pub nodes: Vec<NodeView>,
}

// ============================================================================
// Handlers
// ============================================================================

/// 加载项目并校验所有权（缺失与他人项目统一回报 NotFound）
async fn load_owned_project(
    project_repo: &Arc<dyn ProjectRepositoryPort>,
    owner_id: Uuid,
    project_id: Uuid,
) -> Result<ProjectRecord, ApplicationError> {
    project_repo
        .find_by_id(project_id)
        .await?
        .filter(|p| p.owner_id == owner_id)
        .ok_or_else(|| ApplicationError::not_found("Project", project_id))
}

/// GetProject Handler
pub struct GetProjectHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl GetProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(&self, query: GetProject) -> Result<ProjectDetailResponse, ApplicationError> {
        let project =
            load_owned_project(&self.project_repo, query.owner_id, query.project_id).await?;
        let nodes = self
            .project_repo
            .find_nodes_by_project(query.project_id)
            .await?;

        Ok(ProjectDetailResponse {
            id: project.id,
            title: project.title,
            document_kind: project.document_kind,
            main_prompt: project.main_prompt,
            created_at: project.created_at.to_rfc3339(),
            nodes: nodes.into_iter().map(NodeView::from).collect(),
        })
    }
}

/// ListProjects Handler
pub struct ListProjectsHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl ListProjectsHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(
        &self,
        query: ListProjects,
    ) -> Result<Vec<ProjectSummaryResponse>, ApplicationError> {
        let projects = self.project_repo.find_by_owner(query.owner_id).await?;
        Ok(projects
            .into_iter()
            .map(ProjectSummaryResponse::from)
            .collect())
    }
}

/// GetNode Handler
pub struct GetNodeHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl GetNodeHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(&self, query: GetNode) -> Result<NodeView, ApplicationError> {
        load_owned_project(&self.project_repo, query.owner_id, query.project_id).await?;

        let node = self
            .project_repo
            .find_node(query.project_id, query.node_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Node", query.node_id))?;

        Ok(NodeView::from(node))
    }
}
