//! Project Command Handlers

use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{CreateProject, DeleteProject};
use crate::application::error::ApplicationError;
use crate::application::ports::{NodeRecord, ProjectRecord, ProjectRepositoryPort};
use crate::domain::project::{DocumentKind, OwnerId, Project, ProjectError};

// ============================================================================
// CreateProject
// ============================================================================

/// 创建项目响应中的节点视图
#[derive(Debug, Clone)]
pub struct CreatedNode {
    pub id: Uuid,
    pub title: String,
    pub position: usize,
}

/// 创建项目响应
#[derive(Debug, Clone)]
pub struct CreateProjectResponse {
    pub id: Uuid,
    pub title: String,
    pub document_kind: String,
    pub main_prompt: String,
    pub created_at: String,
    pub nodes: Vec<CreatedNode>,
}

/// CreateProject Handler
///
/// 聚合在内存中校验全部不变量后，项目与初始节点在同一事务内落库
pub struct CreateProjectHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl CreateProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(
        &self,
        command: CreateProject,
    ) -> Result<CreateProjectResponse, ApplicationError> {
        let document_kind = DocumentKind::from_str(&command.document_kind)
            .ok_or_else(|| ProjectError::InvalidDocumentKind(command.document_kind.clone()))?;

        let project = Project::create(
            OwnerId::from_uuid(command.owner_id),
            command.title,
            document_kind,
            command.main_prompt,
            command.node_titles,
        )?;

        let record = ProjectRecord {
            id: *project.id().as_uuid(),
            owner_id: command.owner_id,
            title: project.title().as_str().to_string(),
            document_kind: project.document_kind().as_str().to_string(),
            main_prompt: project.main_prompt().to_string(),
            created_at: project.created_at(),
            updated_at: project.updated_at(),
        };

        let node_records: Vec<NodeRecord> = project
            .nodes()
            .iter()
            .map(|node| NodeRecord {
                id: *node.id().as_uuid(),
                project_id: record.id,
                position: node.position(),
                title: node.title().as_str().to_string(),
                content_current: node.content_current().to_string(),
            })
            .collect();

        self.project_repo.save(&record, &node_records).await?;

        tracing::info!(
            project_id = %record.id,
            title = %record.title,
            document_kind = %record.document_kind,
            nodes = node_records.len(),
            "Project created"
        );

        Ok(CreateProjectResponse {
            id: record.id,
            title: record.title,
            document_kind: record.document_kind,
            main_prompt: record.main_prompt,
            created_at: record.created_at.to_rfc3339(),
            nodes: node_records
                .into_iter()
                .map(|n| CreatedNode {
                    id: n.id,
                    title: n.title,
                    position: n.position,
                })
                .collect(),
        })
    }
}

// ============================================================================
// DeleteProject
// ============================================================================

/// DeleteProject Handler
pub struct DeleteProjectHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl DeleteProjectHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(&self, command: DeleteProject) -> Result<(), ApplicationError> {
        // 缺失与他人项目统一回报 NotFound
        let project = self
            .project_repo
            .find_by_id(command.project_id)
            .await?
            .filter(|p| p.owner_id == command.owner_id)
            .ok_or_else(|| ApplicationError::not_found("Project", command.project_id))?;

        self.project_repo.delete(command.project_id).await?;

        tracing::info!(
            project_id = %command.project_id,
            title = %project.title,
            "Project deleted"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::application::ports::{UserRecord, UserRepositoryPort};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteProjectRepository,
        SqliteUserRepository,
    };

    /// projects.owner_id 有外键约束，fixture 先落一条用户记录
    async fn setup() -> (Arc<dyn ProjectRepositoryPort>, Uuid) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        let owner_id = Uuid::new_v4();
        SqliteUserRepository::new(pool.clone())
            .save(&UserRecord {
                id: owner_id,
                email: format!("{}@example.com", owner_id),
                name: None,
                password_hash: "$argon2id$fake".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        (Arc::new(SqliteProjectRepository::new(pool)), owner_id)
    }

    #[tokio::test]
    async fn test_create_persists_project_and_nodes() {
        let (repo, owner_id) = setup().await;

        let created = CreateProjectHandler::new(repo.clone())
            .handle(CreateProject {
                owner_id,
                title: "方案书".to_string(),
                document_kind: "slide-deck".to_string(),
                main_prompt: "年度方案".to_string(),
                node_titles: vec!["背景".to_string(), "方案".to_string()],
            })
            .await
            .unwrap();

        assert_eq!(created.document_kind, "slide-deck");
        assert_eq!(created.nodes.len(), 2);
        assert_eq!(created.nodes[1].position, 1);

        let nodes = repo.find_nodes_by_project(created.id).await.unwrap();
        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| n.content_current.is_empty()));
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_document_kind() {
        let (repo, owner_id) = setup().await;

        let result = CreateProjectHandler::new(repo)
            .handle(CreateProject {
                owner_id,
                title: "方案书".to_string(),
                document_kind: "spreadsheet".to_string(),
                main_prompt: String::new(),
                node_titles: vec!["背景".to_string()],
            })
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Validation { field: "document_kind", .. })
        ));
    }

    #[tokio::test]
    async fn test_create_rejects_empty_node_list() {
        let (repo, owner_id) = setup().await;

        let result = CreateProjectHandler::new(repo)
            .handle(CreateProject {
                owner_id,
                title: "方案书".to_string(),
                document_kind: "flow-document".to_string(),
                main_prompt: String::new(),
                node_titles: vec![],
            })
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Validation { field: "node_titles", .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_hides_foreign_projects() {
        let (repo, owner_id) = setup().await;

        let created = CreateProjectHandler::new(repo.clone())
            .handle(CreateProject {
                owner_id,
                title: "方案书".to_string(),
                document_kind: "flow-document".to_string(),
                main_prompt: String::new(),
                node_titles: vec!["背景".to_string()],
            })
            .await
            .unwrap();

        // 他人身份删除与项目不存在不可区分
        let result = DeleteProjectHandler::new(repo.clone())
            .handle(DeleteProject {
                owner_id: Uuid::new_v4(),
                project_id: created.id,
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));

        // 所有者删除成功，节点随之消失
        DeleteProjectHandler::new(repo.clone())
            .handle(DeleteProject {
                owner_id,
                project_id: created.id,
            })
            .await
            .unwrap();
        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    }
}
