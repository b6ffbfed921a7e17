//! Export Query Handler - 导出装配器
//!
//! 按 position 顺序展开项目节点，交给目标格式的 DocumentWriter 序列化。
//! 文档包在内存中整体构建，序列化失败时不产出任何工件。

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{
    DocumentWriterPort, ExportDocument, ExportSection, ProjectRepositoryPort,
};
use crate::application::queries::ExportProject;
use crate::domain::project::DocumentKind;

/// 导出产物: 二进制工件 + 建议文件名
#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// ExportProject Handler
pub struct ExportProjectHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
    flow_writer: Arc<dyn DocumentWriterPort>,
    slide_writer: Arc<dyn DocumentWriterPort>,
}

impl ExportProjectHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepositoryPort>,
        flow_writer: Arc<dyn DocumentWriterPort>,
        slide_writer: Arc<dyn DocumentWriterPort>,
    ) -> Self {
        Self {
            project_repo,
            flow_writer,
            slide_writer,
        }
    }

    pub async fn handle(&self, query: ExportProject) -> Result<ExportArtifact, ApplicationError> {
        // 导出格式是调用方选择，与项目声明的 document_kind 解耦
        let format = DocumentKind::from_str(&query.format).ok_or_else(|| {
            ApplicationError::validation(
                "format",
                format!("unrecognized export format: {}", query.format),
            )
        })?;

        let project = self
            .project_repo
            .find_by_id(query.project_id)
            .await?
            .filter(|p| p.owner_id == query.owner_id)
            .ok_or_else(|| ApplicationError::not_found("Project", query.project_id))?;

        let nodes = self
            .project_repo
            .find_nodes_by_project(query.project_id)
            .await?;

        // 空内容节点渲染为空块，不会被省略
        let document = ExportDocument {
            title: project.title.clone(),
            main_prompt: project.main_prompt.clone(),
            sections: nodes
                .into_iter()
                .map(|n| ExportSection {
                    title: n.title,
                    body: n.content_current,
                })
                .collect(),
        };

        let writer = self.writer_for(format);
        let bytes = writer.render(&document)?;

        tracing::info!(
            project_id = %query.project_id,
            format = %format,
            size = bytes.len(),
            "Project exported"
        );

        Ok(ExportArtifact {
            filename: format!("{}.{}", project.title, writer.extension()),
            content_type: writer.content_type(),
            bytes,
        })
    }

    fn writer_for(&self, format: DocumentKind) -> &Arc<dyn DocumentWriterPort> {
        match format {
            DocumentKind::FlowDocument => &self.flow_writer,
            DocumentKind::SlideDeck => &self.slide_writer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    use chrono::Utc;

    use crate::application::commands::handlers::CreateProjectHandler;
    use crate::application::commands::CreateProject;
    use crate::application::ports::{UserRecord, UserRepositoryPort};
    use crate::infrastructure::adapters::{DocxWriter, PptxWriter};
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteProjectRepository,
        SqliteUserRepository,
    };

    async fn handler_with_project() -> (ExportProjectHandler, Uuid, Uuid) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        // projects.owner_id 有外键约束，先落一条用户记录
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

        let repo: Arc<dyn ProjectRepositoryPort> = Arc::new(SqliteProjectRepository::new(pool));

        let created = CreateProjectHandler::new(repo.clone())
            .handle(CreateProject {
                owner_id,
                title: "Report".to_string(),
                document_kind: "flow-document".to_string(),
                main_prompt: "quarterly numbers".to_string(),
                node_titles: vec!["A".to_string(), "B".to_string()],
            })
            .await
            .unwrap();

        let handler = ExportProjectHandler::new(
            repo,
            Arc::new(DocxWriter::new()),
            Arc::new(PptxWriter::new()),
        );
        (handler, owner_id, created.id)
    }

    #[tokio::test]
    async fn test_export_format_is_caller_choice() {
        let (handler, owner_id, project_id) = handler_with_project().await;

        // flow-document 项目同样可以导出为幻灯片
        let artifact = handler
            .handle(ExportProject {
                owner_id,
                project_id,
                format: "slide-deck".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(artifact.filename, "Report.pptx");
        assert!(!artifact.bytes.is_empty());
    }

    #[tokio::test]
    async fn test_export_rejects_unknown_format() {
        let (handler, owner_id, project_id) = handler_with_project().await;

        let result = handler
            .handle(ExportProject {
                owner_id,
                project_id,
                format: "pdf".to_string(),
            })
            .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Validation { field: "format", .. })
        ));
    }

    #[tokio::test]
    async fn test_export_hides_foreign_projects() {
        let (handler, _owner_id, project_id) = handler_with_project().await;

        let result = handler
            .handle(ExportProject {
                owner_id: Uuid::new_v4(),
                project_id,
                format: "flow-document".to_string(),
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }
}
