//! SQLite Project Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{
    NodeRecord, ProjectRecord, ProjectRepositoryPort, RepositoryError,
};

/// SQLite Project Repository
pub struct SqliteProjectRepository {
    pool: DbPool,
}

impl SqliteProjectRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct ProjectRow {
    id: String,
    owner_id: String,
    title: String,
    document_kind: String,
    main_prompt: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ProjectRow> for ProjectRecord {
    type Error = RepositoryError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(ProjectRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            owner_id: Uuid::parse_str(&row.owner_id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            title: row.title,
            document_kind: row.document_kind,
            main_prompt: row.main_prompt,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
            updated_at: DateTime::parse_from_rfc3339(&row.updated_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[derive(FromRow)]
struct NodeRow {
    id: String,
    project_id: String,
    position: i64,
    title: String,
    content_current: String,
}

impl TryFrom<NodeRow> for NodeRecord {
    type Error = RepositoryError;

    fn try_from(row: NodeRow) -> Result<Self, Self::Error> {
        Ok(NodeRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            project_id: Uuid::parse_str(&row.project_id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            position: row.position as usize,
            title: row.title,
            content_current: row.content_current,
        })
    }
}

#[async_trait]
impl ProjectRepositoryPort for SqliteProjectRepository {
    async fn save(
        &self,
        project: &ProjectRecord,
        nodes: &[NodeRecord],
    ) -> Result<(), RepositoryError> {
        // 项目与初始节点在同一事务内写入
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO projects (id, owner_id, title, document_kind, main_prompt, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(project.id.to_string())
        .bind(project.owner_id.to_string())
        .bind(&project.title)
        .bind(&project.document_kind)
        .bind(&project.main_prompt)
        .bind(project.created_at.to_rfc3339())
        .bind(project.updated_at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        for node in nodes {
            sqlx::query(
                r#"
                INSERT INTO nodes (id, project_id, position, title, content_current)
                VALUES (?, ?, ?, ?, ?)
                "#,
            )
            .bind(node.id.to_string())
            .bind(node.project_id.to_string())
            .bind(node.position as i64)
            .bind(&node.title)
            .bind(&node.content_current)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProjectRecord>, RepositoryError> {
        let row: Option<ProjectRow> = sqlx::query_as(
            "SELECT id, owner_id, title, document_kind, main_prompt, created_at, updated_at FROM projects WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(ProjectRecord::try_from).transpose()
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<ProjectRecord>, RepositoryError> {
        let rows: Vec<ProjectRow> = sqlx::query_as(
            "SELECT id, owner_id, title, document_kind, main_prompt, created_at, updated_at FROM projects WHERE owner_id = ? ORDER BY created_at DESC, id DESC",
        )
        .bind(owner_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(ProjectRecord::try_from).collect()
    }

    async fn find_nodes_by_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<NodeRecord>, RepositoryError> {
        let rows: Vec<NodeRow> = sqlx::query_as(
            "SELECT id, project_id, position, title, content_current FROM nodes WHERE project_id = ? ORDER BY position ASC",
        )
        .bind(project_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(NodeRecord::try_from).collect()
    }

    async fn find_node(
        &self,
        project_id: Uuid,
        node_id: Uuid,
    ) -> Result<Option<NodeRecord>, RepositoryError> {
        let row: Option<NodeRow> = sqlx::query_as(
            "SELECT id, project_id, position, title, content_current FROM nodes WHERE project_id = ? AND id = ?",
        )
        .bind(project_id.to_string())
        .bind(node_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(NodeRecord::try_from).transpose()
    }

    async fn update_node_content(
        &self,
        node_id: Uuid,
        content: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE nodes SET content_current = ? WHERE id = ?")
            .bind(content)
            .bind(node_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Node {}", node_id)));
        }

        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        // 使用事务确保级联删除的原子性
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM nodes WHERE project_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::{create_pool, run_migrations, DatabaseConfig, SqliteUserRepository};
    use super::*;
    use crate::application::ports::{UserRecord, UserRepositoryPort};

    async fn setup() -> (SqliteProjectRepository, SqliteUserRepository) {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();
        (
            SqliteProjectRepository::new(pool.clone()),
            SqliteUserRepository::new(pool),
        )
    }

    /// projects.owner_id 有外键约束，项目入库前先落用户记录
    async fn seed_owner(users: &SqliteUserRepository) -> Uuid {
        let id = Uuid::new_v4();
        users
            .save(&UserRecord {
                id,
                email: format!("{}@example.com", id),
                name: None,
                password_hash: "$argon2id$fake".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        id
    }

    fn sample_project(owner_id: Uuid) -> (ProjectRecord, Vec<NodeRecord>) {
        let now = Utc::now();
        let project = ProjectRecord {
            id: Uuid::new_v4(),
            owner_id,
            title: "测试项目".to_string(),
            document_kind: "flow-document".to_string(),
            main_prompt: "主题".to_string(),
            created_at: now,
            updated_at: now,
        };
        let nodes = (0..3)
            .map(|i| NodeRecord {
                id: Uuid::new_v4(),
                project_id: project.id,
                position: i,
                title: format!("节点 {}", i),
                content_current: String::new(),
            })
            .collect();
        (project, nodes)
    }

    #[tokio::test]
    async fn test_save_and_find_ordered_nodes() {
        let (repo, users) = setup().await;
        let owner_id = seed_owner(&users).await;
        let (project, nodes) = sample_project(owner_id);

        repo.save(&project, &nodes).await.unwrap();

        let found = repo.find_by_id(project.id).await.unwrap().unwrap();
        assert_eq!(found.title, "测试项目");
        assert_eq!(found.owner_id, owner_id);

        let loaded = repo.find_nodes_by_project(project.id).await.unwrap();
        assert_eq!(loaded.len(), 3);
        for (i, node) in loaded.iter().enumerate() {
            assert_eq!(node.position, i);
        }
    }

    #[tokio::test]
    async fn test_find_by_owner_filters() {
        let (repo, users) = setup().await;
        let owner_a = seed_owner(&users).await;
        let owner_b = seed_owner(&users).await;
        let (project_a, nodes_a) = sample_project(owner_a);
        let (project_b, nodes_b) = sample_project(owner_b);

        repo.save(&project_a, &nodes_a).await.unwrap();
        repo.save(&project_b, &nodes_b).await.unwrap();

        let projects = repo.find_by_owner(owner_a).await.unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].id, project_a.id);
    }

    #[tokio::test]
    async fn test_update_node_content() {
        let (repo, users) = setup().await;
        let (project, nodes) = sample_project(seed_owner(&users).await);
        repo.save(&project, &nodes).await.unwrap();

        repo.update_node_content(nodes[1].id, "新内容")
            .await
            .unwrap();

        let node = repo.find_node(project.id, nodes[1].id).await.unwrap().unwrap();
        assert_eq!(node.content_current, "新内容");

        // 不存在的节点回报 NotFound
        let result = repo.update_node_content(Uuid::new_v4(), "x").await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_cascades_nodes() {
        let (repo, users) = setup().await;
        let (project, nodes) = sample_project(seed_owner(&users).await);
        repo.save(&project, &nodes).await.unwrap();

        repo.delete(project.id).await.unwrap();

        assert!(repo.find_by_id(project.id).await.unwrap().is_none());
        assert!(repo
            .find_nodes_by_project(project.id)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_save_rejects_unknown_owner() {
        let (repo, _users) = setup().await;
        let (project, nodes) = sample_project(Uuid::new_v4());

        // 未落库的 owner_id 触发外键约束
        let result = repo.save(&project, &nodes).await;
        assert!(matches!(result, Err(RepositoryError::DatabaseError(_))));
    }
}
