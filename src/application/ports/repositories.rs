//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Project Repository
// ============================================================================

/// 项目实体（用于持久化）
#[derive(Debug, Clone)]
pub struct ProjectRecord {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub document_kind: String,
    pub main_prompt: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 内容节点实体（用于持久化）
#[derive(Debug, Clone)]
pub struct NodeRecord {
    pub id: Uuid,
    pub project_id: Uuid,
    pub position: usize,
    pub title: String,
    pub content_current: String,
}

/// Project Repository Port
///
/// 节点存储边界: 节点按 position 有序，随项目级联删除
#[async_trait]
pub trait ProjectRepositoryPort: Send + Sync {
    /// 保存项目及其初始节点（同一事务）
    async fn save(
        &self,
        project: &ProjectRecord,
        nodes: &[NodeRecord],
    ) -> Result<(), RepositoryError>;

    /// 根据 ID 查找项目
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ProjectRecord>, RepositoryError>;

    /// 获取用户的所有项目（created_at 倒序，重复调用顺序稳定）
    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<ProjectRecord>, RepositoryError>;

    /// 获取项目的所有节点（position 升序）
    async fn find_nodes_by_project(
        &self,
        project_id: Uuid,
    ) -> Result<Vec<NodeRecord>, RepositoryError>;

    /// 获取单个节点
    async fn find_node(
        &self,
        project_id: Uuid,
        node_id: Uuid,
    ) -> Result<Option<NodeRecord>, RepositoryError>;

    /// 覆盖节点当前内容（单条 UPDATE，完成顺序即生效顺序）
    async fn update_node_content(
        &self,
        node_id: Uuid,
        content: &str,
    ) -> Result<(), RepositoryError>;

    /// 删除项目（级联删除其节点）
    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}

// ============================================================================
// User Repository
// ============================================================================

/// 用户实体（用于持久化）
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// User Repository Port
#[async_trait]
pub trait UserRepositoryPort: Send + Sync {
    /// 保存用户
    async fn save(&self, user: &UserRecord) -> Result<(), RepositoryError>;

    /// 根据 ID 查找用户
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepositoryError>;

    /// 根据邮箱查找用户
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, RepositoryError>;
}
