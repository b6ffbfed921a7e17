//! Project Commands

use uuid::Uuid;

/// 创建项目命令
///
/// 节点标题顺序即创作顺序，节点落在 0..len-1
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub owner_id: Uuid,
    pub title: String,
    pub document_kind: String,
    pub main_prompt: String,
    pub node_titles: Vec<String>,
}

/// 删除项目命令（级联删除其节点）
#[derive(Debug, Clone)]
pub struct DeleteProject {
    pub owner_id: Uuid,
    pub project_id: Uuid,
}
