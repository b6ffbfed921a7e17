//! Project Queries

use uuid::Uuid;

/// 获取项目详情（含按 position 排序的节点）
#[derive(Debug, Clone)]
pub struct GetProject {
    pub owner_id: Uuid,
    pub project_id: Uuid,
}

/// 列出调用方的所有项目
#[derive(Debug, Clone)]
pub struct ListProjects {
    pub owner_id: Uuid,
}

/// 获取单个节点
#[derive(Debug, Clone)]
pub struct GetNode {
    pub owner_id: Uuid,
    pub project_id: Uuid,
    pub node_id: Uuid,
}
