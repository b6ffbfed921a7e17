//! Node Commands - 生成编排相关命令

use uuid::Uuid;

/// 生成节点内容命令
///
/// 对节点当前内容无前置要求，成功后整体覆盖 content_current
#[derive(Debug, Clone)]
pub struct GenerateNode {
    pub owner_id: Uuid,
    pub project_id: Uuid,
    pub node_id: Uuid,
}

/// 润色节点内容命令
///
/// instruction 去除首尾空白后必须非空
#[derive(Debug, Clone)]
pub struct RefineNode {
    pub owner_id: Uuid,
    pub project_id: Uuid,
    pub node_id: Uuid,
    pub instruction: String,
}

/// 直接保存节点内容命令
///
/// 无条件覆盖，不排队、不加生成锁，与在途生成按完成顺序生效
#[derive(Debug, Clone)]
pub struct SaveNode {
    pub owner_id: Uuid,
    pub project_id: Uuid,
    pub node_id: Uuid,
    pub content: String,
}
