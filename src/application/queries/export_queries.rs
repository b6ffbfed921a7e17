//! Export Queries

use uuid::Uuid;

/// 导出项目查询
///
/// format 是调用方选择，独立于项目声明的 document_kind
#[derive(Debug, Clone)]
pub struct ExportProject {
    pub owner_id: Uuid,
    pub project_id: Uuid,
    pub format: String,
}
