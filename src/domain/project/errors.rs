//! Project Context - Errors

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("无效的标题: {0}")]
    InvalidTitle(String),

    #[error("无效的文档类型: {0}")]
    InvalidDocumentKind(String),

    #[error("无效的节点列表: {0}")]
    InvalidNodeList(String),
}

impl ProjectError {
    /// 错误对应的字段名（用于向调用方回报校验失败的字段）
    pub fn field(&self) -> &'static str {
        match self {
            ProjectError::InvalidTitle(_) => "title",
            ProjectError::InvalidDocumentKind(_) => "document_kind",
            ProjectError::InvalidNodeList(_) => "node_titles",
        }
    }
}
