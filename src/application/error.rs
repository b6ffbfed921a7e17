//! 应用层错误定义
//!
//! 统一的命令/查询错误类型，覆盖五类核心失败:
//! Validation / NotFound / Generation / Conflict / Export
//! 所有操作快速失败，出错时不留下部分写入

use thiserror::Error;
use uuid::Uuid;

use crate::application::ports::{ExportError, TextGenError};
use crate::domain::project::ProjectError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到（缺失与无权访问不可区分，避免泄露存在性）
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: Uuid,
    },

    /// 验证错误（携带违反约束的字段）
    #[error("Validation error on `{field}`: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// 外部生成能力失败（节点内容保持原样）
    #[error("Generation failed: {0}")]
    Generation(String),

    /// 并发生成冲突（节点已有生成调用在途，调用方应重试）
    #[error("Generation already in flight for node: {0}")]
    Conflict(Uuid),

    /// 导出序列化失败（不产出工件，项目状态不受影响）
    #[error("Export failed: {0}")]
    Export(String),

    /// 未认证或会话无效
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: Uuid) -> Self {
        Self::NotFound { resource_type, id }
    }

    /// 创建验证错误
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<crate::application::ports::RepositoryError> for ApplicationError {
    fn from(err: crate::application::ports::RepositoryError) -> Self {
        Self::RepositoryError(err.to_string())
    }
}

impl From<ProjectError> for ApplicationError {
    fn from(err: ProjectError) -> Self {
        Self::Validation {
            field: err.field(),
            message: err.to_string(),
        }
    }
}

impl From<TextGenError> for ApplicationError {
    fn from(err: TextGenError) -> Self {
        Self::Generation(err.to_string())
    }
}

impl From<ExportError> for ApplicationError {
    fn from(err: ExportError) -> Self {
        Self::Export(err.to_string())
    }
}
