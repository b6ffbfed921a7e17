//! Text Generation Port - 外部文本生成能力抽象
//!
//! 定义文本生成的抽象接口，具体实现在 infrastructure/adapters 层
//! 外部服务被视为不可信、可能缓慢、可能失败的黑盒

use async_trait::async_trait;
use thiserror::Error;

/// 文本生成错误
#[derive(Debug, Error)]
pub enum TextGenError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 文本生成请求
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// 完整的生成上下文（提示词）
    pub context: String,
}

/// 文本生成响应
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// 生成的文本
    pub text: String,
}

/// Text Generation Port
///
/// 外部生成服务的抽象接口: complete(context) -> text | failure
#[async_trait]
pub trait TextGenPort: Send + Sync {
    /// 执行一次文本补全
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, TextGenError>;

    /// 检查生成服务是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}
