//! Session Manager Port - 登录会话生命周期管理
//!
//! 定义认证会话的抽象接口，具体实现在 infrastructure/memory 层
//! 核心的所有权检查只依赖会话解析出的 OwnerId，不依赖会话的存储方式

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

/// Session Manager 错误
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session already exists: {0}")]
    AlreadyExists(String),

    #[error("Session expired: {0}")]
    Expired(String),
}

/// 登录会话（in-memory）
///
/// token 是不透明的 bearer 凭证，核心只消费解析出的 user_id
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl AuthSession {
    pub fn new(user_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            token: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            last_activity: now,
        }
    }
}

/// Session Manager Port
///
/// 管理登录会话的生命周期，所有状态存储在内存中
pub trait SessionManagerPort: Send + Sync {
    /// 创建新会话，返回 token
    fn create(&self, session: AuthSession) -> Result<String, SessionError>;

    /// 根据 token 解析会话
    fn resolve(&self, token: &str) -> Result<AuthSession, SessionError>;

    /// 注销会话（显式 logout 清除）
    fn revoke(&self, token: &str) -> Result<(), SessionError>;

    /// 更新最后活动时间
    fn touch(&self, token: &str);

    /// 获取所有过期会话的 token
    fn expired_tokens(&self, idle_timeout_secs: u64) -> Vec<String>;
}
