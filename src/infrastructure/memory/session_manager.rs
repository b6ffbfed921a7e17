//! In-Memory Session Manager Implementation

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{AuthSession, SessionError, SessionManagerPort};

/// 内存登录会话管理器
///
/// token -> AuthSession；进程重启即全部失效，登录状态不落盘
pub struct InMemorySessionManager {
    sessions: DashMap<String, AuthSession>,
}

impl InMemorySessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemorySessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManagerPort for InMemorySessionManager {
    fn create(&self, session: AuthSession) -> Result<String, SessionError> {
        let token = session.token.clone();
        if self.sessions.contains_key(&token) {
            return Err(SessionError::AlreadyExists(token));
        }
        let user_id = session.user_id;
        self.sessions.insert(token.clone(), session);
        tracing::info!(user_id = %user_id, "Auth session created");
        Ok(token)
    }

    fn resolve(&self, token: &str) -> Result<AuthSession, SessionError> {
        self.sessions
            .get(token)
            .map(|s| s.clone())
            .ok_or_else(|| SessionError::NotFound(token.to_string()))
    }

    fn revoke(&self, token: &str) -> Result<(), SessionError> {
        self.sessions
            .remove(token)
            .map(|(_, s)| {
                tracing::info!(user_id = %s.user_id, "Auth session revoked");
            })
            .ok_or_else(|| SessionError::NotFound(token.to_string()))
    }

    fn touch(&self, token: &str) {
        if let Some(mut session) = self.sessions.get_mut(token) {
            session.last_activity = Utc::now();
        }
    }

    fn expired_tokens(&self, idle_timeout_secs: u64) -> Vec<String> {
        let now = Utc::now();
        let timeout = chrono::Duration::seconds(idle_timeout_secs as i64);

        self.sessions
            .iter()
            .filter_map(|entry| {
                let elapsed = now - entry.last_activity;
                if elapsed > timeout {
                    Some(entry.key().clone())
                } else {
                    None
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_session_lifecycle() {
        let manager = InMemorySessionManager::new();
        let user_id = Uuid::new_v4();
        let session = AuthSession::new(user_id);
        let token = session.token.clone();

        // Create
        let result = manager.create(session);
        assert!(result.is_ok());

        // Resolve
        let resolved = manager.resolve(&token);
        assert!(resolved.is_ok());
        assert_eq!(resolved.unwrap().user_id, user_id);

        // Revoke
        let result = manager.revoke(&token);
        assert!(result.is_ok());
        assert!(manager.resolve(&token).is_err());
    }

    #[test]
    fn test_unknown_token_rejected() {
        let manager = InMemorySessionManager::new();
        assert!(manager.resolve("no-such-token").is_err());
        assert!(manager.revoke("no-such-token").is_err());
    }

    #[test]
    fn test_fresh_session_is_not_expired() {
        let manager = InMemorySessionManager::new();
        manager.create(AuthSession::new(Uuid::new_v4())).unwrap();
        assert!(manager.expired_tokens(3600).is_empty());
    }
}
