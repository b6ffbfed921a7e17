//! Auth Command Handlers
//!
//! 注册/登录签发不透明 bearer token，核心只消费解析出的 user_id

use argon2::password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{Login, Logout, RegisterUser};
use crate::application::error::ApplicationError;
use crate::application::ports::{AuthSession, SessionManagerPort, UserRecord, UserRepositoryPort};

/// 认证响应（注册与登录共用）
#[derive(Debug, Clone)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
}

fn hash_password(password: &str) -> Result<String, ApplicationError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ApplicationError::internal(format!("password hashing failed: {}", e)))
}

fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

// ============================================================================
// RegisterUser
// ============================================================================

/// RegisterUser Handler
pub struct RegisterUserHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    session_manager: Arc<dyn SessionManagerPort>,
}

impl RegisterUserHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        session_manager: Arc<dyn SessionManagerPort>,
    ) -> Self {
        Self {
            user_repo,
            session_manager,
        }
    }

    pub async fn handle(&self, command: RegisterUser) -> Result<AuthResponse, ApplicationError> {
        let email = command.email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(ApplicationError::validation("email", "invalid email address"));
        }
        if command.password.is_empty() {
            return Err(ApplicationError::validation("password", "password cannot be empty"));
        }

        if self.user_repo.find_by_email(&email).await?.is_some() {
            return Err(ApplicationError::validation("email", "email already registered"));
        }

        let user = UserRecord {
            id: Uuid::new_v4(),
            email: email.clone(),
            name: command.name,
            password_hash: hash_password(&command.password)?,
            created_at: Utc::now(),
        };
        self.user_repo.save(&user).await?;

        let session = AuthSession::new(user.id);
        let token = self
            .session_manager
            .create(session)
            .map_err(|e| ApplicationError::internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, email = %email, "User registered");

        Ok(AuthResponse {
            token,
            user_id: user.id,
            email,
        })
    }
}

// ============================================================================
// Login
// ============================================================================

/// Login Handler
pub struct LoginHandler {
    user_repo: Arc<dyn UserRepositoryPort>,
    session_manager: Arc<dyn SessionManagerPort>,
}

impl LoginHandler {
    pub fn new(
        user_repo: Arc<dyn UserRepositoryPort>,
        session_manager: Arc<dyn SessionManagerPort>,
    ) -> Self {
        Self {
            user_repo,
            session_manager,
        }
    }

    pub async fn handle(&self, command: Login) -> Result<AuthResponse, ApplicationError> {
        let email = command.email.trim().to_lowercase();

        // 凭证无效统一回报 Unauthorized，不区分用户不存在与密码错误
        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .filter(|u| verify_password(&command.password, &u.password_hash))
            .ok_or_else(|| ApplicationError::Unauthorized("invalid credentials".to_string()))?;

        let session = AuthSession::new(user.id);
        let token = self
            .session_manager
            .create(session)
            .map_err(|e| ApplicationError::internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(AuthResponse {
            token,
            user_id: user.id,
            email: user.email,
        })
    }
}

// ============================================================================
// Logout
// ============================================================================

/// Logout Handler
pub struct LogoutHandler {
    session_manager: Arc<dyn SessionManagerPort>,
}

impl LogoutHandler {
    pub fn new(session_manager: Arc<dyn SessionManagerPort>) -> Self {
        Self { session_manager }
    }

    pub fn handle(&self, command: Logout) -> Result<(), ApplicationError> {
        self.session_manager
            .revoke(&command.token)
            .map_err(|e| ApplicationError::Unauthorized(e.to_string()))?;
        tracing::info!("Session revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("secret123").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("secret123", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        assert!(!verify_password("secret123", "not-a-hash"));
    }
}
