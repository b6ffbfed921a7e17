//! Auth Commands

/// 注册用户命令
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

/// 登录命令
#[derive(Debug, Clone)]
pub struct Login {
    pub email: String,
    pub password: String,
}

/// 登出命令（显式清除会话）
#[derive(Debug, Clone)]
pub struct Logout {
    pub token: String,
}
