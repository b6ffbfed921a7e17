//! Command Handlers 实现
//!
//! 所有 CommandHandler 的具体实现

mod auth_handlers;
mod node_handlers;
mod project_handlers;

pub use auth_handlers::{AuthResponse, LoginHandler, LogoutHandler, RegisterUserHandler};
pub use node_handlers::{
    GenerateNodeHandler, NodeContentResponse, RefineNodeHandler, SaveNodeHandler,
};
pub use project_handlers::{
    CreateProjectHandler, CreateProjectResponse, CreatedNode, DeleteProjectHandler,
};
