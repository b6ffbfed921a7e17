//! 应用层 - 命令（写操作）
//!
//! CQRS 命令侧：处理所有写操作

mod auth_commands;
mod node_commands;
mod project_commands;

pub mod handlers;

pub use auth_commands::{Login, Logout, RegisterUser};
pub use node_commands::{GenerateNode, RefineNode, SaveNode};
pub use project_commands::{CreateProject, DeleteProject};
