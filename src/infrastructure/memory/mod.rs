//! Memory Layer - In-Memory State Management
//!
//! 实现 SessionManager 和 GenerationLocks，管理登录会话与节点生成临界区的内存状态

mod node_locks;
mod session_manager;

pub use node_locks::InMemoryGenerationLocks;
pub use session_manager::InMemorySessionManager;
