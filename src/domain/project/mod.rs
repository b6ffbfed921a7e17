//! Project Context - 文档项目限界上下文
//!
//! 职责:
//! - 项目聚合管理（标题、文档类型、主提示词）
//! - 内容节点实体与顺序不变量

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::Project;
pub use entities::Node;
pub use errors::ProjectError;
pub use value_objects::{DocumentKind, NodeId, OwnerId, ProjectId, Title};
