//! Domain Layer - 领域层
//!
//! 包含一个限界上下文:
//! - Project Context: 文档项目与内容节点管理

pub mod project;
