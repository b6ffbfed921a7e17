//! Scrivo - AI 辅助文档创作系统
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Project Context: 项目与节点聚合（标题、文档类型、节点顺序等不变量）
//!
//! 应用层 (application/):
//! - Ports: 端口定义（TextGen, DocumentWriter, SessionManager, GenerationLock, Repositories）
//! - Commands: CQRS 命令处理器（注册/登录、项目创建删除、节点生成/润色/保存）
//! - Queries: CQRS 查询处理器（项目详情/列表、节点读取、文档导出）
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Memory: SessionManager、节点生成锁内存实现
//! - Persistence: SQLite 存储
//! - Adapters: TextGen Client, Docx/Pptx Writer

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
