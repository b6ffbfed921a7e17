//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TextGen、Repository、SessionManager、DocumentWriter 等）
//! - commands: CQRS 命令及处理器
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Auth commands
    Login,
    Logout,
    RegisterUser,
    // Node commands
    GenerateNode,
    RefineNode,
    SaveNode,
    // Project commands
    CreateProject,
    DeleteProject,
    // Handlers
    handlers::{
        AuthResponse, CreateProjectHandler, CreateProjectResponse, CreatedNode,
        DeleteProjectHandler, GenerateNodeHandler, LoginHandler, LogoutHandler,
        NodeContentResponse, RefineNodeHandler, RegisterUserHandler, SaveNodeHandler,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Document writer
    DocumentWriterPort,
    ExportDocument,
    ExportError,
    ExportSection,
    // Generation lock
    GenerationGuard,
    GenerationLockPort,
    // Repositories
    NodeRecord,
    ProjectRecord,
    ProjectRepositoryPort,
    RepositoryError,
    UserRecord,
    UserRepositoryPort,
    // Session manager
    AuthSession,
    SessionError,
    SessionManagerPort,
    // Text generation
    CompletionRequest,
    CompletionResponse,
    TextGenError,
    TextGenPort,
};

pub use queries::{
    // Export queries
    ExportProject,
    // Project queries
    GetNode,
    GetProject,
    ListProjects,
    // Handlers
    handlers::{
        ExportArtifact, ExportProjectHandler, GetNodeHandler, GetProjectHandler,
        ListProjectsHandler, NodeView, ProjectDetailResponse, ProjectSummaryResponse,
    },
};
