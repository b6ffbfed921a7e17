//! Query Handlers 实现
//!
//! 所有 QueryHandler 的具体实现

mod export_handlers;
mod project_handlers;

pub use export_handlers::{ExportArtifact, ExportProjectHandler};
pub use project_handlers::{
    GetNodeHandler, GetProjectHandler, ListProjectsHandler, NodeView, ProjectDetailResponse,
    ProjectSummaryResponse,
};
