//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    CreateProjectHandler, DeleteProjectHandler, GenerateNodeHandler, LoginHandler, LogoutHandler,
    RefineNodeHandler, RegisterUserHandler, SaveNodeHandler,
    // Query handlers
    ExportProjectHandler, GetNodeHandler, GetProjectHandler, ListProjectsHandler,
    // Ports
    DocumentWriterPort, GenerationLockPort, ProjectRepositoryPort, SessionManagerPort,
    TextGenPort, UserRepositoryPort,
};

/// 应用状态
///
/// SessionManager 与生成锁为内存实现，仓储为 SQLite 实现
pub struct AppState {
    // ========== Ports ==========
    pub session_manager: Arc<dyn SessionManagerPort>,
    pub user_repo: Arc<dyn UserRepositoryPort>,
    pub project_repo: Arc<dyn ProjectRepositoryPort>,
    pub text_gen: Arc<dyn TextGenPort>,
    pub generation_locks: Arc<dyn GenerationLockPort>,

    // ========== Command Handlers ==========
    pub register_user_handler: RegisterUserHandler,
    pub login_handler: LoginHandler,
    pub logout_handler: LogoutHandler,
    pub create_project_handler: CreateProjectHandler,
    pub delete_project_handler: DeleteProjectHandler,
    pub generate_node_handler: GenerateNodeHandler,
    pub refine_node_handler: RefineNodeHandler,
    pub save_node_handler: SaveNodeHandler,

    // ========== Query Handlers ==========
    pub get_project_handler: GetProjectHandler,
    pub list_projects_handler: ListProjectsHandler,
    pub get_node_handler: GetNodeHandler,
    pub export_project_handler: ExportProjectHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        session_manager: Arc<dyn SessionManagerPort>,
        user_repo: Arc<dyn UserRepositoryPort>,
        project_repo: Arc<dyn ProjectRepositoryPort>,
        text_gen: Arc<dyn TextGenPort>,
        generation_locks: Arc<dyn GenerationLockPort>,
        flow_writer: Arc<dyn DocumentWriterPort>,
        slide_writer: Arc<dyn DocumentWriterPort>,
    ) -> Self {
        Self {
            // Ports
            session_manager: session_manager.clone(),
            user_repo: user_repo.clone(),
            project_repo: project_repo.clone(),
            text_gen: text_gen.clone(),
            generation_locks: generation_locks.clone(),

            // Command handlers
            register_user_handler: RegisterUserHandler::new(
                user_repo.clone(),
                session_manager.clone(),
            ),
            login_handler: LoginHandler::new(user_repo.clone(), session_manager.clone()),
            logout_handler: LogoutHandler::new(session_manager.clone()),
            create_project_handler: CreateProjectHandler::new(project_repo.clone()),
            delete_project_handler: DeleteProjectHandler::new(project_repo.clone()),
            generate_node_handler: GenerateNodeHandler::new(
                project_repo.clone(),
                text_gen.clone(),
                generation_locks.clone(),
            ),
            refine_node_handler: RefineNodeHandler::new(
                project_repo.clone(),
                text_gen.clone(),
                generation_locks.clone(),
            ),
            save_node_handler: SaveNodeHandler::new(project_repo.clone()),

            // Query handlers
            get_project_handler: GetProjectHandler::new(project_repo.clone()),
            list_projects_handler: ListProjectsHandler::new(project_repo.clone()),
            get_node_handler: GetNodeHandler::new(project_repo.clone()),
            export_project_handler: ExportProjectHandler::new(
                project_repo.clone(),
                flow_writer,
                slide_writer,
            ),
        }
    }
}
