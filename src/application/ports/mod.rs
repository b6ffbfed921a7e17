//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod document_writer;
mod generation_lock;
mod repositories;
mod session_manager;
mod text_gen;

pub use document_writer::{DocumentWriterPort, ExportDocument, ExportError, ExportSection};
pub use generation_lock::{GenerationGuard, GenerationLockPort};
pub use repositories::{
    NodeRecord, ProjectRecord, ProjectRepositoryPort, RepositoryError, UserRecord,
    UserRepositoryPort,
};
pub use session_manager::{AuthSession, SessionError, SessionManagerPort};
pub use text_gen::{CompletionRequest, CompletionResponse, TextGenError, TextGenPort};
