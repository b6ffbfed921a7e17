//! HTTP Routes
//!
//! API 路由定义
//!
//! API Endpoints:
//! - /api/ping              GET   健康检查
//! - /api/auth/register     POST  注册（返回会话令牌）
//! - /api/auth/login        POST  登录
//! - /api/auth/logout       POST  登出（撤销令牌）
//! - /api/project/create    POST  创建项目（标题 + 文档类型 + 节点标题）
//! - /api/project/list      GET   列出当前用户的项目
//! - /api/project/get       POST  获取项目详情（节点按 position 排序）
//! - /api/project/delete    POST  删除项目（级联删除节点）
//! - /api/project/export    POST  导出 docx/pptx 工件（二进制下载）
//! - /api/node/get          POST  获取单个节点
//! - /api/node/save         POST  直接保存节点内容
//! - /api/node/generate     POST  生成节点内容（节点级互斥）
//! - /api/node/refine       POST  按指令润色节点内容

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/auth", auth_routes())
        .nest("/project", project_routes())
        .nest("/node", node_routes())
}

/// Auth 路由
fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/logout", post(handlers::logout))
}

/// Project 路由
fn project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/create", post(handlers::create_project))
        .route("/list", get(handlers::list_projects))
        .route("/get", post(handlers::get_project))
        .route("/delete", post(handlers::delete_project))
        .route("/export", post(handlers::export_project))
}

/// Node 路由
fn node_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/get", post(handlers::get_node))
        .route("/save", post(handlers::save_node))
        .route("/generate", post(handlers::generate_node))
        .route("/refine", post(handlers::refine_node))
}
