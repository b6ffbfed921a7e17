//! Scrivo - AI 辅助文档创作系统
//!
//! - Domain: project/ (Bounded Context)
//! - Application: commands, queries, ports
//! - Infrastructure: http, memory, persistence, adapters

use std::sync::Arc;

use scrivo::application::{SessionManagerPort, TextGenPort};
use scrivo::config::{load_config, print_config};
use scrivo::infrastructure::adapters::{
    DocxWriter, HttpTextGenClient, HttpTextGenClientConfig, PptxWriter,
};
use scrivo::infrastructure::http::{AppState, HttpServer, ServerConfig};
use scrivo::infrastructure::memory::{InMemoryGenerationLocks, InMemorySessionManager};
use scrivo::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteProjectRepository, SqliteUserRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},scrivo={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Scrivo - AI 辅助文档创作系统");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let project_repo = Arc::new(SqliteProjectRepository::new(pool.clone()));
    let user_repo = Arc::new(SqliteUserRepository::new(pool.clone()));

    // 创建文本生成客户端
    let textgen_config = HttpTextGenClientConfig {
        base_url: config.textgen.url.clone(),
        api_key: config.textgen.api_key.clone().unwrap_or_default(),
        timeout_secs: config.textgen.timeout_secs,
    };
    let text_gen = Arc::new(HttpTextGenClient::new(textgen_config)?);

    // 生成服务不可用不阻断启动，只提示
    if !text_gen.health_check().await {
        tracing::warn!(
            url = %config.textgen.url,
            "Generation service health check failed, requests will error until it is reachable"
        );
    }

    // 创建内存 Session 管理器与节点生成锁
    let session_manager = Arc::new(InMemorySessionManager::new());
    let generation_locks = Arc::new(InMemoryGenerationLocks::new());

    // 文档写出器
    let flow_writer = Arc::new(DocxWriter::new());
    let slide_writer = Arc::new(PptxWriter::new());

    // 过期会话清理
    let reaper_sessions = session_manager.clone();
    let session_expire_secs = config.auth.session_expire_secs;
    let reap_interval_secs = config.auth.reap_interval_secs;
    tokio::spawn(async move {
        let mut ticker =
            tokio::time::interval(std::time::Duration::from_secs(reap_interval_secs));
        loop {
            ticker.tick().await;
            let expired = reaper_sessions.expired_tokens(session_expire_secs);
            for token in &expired {
                let _ = reaper_sessions.revoke(token);
            }
            if !expired.is_empty() {
                tracing::info!(count = expired.len(), "Expired sessions reaped");
            }
        }
    });

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        session_manager,
        user_repo,
        project_repo,
        text_gen,
        generation_locks,
        flow_writer,
        slide_writer,
    );

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
