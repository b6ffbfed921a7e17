//! Node Command Handlers - 生成编排
//!
//! 单节点生成/润色/保存的读-改-写编排:
//! - generate/refine 持有节点生成锁期间调用外部能力，成功后整体覆盖内容
//! - 同一节点已有在途生成时，第二个 generate/refine 以 Conflict 拒绝
//! - save 不加锁，与在途生成按写入完成顺序生效（last-write-wins）
//! - 外部调用失败时节点内容保持原样，不产生部分写入

use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{GenerateNode, RefineNode, SaveNode};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    CompletionRequest, GenerationGuard, GenerationLockPort, NodeRecord, ProjectRecord,
    ProjectRepositoryPort, TextGenPort,
};

/// 节点内容响应（三个命令共用）
#[derive(Debug, Clone)]
pub struct NodeContentResponse {
    pub id: Uuid,
    pub project_id: Uuid,
    pub title: String,
    pub position: usize,
    pub content_current: String,
}

impl From<NodeRecord> for NodeContentResponse {
    fn from(record: NodeRecord) -> Self {
        Self {
            id: record.id,
            project_id: record.project_id,
            title: record.title,
            position: record.position,
            content_current: record.content_current,
        }
    }
}

/// 生成上下文: 项目主题 + 文档类型 + 节点标题
fn build_generate_context(project: &ProjectRecord, node: &NodeRecord) -> String {
    format!(
        "Generate content for the document section.\n\
         Document Kind: {}\n\
         Section Title: {}\n\
         Main Topic: {}",
        project.document_kind, node.title, project.main_prompt
    )
}

/// 润色上下文: 节点*当前*内容 + 润色指令
fn build_refine_context(node: &NodeRecord, instruction: &str) -> String {
    format!(
        "Refine the existing content.\n\
         Section Title: {}\n\
         Existing Content: {}\n\
         Refinement Instruction: {}",
        node.title, node.content_current, instruction
    )
}

/// 加载节点并校验所有权（缺失与他人项目统一回报 NotFound）
async fn load_owned_node(
    project_repo: &Arc<dyn ProjectRepositoryPort>,
    owner_id: Uuid,
    project_id: Uuid,
    node_id: Uuid,
) -> Result<(ProjectRecord, NodeRecord), ApplicationError> {
    let project = project_repo
        .find_by_id(project_id)
        .await?
        .filter(|p| p.owner_id == owner_id)
        .ok_or_else(|| ApplicationError::not_found("Project", project_id))?;

    let node = project_repo
        .find_node(project_id, node_id)
        .await?
        .ok_or_else(|| ApplicationError::not_found("Node", node_id))?;

    Ok((project, node))
}

/// 在独立任务中执行外部生成调用
///
/// 节点锁守卫随任务一起移动：调用方断开时 handler future 被丢弃，
/// 但已发出的外部调用继续持锁完成，结束后结果与守卫一并被丢弃，
/// 期间该节点不会接受第二个生成调用，内容也不会被部分修改。
/// 正常路径下守卫随结果返回，由调用方持有到内容落库之后。
async fn run_completion(
    text_gen: Arc<dyn TextGenPort>,
    guard: GenerationGuard,
    context: String,
) -> Result<(String, GenerationGuard), ApplicationError> {
    let task = tokio::spawn(async move {
        let result = text_gen.complete(CompletionRequest { context }).await;
        (result, guard)
    });
    let (result, guard) = task
        .await
        .map_err(|e| ApplicationError::internal(format!("generation task failed: {}", e)))?;
    Ok((result?.text, guard))
}

// ============================================================================
// GenerateNode
// ============================================================================

/// GenerateNode Handler
///
/// 对节点当前内容无前置要求（幂等于先前状态）
pub struct GenerateNodeHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
    text_gen: Arc<dyn TextGenPort>,
    generation_locks: Arc<dyn GenerationLockPort>,
}

impl GenerateNodeHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepositoryPort>,
        text_gen: Arc<dyn TextGenPort>,
        generation_locks: Arc<dyn GenerationLockPort>,
    ) -> Self {
        Self {
            project_repo,
            text_gen,
            generation_locks,
        }
    }

    pub async fn handle(
        &self,
        command: GenerateNode,
    ) -> Result<NodeContentResponse, ApplicationError> {
        let (project, node) = load_owned_node(
            &self.project_repo,
            command.owner_id,
            command.project_id,
            command.node_id,
        )
        .await?;

        let guard = self
            .generation_locks
            .try_acquire(command.node_id)
            .ok_or(ApplicationError::Conflict(command.node_id))?;

        let context = build_generate_context(&project, &node);
        let (text, guard) = run_completion(self.text_gen.clone(), guard, context).await?;

        self.project_repo
            .update_node_content(command.node_id, &text)
            .await?;
        drop(guard);

        tracing::info!(
            project_id = %command.project_id,
            node_id = %command.node_id,
            chars = text.chars().count(),
            "Node content generated"
        );

        Ok(NodeContentResponse {
            id: node.id,
            project_id: node.project_id,
            title: node.title,
            position: node.position,
            content_current: text,
        })
    }
}

// ============================================================================
// RefineNode
// ============================================================================

/// RefineNode Handler
pub struct RefineNodeHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
    text_gen: Arc<dyn TextGenPort>,
    generation_locks: Arc<dyn GenerationLockPort>,
}

impl RefineNodeHandler {
    pub fn new(
        project_repo: Arc<dyn ProjectRepositoryPort>,
        text_gen: Arc<dyn TextGenPort>,
        generation_locks: Arc<dyn GenerationLockPort>,
    ) -> Self {
        Self {
            project_repo,
            text_gen,
            generation_locks,
        }
    }

    pub async fn handle(
        &self,
        command: RefineNode,
    ) -> Result<NodeContentResponse, ApplicationError> {
        // 指令校验先于一切副作用，空指令不得触达外部能力
        let instruction = command.instruction.trim();
        if instruction.is_empty() {
            return Err(ApplicationError::validation(
                "instruction",
                "refinement instruction cannot be empty",
            ));
        }

        // 所有权校验在取锁之前，忙碌状态不向无权调用方泄露
        load_owned_node(
            &self.project_repo,
            command.owner_id,
            command.project_id,
            command.node_id,
        )
        .await?;

        let guard = self
            .generation_locks
            .try_acquire(command.node_id)
            .ok_or(ApplicationError::Conflict(command.node_id))?;

        // 持锁后重读节点：润色上下文必须基于取锁时刻的落库内容，
        // 不能用锁外读到的旧值与在途生成交错
        let node = self
            .project_repo
            .find_node(command.project_id, command.node_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Node", command.node_id))?;

        let context = build_refine_context(&node, instruction);
        let (text, guard) = run_completion(self.text_gen.clone(), guard, context).await?;

        self.project_repo
            .update_node_content(command.node_id, &text)
            .await?;
        drop(guard);

        tracing::info!(
            project_id = %command.project_id,
            node_id = %command.node_id,
            chars = text.chars().count(),
            "Node content refined"
        );

        Ok(NodeContentResponse {
            id: node.id,
            project_id: node.project_id,
            title: node.title,
            position: node.position,
            content_current: text,
        })
    }
}

// ============================================================================
// SaveNode
// ============================================================================

/// SaveNode Handler
///
/// 直接覆盖，内容本身不做校验，仅要求节点存在
pub struct SaveNodeHandler {
    project_repo: Arc<dyn ProjectRepositoryPort>,
}

impl SaveNodeHandler {
    pub fn new(project_repo: Arc<dyn ProjectRepositoryPort>) -> Self {
        Self { project_repo }
    }

    pub async fn handle(&self, command: SaveNode) -> Result<NodeContentResponse, ApplicationError> {
        let (_, node) = load_owned_node(
            &self.project_repo,
            command.owner_id,
            command.project_id,
            command.node_id,
        )
        .await?;

        self.project_repo
            .update_node_content(command.node_id, &command.content)
            .await?;

        tracing::debug!(
            project_id = %command.project_id,
            node_id = %command.node_id,
            "Node content saved"
        );

        Ok(NodeContentResponse {
            id: node.id,
            project_id: node.project_id,
            title: node.title,
            position: node.position,
            content_current: command.content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use crate::application::commands::CreateProject;
    use crate::application::commands::handlers::CreateProjectHandler;
    use crate::application::ports::{RepositoryError, UserRecord, UserRepositoryPort};
    use crate::infrastructure::adapters::FakeTextGenClient;
    use crate::infrastructure::memory::InMemoryGenerationLocks;
    use crate::infrastructure::persistence::sqlite::{
        create_pool, run_migrations, DatabaseConfig, SqliteProjectRepository,
        SqliteUserRepository,
    };

    struct Fixture {
        project_repo: Arc<dyn ProjectRepositoryPort>,
        locks: Arc<InMemoryGenerationLocks>,
        owner_id: Uuid,
        project_id: Uuid,
        node_id: Uuid,
    }

    async fn fixture() -> Fixture {
        let pool = create_pool(&DatabaseConfig::in_memory()).await.unwrap();
        run_migrations(&pool).await.unwrap();

        // projects.owner_id 有外键约束，先落一条用户记录
        let owner_id = Uuid::new_v4();
        SqliteUserRepository::new(pool.clone())
            .save(&UserRecord {
                id: owner_id,
                email: format!("{}@example.com", owner_id),
                name: None,
                password_hash: "$argon2id$fake".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let project_repo: Arc<dyn ProjectRepositoryPort> =
            Arc::new(SqliteProjectRepository::new(pool));

        let created = CreateProjectHandler::new(project_repo.clone())
            .handle(CreateProject {
                owner_id,
                title: "测试文档".to_string(),
                document_kind: "flow-document".to_string(),
                main_prompt: "关于并发控制".to_string(),
                node_titles: vec!["引言".to_string(), "正文".to_string()],
            })
            .await
            .unwrap();

        Fixture {
            project_repo,
            locks: Arc::new(InMemoryGenerationLocks::new()),
            owner_id,
            project_id: created.id,
            node_id: created.nodes[0].id,
        }
    }

    #[tokio::test]
    async fn test_generate_overwrites_content() {
        let fx = fixture().await;
        let text_gen = Arc::new(FakeTextGenClient::with_responses(vec![Ok(
            "生成的正文".to_string()
        )]));

        let handler =
            GenerateNodeHandler::new(fx.project_repo.clone(), text_gen.clone(), fx.locks.clone());
        let result = handler
            .handle(GenerateNode {
                owner_id: fx.owner_id,
                project_id: fx.project_id,
                node_id: fx.node_id,
            })
            .await
            .unwrap();

        assert_eq!(result.content_current, "生成的正文");
        let node = fx
            .project_repo
            .find_node(fx.project_id, fx.node_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(node.content_current, "生成的正文");
        assert_eq!(text_gen.call_count(), 1);
        // 生成上下文包含项目主题与节点标题
        let context = text_gen.contexts().pop().unwrap();
        assert!(context.contains("关于并发控制"));
        assert!(context.contains("引言"));
        assert!(context.contains("flow-document"));
    }

    #[tokio::test]
    async fn test_refine_uses_generated_content() {
        let fx = fixture().await;
        let text_gen = Arc::new(FakeTextGenClient::with_responses(vec![
            Ok("第一版内容".to_string()),
            Ok("润色后的内容".to_string()),
        ]));

        GenerateNodeHandler::new(fx.project_repo.clone(), text_gen.clone(), fx.locks.clone())
            .handle(GenerateNode {
                owner_id: fx.owner_id,
                project_id: fx.project_id,
                node_id: fx.node_id,
            })
            .await
            .unwrap();

        let result =
            RefineNodeHandler::new(fx.project_repo.clone(), text_gen.clone(), fx.locks.clone())
                .handle(RefineNode {
                    owner_id: fx.owner_id,
                    project_id: fx.project_id,
                    node_id: fx.node_id,
                    instruction: "更正式一些".to_string(),
                })
                .await
                .unwrap();

        assert_eq!(result.content_current, "润色后的内容");
        // 润色上下文必须基于 generate 的产出，而不是两者的混合
        let refine_context = text_gen.contexts().pop().unwrap();
        assert!(refine_context.contains("第一版内容"));
        assert!(refine_context.contains("更正式一些"));
    }

    #[tokio::test]
    async fn test_refine_blank_instruction_never_calls_capability() {
        let fx = fixture().await;
        let text_gen = Arc::new(FakeTextGenClient::with_responses(vec![Ok(
            "不应出现".to_string()
        )]));

        let result =
            RefineNodeHandler::new(fx.project_repo.clone(), text_gen.clone(), fx.locks.clone())
                .handle(RefineNode {
                    owner_id: fx.owner_id,
                    project_id: fx.project_id,
                    node_id: fx.node_id,
                    instruction: "   \n\t ".to_string(),
                })
                .await;

        assert!(matches!(
            result,
            Err(ApplicationError::Validation { field: "instruction", .. })
        ));
        assert_eq!(text_gen.call_count(), 0);
    }

    #[tokio::test]
    async fn test_generation_failure_leaves_content_unchanged() {
        let fx = fixture().await;

        // 先写入已知内容
        SaveNodeHandler::new(fx.project_repo.clone())
            .handle(SaveNode {
                owner_id: fx.owner_id,
                project_id: fx.project_id,
                node_id: fx.node_id,
                content: "已保存的内容".to_string(),
            })
            .await
            .unwrap();

        let text_gen = Arc::new(FakeTextGenClient::with_responses(vec![Err(
            "upstream exploded".to_string(),
        )]));
        let result =
            GenerateNodeHandler::new(fx.project_repo.clone(), text_gen, fx.locks.clone())
                .handle(GenerateNode {
                    owner_id: fx.owner_id,
                    project_id: fx.project_id,
                    node_id: fx.node_id,
                })
                .await;

        assert!(matches!(result, Err(ApplicationError::Generation(_))));
        let node = fx
            .project_repo
            .find_node(fx.project_id, fx.node_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(node.content_current, "已保存的内容");
    }

    #[tokio::test]
    async fn test_concurrent_generation_conflicts() {
        let fx = fixture().await;
        let text_gen = Arc::new(FakeTextGenClient::with_responses(vec![Ok(
            "新内容".to_string()
        )]));

        // 模拟在途生成: 先占住节点锁
        let _held = fx.locks.try_acquire(fx.node_id).unwrap();

        let result = GenerateNodeHandler::new(fx.project_repo.clone(), text_gen, fx.locks.clone())
            .handle(GenerateNode {
                owner_id: fx.owner_id,
                project_id: fx.project_id,
                node_id: fx.node_id,
            })
            .await;

        assert!(matches!(result, Err(ApplicationError::Conflict(id)) if id == fx.node_id));
    }

    #[tokio::test]
    async fn test_save_roundtrip_and_foreign_owner_hidden() {
        let fx = fixture().await;

        let saved = SaveNodeHandler::new(fx.project_repo.clone())
            .handle(SaveNode {
                owner_id: fx.owner_id,
                project_id: fx.project_id,
                node_id: fx.node_id,
                content: "X".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(saved.content_current, "X");

        // 他人身份访问与项目不存在不可区分
        let result = SaveNodeHandler::new(fx.project_repo.clone())
            .handle(SaveNode {
                owner_id: Uuid::new_v4(),
                project_id: fx.project_id,
                node_id: fx.node_id,
                content: "Y".to_string(),
            })
            .await;
        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));

        let node = fx
            .project_repo
            .find_node(fx.project_id, fx.node_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(node.content_current, "X");
    }

    /// 包装仓储：第一次 find_node 返回前暂停，
    /// 制造"锁外读取完成、尚未取锁"的并发窗口
    struct GatedProjectRepo {
        inner: Arc<dyn ProjectRepositoryPort>,
        entered: tokio::sync::Notify,
        gate: tokio::sync::Semaphore,
        gated: AtomicBool,
    }

    impl GatedProjectRepo {
        fn new(inner: Arc<dyn ProjectRepositoryPort>) -> Self {
            Self {
                inner,
                entered: tokio::sync::Notify::new(),
                gate: tokio::sync::Semaphore::new(0),
                gated: AtomicBool::new(false),
            }
        }

        fn open(&self) {
            self.gate.add_permits(1);
        }
    }

    #[async_trait]
    impl ProjectRepositoryPort for GatedProjectRepo {
        async fn save(
            &self,
            project: &ProjectRecord,
            nodes: &[NodeRecord],
        ) -> Result<(), RepositoryError> {
            self.inner.save(project, nodes).await
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<ProjectRecord>, RepositoryError> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_owner(
            &self,
            owner_id: Uuid,
        ) -> Result<Vec<ProjectRecord>, RepositoryError> {
            self.inner.find_by_owner(owner_id).await
        }

        async fn find_nodes_by_project(
            &self,
            project_id: Uuid,
        ) -> Result<Vec<NodeRecord>, RepositoryError> {
            self.inner.find_nodes_by_project(project_id).await
        }

        async fn find_node(
            &self,
            project_id: Uuid,
            node_id: Uuid,
        ) -> Result<Option<NodeRecord>, RepositoryError> {
            let result = self.inner.find_node(project_id, node_id).await;
            if !self.gated.swap(true, Ordering::SeqCst) {
                self.entered.notify_one();
                let _permit = self.gate.acquire().await.unwrap();
            }
            result
        }

        async fn update_node_content(
            &self,
            node_id: Uuid,
            content: &str,
        ) -> Result<(), RepositoryError> {
            self.inner.update_node_content(node_id, content).await
        }

        async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn test_refine_rereads_content_under_lock() {
        let fx = fixture().await;
        SaveNodeHandler::new(fx.project_repo.clone())
            .handle(SaveNode {
                owner_id: fx.owner_id,
                project_id: fx.project_id,
                node_id: fx.node_id,
                content: "初稿".to_string(),
            })
            .await
            .unwrap();

        let gated = Arc::new(GatedProjectRepo::new(fx.project_repo.clone()));
        let text_gen = Arc::new(FakeTextGenClient::with_responses(vec![
            Ok("重写稿".to_string()),
            Ok("润色稿".to_string()),
        ]));

        // 润色在锁外读完节点后暂停，尚未取锁
        let refine_task = {
            let repo: Arc<dyn ProjectRepositoryPort> = gated.clone();
            let handler = RefineNodeHandler::new(repo, text_gen.clone(), fx.locks.clone());
            let command = RefineNode {
                owner_id: fx.owner_id,
                project_id: fx.project_id,
                node_id: fx.node_id,
                instruction: "更凝练".to_string(),
            };
            tokio::spawn(async move { handler.handle(command).await })
        };
        gated.entered.notified().await;

        // 窗口内完成一次完整生成，节点内容变为"重写稿"
        GenerateNodeHandler::new(fx.project_repo.clone(), text_gen.clone(), fx.locks.clone())
            .handle(GenerateNode {
                owner_id: fx.owner_id,
                project_id: fx.project_id,
                node_id: fx.node_id,
            })
            .await
            .unwrap();

        gated.open();
        let result = refine_task.await.unwrap().unwrap();
        assert_eq!(result.content_current, "润色稿");

        // 润色上下文基于取锁后重读的最新内容，而不是窗口前的旧值
        let refine_context = text_gen.contexts().pop().unwrap();
        assert!(refine_context.contains("重写稿"));
        assert!(!refine_context.contains("初稿"));
    }

    #[tokio::test]
    async fn test_disconnect_holds_lock_until_call_completes() {
        let fx = fixture().await;
        let text_gen = Arc::new(
            FakeTextGenClient::with_responses(vec![Ok("迟到的结果".to_string())])
                .with_delay_ms(200),
        );

        let handler = Arc::new(GenerateNodeHandler::new(
            fx.project_repo.clone(),
            text_gen.clone(),
            fx.locks.clone(),
        ));
        let request = {
            let handler = handler.clone();
            let command = GenerateNode {
                owner_id: fx.owner_id,
                project_id: fx.project_id,
                node_id: fx.node_id,
            };
            tokio::spawn(async move { handler.handle(command).await })
        };

        // 等待外部调用进入在途状态
        while text_gen.call_count() == 0 {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        // 调用方断开：请求 future 被丢弃，但在途调用仍持有节点锁
        request.abort();
        let _ = request.await;
        assert!(fx.locks.try_acquire(fx.node_id).is_none());

        // 在途调用完成后锁被释放，其结果被丢弃，节点内容不变
        tokio::time::sleep(std::time::Duration::from_millis(400)).await;
        assert!(fx.locks.try_acquire(fx.node_id).is_some());
        let node = fx
            .project_repo
            .find_node(fx.project_id, fx.node_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(node.content_current, "");
    }
}
