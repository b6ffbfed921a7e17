//! Generation Lock Port - 节点生成临界区
//!
//! 保证每个节点同一时刻至多一个在途的生成调用
//! 具体实现在 infrastructure/memory 层

use tokio::sync::OwnedMutexGuard;
use uuid::Uuid;

/// 节点生成临界区守卫
///
/// 持有期间该节点不允许第二个 generate/refine 进入，drop 即释放
pub struct GenerationGuard {
    _guard: OwnedMutexGuard<()>,
}

impl GenerationGuard {
    pub fn new(guard: OwnedMutexGuard<()>) -> Self {
        Self { _guard: guard }
    }
}

/// Generation Lock Port
///
/// 按节点 ID 提供单写者临界区；save 不经过此锁，按完成顺序覆盖
pub trait GenerationLockPort: Send + Sync {
    /// 尝试获取节点的生成锁，已被占用时返回 None（调用方回报冲突错误）
    fn try_acquire(&self, node_id: Uuid) -> Option<GenerationGuard>;
}
