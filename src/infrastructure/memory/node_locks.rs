//! In-Memory Generation Lock Registry
//!
//! 按节点 ID 维护 tokio Mutex，保证每个节点至多一个在途生成调用。
//! 锁条目随首次访问创建，数量以节点数为上界，不做回收。

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::application::ports::{GenerationGuard, GenerationLockPort};

/// 内存节点生成锁注册表
pub struct InMemoryGenerationLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl InMemoryGenerationLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemoryGenerationLocks {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationLockPort for InMemoryGenerationLocks {
    fn try_acquire(&self, node_id: Uuid) -> Option<GenerationGuard> {
        let lock = self
            .locks
            .entry(node_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();

        match lock.try_lock_owned() {
            Ok(guard) => Some(GenerationGuard::new(guard)),
            Err(_) => {
                tracing::debug!(node_id = %node_id, "Generation lock busy");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_second_acquire_fails_until_released() {
        let locks = InMemoryGenerationLocks::new();
        let node_id = Uuid::new_v4();

        let guard = locks.try_acquire(node_id);
        assert!(guard.is_some());
        assert!(locks.try_acquire(node_id).is_none());

        drop(guard);
        assert!(locks.try_acquire(node_id).is_some());
    }

    #[tokio::test]
    async fn test_locks_are_per_node() {
        let locks = InMemoryGenerationLocks::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let _guard_a = locks.try_acquire(a).unwrap();
        assert!(locks.try_acquire(b).is_some());
    }
}
