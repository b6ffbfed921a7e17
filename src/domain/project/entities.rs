//! Project Context - Entities

use serde::{Deserialize, Serialize};

use super::{NodeId, Title};

/// 内容节点 - 文档的一个章节或一页幻灯片
///
/// 不变量:
/// - position 在 Project 内唯一、从 0 连续
/// - title 非空
/// - content_current 可为空（首次生成前）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    id: NodeId,
    /// 节点标题
    title: Title,
    /// 节点在项目中的位置（渲染/导出顺序）
    position: usize,
    /// 当前内容，每次生成/润色/保存整体覆盖
    content_current: String,
}

impl Node {
    pub fn new(title: Title, position: usize) -> Self {
        Self {
            id: NodeId::new(),
            title,
            position,
            content_current: String::new(),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn content_current(&self) -> &str {
        &self.content_current
    }
}
