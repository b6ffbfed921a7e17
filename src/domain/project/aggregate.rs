//! Project Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{DocumentKind, Node, OwnerId, ProjectError, ProjectId, Title};

/// Project 聚合根
///
/// 不变量:
/// - 创建时至少包含一个节点
/// - 节点 position 从 0 连续且唯一
/// - document_kind 创建后不可变更
/// - 节点只属于一个 Project，随 Project 级联删除
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    owner: OwnerId,
    title: Title,
    document_kind: DocumentKind,
    /// 指导生成的主题描述（自由文本）
    main_prompt: String,
    nodes: Vec<Node>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// 创建新项目，节点按给定标题顺序落在 0..len-1
    pub fn create(
        owner: OwnerId,
        title: impl Into<String>,
        document_kind: DocumentKind,
        main_prompt: impl Into<String>,
        node_titles: Vec<String>,
    ) -> Result<Self, ProjectError> {
        let title = Title::new(title).map_err(|e| ProjectError::InvalidTitle(e.to_string()))?;

        if node_titles.is_empty() {
            return Err(ProjectError::InvalidNodeList(
                "项目至少需要一个节点".to_string(),
            ));
        }

        let mut nodes = Vec::with_capacity(node_titles.len());
        for (position, node_title) in node_titles.into_iter().enumerate() {
            let node_title = Title::new(node_title)
                .map_err(|_| ProjectError::InvalidNodeList(format!("第 {} 个节点标题为空", position)))?;
            nodes.push(Node::new(node_title, position));
        }

        let now = Utc::now();
        Ok(Self {
            id: ProjectId::new(),
            owner,
            title,
            document_kind,
            main_prompt: main_prompt.into(),
            nodes,
            created_at: now,
            updated_at: now,
        })
    }

    // Getters
    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn document_kind(&self) -> DocumentKind {
        self.document_kind
    }

    pub fn main_prompt(&self) -> &str {
        &self.main_prompt
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn owner() -> OwnerId {
        OwnerId::from_uuid(Uuid::new_v4())
    }

    #[test]
    fn test_project_creation_positions() {
        let project = Project::create(
            owner(),
            "测试文档",
            DocumentKind::FlowDocument,
            "一份关于测试的文档",
            vec!["引言".to_string(), "正文".to_string(), "结论".to_string()],
        )
        .unwrap();

        assert_eq!(project.node_count(), 3);
        for (i, node) in project.nodes().iter().enumerate() {
            assert_eq!(node.position(), i);
            assert!(node.content_current().is_empty());
        }
        assert_eq!(project.nodes()[0].title().as_str(), "引言");
        assert_eq!(project.nodes()[2].title().as_str(), "结论");
    }

    #[test]
    fn test_project_creation_requires_nodes() {
        let result = Project::create(
            owner(),
            "测试文档",
            DocumentKind::SlideDeck,
            "",
            vec![],
        );
        assert!(matches!(result, Err(ProjectError::InvalidNodeList(_))));
    }

    #[test]
    fn test_project_creation_rejects_empty_title() {
        let result = Project::create(
            owner(),
            "  ",
            DocumentKind::FlowDocument,
            "",
            vec!["引言".to_string()],
        );
        assert!(matches!(result, Err(ProjectError::InvalidTitle(_))));
    }

    #[test]
    fn test_project_creation_rejects_empty_node_title() {
        let result = Project::create(
            owner(),
            "测试文档",
            DocumentKind::FlowDocument,
            "",
            vec!["引言".to_string(), "".to_string()],
        );
        assert!(matches!(result, Err(ProjectError::InvalidNodeList(_))));
    }
}
