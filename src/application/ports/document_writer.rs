//! Document Writer Port - 文档序列化抽象
//!
//! 定义导出装配器消费的序列化接口，具体实现在 infrastructure/adapters/export 层
//! 序列化必须是全有或全无: 在内存中构建完整文档包，失败时不产出任何工件

use thiserror::Error;

/// 导出错误（格式合法性由调用方在进入写出器之前校验）
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),
}

/// 导出的一个内容块（一个章节或一页幻灯片）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSection {
    pub title: String,
    /// 当前内容，可为空（渲染为空块，不会被省略）
    pub body: String,
}

/// 导出文档：项目节点按 position 顺序展开后的中间表示
#[derive(Debug, Clone)]
pub struct ExportDocument {
    pub title: String,
    pub main_prompt: String,
    pub sections: Vec<ExportSection>,
}

/// Document Writer Port
///
/// 把一个 ExportDocument 序列化为目标格式的二进制工件
pub trait DocumentWriterPort: Send + Sync {
    /// 序列化为完整的二进制文档包
    fn render(&self, document: &ExportDocument) -> Result<Vec<u8>, ExportError>;

    /// 目标格式的文件扩展名
    fn extension(&self) -> &'static str;

    /// 目标格式的 MIME 类型
    fn content_type(&self) -> &'static str;
}
