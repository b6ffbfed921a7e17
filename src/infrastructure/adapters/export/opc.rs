//! OPC 容器封装
//!
//! OOXML 文档本质是一个固定结构的 Zip 容器（Open Packaging Conventions），
//! 这里封装 part 写入与 finish，统一错误映射

use std::io::{Cursor, Write};

use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::application::ports::ExportError;

/// OPC 包构建器，所有 part 写入内存后一次性产出字节
pub struct OpcPackage {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
}

impl OpcPackage {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
        }
    }

    /// 写入一个 XML part，路径使用包内相对路径（不以 / 开头）
    pub fn add_part(&mut self, path: &str, content: &str) -> Result<(), ExportError> {
        self.writer
            .start_file(path, self.options.clone())
            .map_err(|e| ExportError::SerializationFailed(format!("start part {}: {}", path, e)))?;
        self.writer
            .write_all(content.as_bytes())
            .map_err(|e| ExportError::SerializationFailed(format!("write part {}: {}", path, e)))?;
        Ok(())
    }

    /// 关闭容器并取出完整字节，失败时不产出任何部分结果
    pub fn finish(self) -> Result<Vec<u8>, ExportError> {
        let cursor = self
            .writer
            .finish()
            .map_err(|e| ExportError::SerializationFailed(format!("finish package: {}", e)))?;
        Ok(cursor.into_inner())
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[test]
    fn test_package_roundtrip() {
        let mut pkg = OpcPackage::new();
        pkg.add_part("word/document.xml", "<w:document/>").unwrap();
        let bytes = pkg.finish().unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name("word/document.xml").unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        assert_eq!(content, "<w:document/>");
    }
}
