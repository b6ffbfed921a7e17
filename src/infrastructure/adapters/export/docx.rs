//! Docx 导出适配器
//!
//! 将导出文档渲染为最小可用的 WordprocessingML 包：
//! 文档标题 + 每节标题 + 正文段落，"- " / "* " 开头的行渲染为项目符号段落

use crate::application::ports::{DocumentWriterPort, ExportDocument, ExportError};

use super::opc::OpcPackage;
use super::xml::escape_xml;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

/// 顺排文档（flow-document）写出器
pub struct DocxWriter;

impl DocxWriter {
    pub fn new() -> Self {
        Self
    }

    fn heading_paragraph(text: &str, half_point_size: u32) -> String {
        format!(
            "<w:p><w:pPr><w:rPr><w:b/><w:sz w:val=\"{size}\"/></w:rPr></w:pPr><w:r><w:rPr><w:b/><w:sz w:val=\"{size}\"/></w:rPr><w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>",
            size = half_point_size,
            text = escape_xml(text),
        )
    }

    fn body_paragraph(line: &str) -> String {
        // "- " 或 "* " 开头的行按项目符号段落渲染
        let text = if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
            format!("\u{2022} {}", rest)
        } else {
            line.to_string()
        };
        format!(
            "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
            escape_xml(&text)
        )
    }

    fn build_document_xml(document: &ExportDocument) -> String {
        let mut body = String::new();
        body.push_str(&Self::heading_paragraph(&document.title, 40));
        // 主题描述非空时紧跟标题输出一个 Topic 段落
        if !document.main_prompt.is_empty() {
            body.push_str(&Self::body_paragraph(&format!(
                "Topic: {}",
                document.main_prompt
            )));
        }
        for section in &document.sections {
            body.push_str(&Self::heading_paragraph(&section.title, 28));
            if section.body.is_empty() {
                // 空内容的小节仍保留一个空段落占位
                body.push_str("<w:p/>");
            } else {
                for line in section.body.lines() {
                    body.push_str(&Self::body_paragraph(line));
                }
            }
        }
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\"><w:body>{}<w:sectPr/></w:body></w:document>",
            body
        )
    }
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentWriterPort for DocxWriter {
    fn render(&self, document: &ExportDocument) -> Result<Vec<u8>, ExportError> {
        let mut package = OpcPackage::new();
        package.add_part("[Content_Types].xml", CONTENT_TYPES)?;
        package.add_part("_rels/.rels", ROOT_RELS)?;
        package.add_part("word/document.xml", &Self::build_document_xml(document))?;
        package.finish()
    }

    fn extension(&self) -> &'static str {
        "docx"
    }

    fn content_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ExportSection;
    use std::io::{Cursor, Read};

    fn read_part(bytes: Vec<u8>, name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        content
    }

    #[test]
    fn test_render_contains_headings_and_bullets() {
        let document = ExportDocument {
            title: "季度报告".to_string(),
            main_prompt: "Q3 业务回顾".to_string(),
            sections: vec![
                ExportSection {
                    title: "概述".to_string(),
                    body: "整体向好\n- 收入增长\n* 成本下降".to_string(),
                },
                ExportSection {
                    title: "待补充".to_string(),
                    body: String::new(),
                },
            ],
        };

        let bytes = DocxWriter::new().render(&document).unwrap();
        let xml = read_part(bytes, "word/document.xml");

        assert!(xml.contains("季度报告"));
        assert!(xml.contains("Topic: Q3 业务回顾"));
        assert!(xml.contains("概述"));
        assert!(xml.contains("\u{2022} 收入增长"));
        assert!(xml.contains("\u{2022} 成本下降"));
        // 空小节保留空段落
        assert!(xml.contains("待补充"));
        assert!(xml.contains("<w:p/>"));
    }

    #[test]
    fn test_render_escapes_user_text() {
        let document = ExportDocument {
            title: "A & B <Plan>".to_string(),
            main_prompt: String::new(),
            sections: vec![ExportSection {
                title: "S".to_string(),
                body: "x < y".to_string(),
            }],
        };

        let bytes = DocxWriter::new().render(&document).unwrap();
        let xml = read_part(bytes, "word/document.xml");
        assert!(xml.contains("A &amp; B &lt;Plan&gt;"));
        assert!(xml.contains("x &lt; y"));
        // 空主题不输出 Topic 段落
        assert!(!xml.contains("Topic:"));
    }
}
