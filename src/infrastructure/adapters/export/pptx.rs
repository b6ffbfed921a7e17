//! Pptx 导出适配器
//!
//! 将导出文档渲染为最小可用的 PresentationML 包：
//! 首页为标题页（文档标题 + 主题），之后每个小节一页

use crate::application::ports::{DocumentWriterPort, ExportDocument, ExportError};

use super::opc::OpcPackage;
use super::xml::escape_xml;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/></Relationships>"#;

const SLIDE_MASTER: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#;

const SLIDE_MASTER_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="../theme/theme1.xml"/></Relationships>"#;

const SLIDE_LAYOUT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#;

const SLIDE_LAYOUT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="../slideMasters/slideMaster1.xml"/></Relationships>"#;

const SLIDE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout1.xml"/></Relationships>"#;

const THEME: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office"><a:themeElements><a:clrScheme name="Office"><a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1><a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1><a:dk2><a:srgbClr val="44546A"/></a:dk2><a:lt2><a:srgbClr val="E7E6E6"/></a:lt2><a:accent1><a:srgbClr val="4472C4"/></a:accent1><a:accent2><a:srgbClr val="ED7D31"/></a:accent2><a:accent3><a:srgbClr val="A5A5A5"/></a:accent3><a:accent4><a:srgbClr val="FFC000"/></a:accent4><a:accent5><a:srgbClr val="5B9BD5"/></a:accent5><a:accent6><a:srgbClr val="70AD47"/></a:accent6><a:hlink><a:srgbClr val="0563C1"/></a:hlink><a:folHlink><a:srgbClr val="954F72"/></a:folHlink></a:clrScheme><a:fontScheme name="Office"><a:majorFont><a:latin typeface="Calibri Light"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Office"><a:fillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:fillStyleLst><a:lnStyleLst><a:ln><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln><a:ln><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln></a:lnStyleLst><a:effectStyleLst><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle><a:effectStyle><a:effectLst/></a:effectStyle></a:effectStyleLst><a:bgFillStyleLst><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#;

/// 幻灯片文档（slide-deck）写出器
pub struct PptxWriter;

impl PptxWriter {
    pub fn new() -> Self {
        Self
    }

    fn build_content_types(slide_count: usize) -> String {
        let mut overrides = String::new();
        for index in 1..=slide_count {
            overrides.push_str(&format!(
                "<Override PartName=\"/ppt/slides/slide{}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>",
                index
            ));
        }
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\"><Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/><Default Extension=\"xml\" ContentType=\"application/xml\"/><Override PartName=\"/ppt/presentation.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml\"/><Override PartName=\"/ppt/slideMasters/slideMaster1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml\"/><Override PartName=\"/ppt/slideLayouts/slideLayout1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml\"/><Override PartName=\"/ppt/theme/theme1.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.theme+xml\"/>{}</Types>",
            overrides
        )
    }

    fn build_presentation_xml(slide_count: usize) -> String {
        let mut slide_ids = String::new();
        for index in 1..=slide_count {
            // rId1 被 slideMaster 占用，幻灯片从 rId2 起
            slide_ids.push_str(&format!(
                "<p:sldId id=\"{}\" r:id=\"rId{}\"/>",
                255 + index,
                index + 1
            ));
        }
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<p:presentation xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"><p:sldMasterIdLst><p:sldMasterId id=\"2147483648\" r:id=\"rId1\"/></p:sldMasterIdLst><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx=\"12192000\" cy=\"6858000\"/><p:notesSz cx=\"6858000\" cy=\"9144000\"/></p:presentation>",
            slide_ids
        )
    }

    fn build_presentation_rels(slide_count: usize) -> String {
        let mut rels = String::from(
            "<Relationship Id=\"rId1\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster\" Target=\"slideMasters/slideMaster1.xml\"/>",
        );
        for index in 1..=slide_count {
            rels.push_str(&format!(
                "<Relationship Id=\"rId{}\" Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide\" Target=\"slides/slide{}.xml\"/>",
                index + 1,
                index
            ));
        }
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">{}</Relationships>",
            rels
        )
    }

    fn text_shape(shape_id: u32, placeholder: &str, idx_attr: &str, lines: &[String]) -> String {
        let mut paragraphs = String::new();
        if lines.is_empty() {
            // 空内容保留一个空段落占位
            paragraphs.push_str("<a:p><a:endParaRPr/></a:p>");
        }
        for line in lines {
            paragraphs.push_str(&format!(
                "<a:p><a:r><a:t>{}</a:t></a:r></a:p>",
                escape_xml(line)
            ));
        }
        format!(
            "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"Text {id}\"/><p:cNvSpPr><a:spLocks noGrp=\"1\"/></p:cNvSpPr><p:nvPr><p:ph type=\"{ph}\"{idx}/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>",
            id = shape_id,
            ph = placeholder,
            idx = idx_attr,
            paragraphs = paragraphs,
        )
    }

    fn build_slide_xml(title: &str, body_lines: &[String]) -> String {
        let title_shape = Self::text_shape(2, "title", "", &[title.to_string()]);
        let body_shape = Self::text_shape(3, "body", " idx=\"1\"", body_lines);
        format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<p:sld xmlns:a=\"http://schemas.openxmlformats.org/drawingml/2006/main\" xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\" xmlns:p=\"http://schemas.openxmlformats.org/presentationml/2006/main\"><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id=\"1\" name=\"\"/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>{}{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>",
            title_shape, body_shape
        )
    }

    fn body_lines(body: &str) -> Vec<String> {
        body.lines()
            .map(|line| {
                if let Some(rest) = line.strip_prefix("- ").or_else(|| line.strip_prefix("* ")) {
                    format!("\u{2022} {}", rest)
                } else {
                    line.to_string()
                }
            })
            .collect()
    }
}

impl Default for PptxWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentWriterPort for PptxWriter {
    fn render(&self, document: &ExportDocument) -> Result<Vec<u8>, ExportError> {
        // 首页：标题 + 主题，之后每个小节一页
        let mut slides: Vec<(String, Vec<String>)> = Vec::with_capacity(document.sections.len() + 1);
        let mut title_body = Vec::new();
        if !document.main_prompt.is_empty() {
            title_body.push(document.main_prompt.clone());
        }
        slides.push((document.title.clone(), title_body));
        for section in &document.sections {
            slides.push((section.title.clone(), Self::body_lines(&section.body)));
        }

        let mut package = OpcPackage::new();
        package.add_part("[Content_Types].xml", &Self::build_content_types(slides.len()))?;
        package.add_part("_rels/.rels", ROOT_RELS)?;
        package.add_part("ppt/presentation.xml", &Self::build_presentation_xml(slides.len()))?;
        package.add_part(
            "ppt/_rels/presentation.xml.rels",
            &Self::build_presentation_rels(slides.len()),
        )?;
        package.add_part("ppt/slideMasters/slideMaster1.xml", SLIDE_MASTER)?;
        package.add_part("ppt/slideMasters/_rels/slideMaster1.xml.rels", SLIDE_MASTER_RELS)?;
        package.add_part("ppt/slideLayouts/slideLayout1.xml", SLIDE_LAYOUT)?;
        package.add_part("ppt/slideLayouts/_rels/slideLayout1.xml.rels", SLIDE_LAYOUT_RELS)?;
        package.add_part("ppt/theme/theme1.xml", THEME)?;
        for (index, (title, body_lines)) in slides.iter().enumerate() {
            let slide_number = index + 1;
            package.add_part(
                &format!("ppt/slides/slide{}.xml", slide_number),
                &Self::build_slide_xml(title, body_lines),
            )?;
            package.add_part(
                &format!("ppt/slides/_rels/slide{}.xml.rels", slide_number),
                SLIDE_RELS,
            )?;
        }
        package.finish()
    }

    fn extension(&self) -> &'static str {
        "pptx"
    }

    fn content_type(&self) -> &'static str {
        "application/vnd.openxmlformats-officedocument.presentationml.presentation"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::ExportSection;
    use std::io::{Cursor, Read};

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        content
    }

    fn sample_document() -> ExportDocument {
        ExportDocument {
            title: "产品发布会".to_string(),
            main_prompt: "新版本亮点".to_string(),
            sections: vec![
                ExportSection {
                    title: "路线图".to_string(),
                    body: "- 一季度上线\n- 二季度迭代".to_string(),
                },
                ExportSection {
                    title: "空页".to_string(),
                    body: String::new(),
                },
            ],
        }
    }

    #[test]
    fn test_render_one_slide_per_section_plus_title() {
        let bytes = PptxWriter::new().render(&sample_document()).unwrap();

        let presentation = read_part(&bytes, "ppt/presentation.xml");
        assert_eq!(presentation.matches("<p:sldId ").count(), 3);

        let title_slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(title_slide.contains("产品发布会"));
        assert!(title_slide.contains("新版本亮点"));

        let section_slide = read_part(&bytes, "ppt/slides/slide2.xml");
        assert!(section_slide.contains("路线图"));
        assert!(section_slide.contains("\u{2022} 一季度上线"));

        // 空内容的小节页仍保留空段落
        let empty_slide = read_part(&bytes, "ppt/slides/slide3.xml");
        assert!(empty_slide.contains("空页"));
        assert!(empty_slide.contains("<a:endParaRPr/>"));
    }

    #[test]
    fn test_content_types_cover_all_slides() {
        let bytes = PptxWriter::new().render(&sample_document()).unwrap();
        let content_types = read_part(&bytes, "[Content_Types].xml");
        assert!(content_types.contains("/ppt/slides/slide1.xml"));
        assert!(content_types.contains("/ppt/slides/slide3.xml"));
    }
}
