//! Export Adapters - OOXML 文档写出器

mod docx;
mod opc;
mod pptx;
mod xml;

pub use docx::DocxWriter;
pub use pptx::PptxWriter;
