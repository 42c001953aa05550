// ==========================================
// Phil-IRI GST 系统 - OOXML 文字处理文档
// ==========================================
// 职责: .docx 包 → 可变文档树 → .docx 字节
// 约束:
// - 只改写 word/document.xml 与 word/styles.xml,其他部件原样保留
// - 表格序号只计 body 直属表格（文档顺序）
// ==========================================

pub mod package;
pub mod wordml;
pub mod xml;

use crate::document::capability::{DocumentDefaults, StructuralDocument, TextFormat};
use crate::document::error::{DocumentError, DocumentResult};
use package::DocxPackage;
use std::path::Path;
use xml::XmlElement;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";

const WORDML_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

const BLANK_CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const BLANK_PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const BLANK_DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

// ==========================================
// DocxDocument - .docx 结构化文档
// ==========================================
#[derive(Debug, Clone)]
pub struct DocxDocument {
    package: DocxPackage,
    document: XmlElement,
    styles: Option<XmlElement>,
}

impl DocxDocument {
    /// 打开 .docx 文件
    pub fn open(path: &Path) -> DocumentResult<Self> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// 从 .docx 字节读取
    pub fn from_bytes(bytes: &[u8]) -> DocumentResult<Self> {
        let package = DocxPackage::from_bytes(bytes)?;

        let document_xml = package
            .part_text(DOCUMENT_PART)?
            .ok_or_else(|| DocumentError::MissingPart(DOCUMENT_PART.to_string()))?;
        let document = xml::parse(DOCUMENT_PART, &document_xml)?;
        if document.child("body").is_none() {
            return Err(DocumentError::MissingPart(format!("{} (w:body)", DOCUMENT_PART)));
        }

        let styles = match package.part_text(STYLES_PART)? {
            Some(styles_xml) => Some(xml::parse(STYLES_PART, &styles_xml)?),
            None => None,
        };

        Ok(Self {
            package,
            document,
            styles,
        })
    }

    /// 最小空白文档（Letter 纵向,含 Normal 样式）
    pub fn blank() -> Self {
        let mut package = DocxPackage::new();
        package.set_part("[Content_Types].xml", BLANK_CONTENT_TYPES.as_bytes().to_vec());
        package.set_part("_rels/.rels", BLANK_PACKAGE_RELS.as_bytes().to_vec());
        package.set_part("word/_rels/document.xml.rels", BLANK_DOCUMENT_RELS.as_bytes().to_vec());

        let section = XmlElement::new("w:sectPr")
            .with_child(
                XmlElement::new("w:pgSz")
                    .with_attr("w:w", "12240")
                    .with_attr("w:h", "15840"),
            )
            .with_child(
                XmlElement::new("w:pgMar")
                    .with_attr("w:top", "1440")
                    .with_attr("w:right", "1440")
                    .with_attr("w:bottom", "1440")
                    .with_attr("w:left", "1440")
                    .with_attr("w:header", "720")
                    .with_attr("w:footer", "720")
                    .with_attr("w:gutter", "0"),
            );
        let document = XmlElement::new("w:document")
            .with_attr("xmlns:w", WORDML_NS)
            .with_child(XmlElement::new("w:body").with_child(section));

        let styles = XmlElement::new("w:styles")
            .with_attr("xmlns:w", WORDML_NS)
            .with_child(
                XmlElement::new("w:style")
                    .with_attr("w:type", "paragraph")
                    .with_attr("w:default", "1")
                    .with_attr("w:styleId", "Normal")
                    .with_child(XmlElement::new("w:name").with_attr("w:val", "Normal"))
                    .with_child(XmlElement::new("w:qFormat")),
            );

        Self {
            package,
            document,
            styles: Some(styles),
        }
    }

    /// 序列化为 .docx 字节
    pub fn to_bytes(&self) -> DocumentResult<Vec<u8>> {
        let mut package = self.package.clone();
        package.set_part(DOCUMENT_PART, xml::to_bytes(&self.document)?);
        if let Some(styles) = &self.styles {
            package.set_part(STYLES_PART, xml::to_bytes(styles)?);
        }
        package.to_bytes()
    }

    /// body 直属段落文本
    pub fn paragraph_texts(&self) -> Vec<String> {
        self.body()
            .map(|body| body.children_named("p").map(wordml::paragraph_text).collect())
            .unwrap_or_default()
    }

    /// 单元格原始 XML（用于比较单元格是否被改动）
    pub fn cell_markup(&self, table: usize, row: usize, col: usize) -> Option<String> {
        xml::element_to_string(self.cell(table, row, col)?).ok()
    }

    // ===== 内部寻址 =====

    fn body(&self) -> Option<&XmlElement> {
        self.document.child("body")
    }

    fn body_mut(&mut self) -> Option<&mut XmlElement> {
        self.document.child_mut("body")
    }

    fn table(&self, index: usize) -> Option<&XmlElement> {
        self.body()?.children_named("tbl").nth(index)
    }

    fn table_mut(&mut self, index: usize) -> Option<&mut XmlElement> {
        self.body_mut()?.children_named_mut("tbl").nth(index)
    }

    fn row(&self, table: usize, row: usize) -> Option<&XmlElement> {
        self.table(table)?.children_named("tr").nth(row)
    }

    fn cell(&self, table: usize, row: usize, col: usize) -> Option<&XmlElement> {
        let row = self.row(table, row)?;
        let index = wordml::grid_cell_index(row, col)?;
        row.children_named("tc").nth(index)
    }

    fn cell_mut(&mut self, table: usize, row: usize, col: usize) -> Option<&mut XmlElement> {
        let row = self.table_mut(table)?.children_named_mut("tr").nth(row)?;
        let index = wordml::grid_cell_index(row, col)?;
        row.children_named_mut("tc").nth(index)
    }

    fn push_block(&mut self, block: XmlElement) {
        match self.body_mut() {
            Some(body) => wordml::insert_block(body, block),
            None => tracing::warn!("文档缺少 w:body,忽略新增内容"),
        }
    }
}

impl StructuralDocument for DocxDocument {
    fn table_count(&self) -> usize {
        self.body()
            .map(|body| body.children_named("tbl").count())
            .unwrap_or(0)
    }

    fn row_count(&self, table: usize) -> Option<usize> {
        Some(self.table(table)?.children_named("tr").count())
    }

    fn column_count(&self, table: usize) -> Option<usize> {
        Some(wordml::column_count(self.table(table)?))
    }

    fn row_cell_count(&self, table: usize, row: usize) -> Option<usize> {
        Some(self.row(table, row)?.children_named("tc").count())
    }

    fn cell_text(&self, table: usize, row: usize, col: usize) -> Option<String> {
        Some(wordml::cell_text(self.cell(table, row, col)?))
    }

    fn row_texts(&self, table: usize, row: usize) -> Option<Vec<String>> {
        Some(
            self.row(table, row)?
                .children_named("tc")
                .map(wordml::cell_text)
                .collect(),
        )
    }

    fn cell_format(&self, table: usize, row: usize, col: usize) -> Option<TextFormat> {
        Some(wordml::cell_format(self.cell(table, row, col)?))
    }

    fn write_cell(&mut self, table: usize, row: usize, col: usize, text: &str, format: &TextFormat) -> bool {
        match self.cell_mut(table, row, col) {
            Some(cell) => {
                wordml::write_cell(cell, text, format);
                true
            }
            None => false,
        }
    }

    fn tighten_cell(&mut self, table: usize, row: usize, col: usize) -> bool {
        match self.cell_mut(table, row, col) {
            Some(cell) => {
                wordml::tighten_cell(cell);
                true
            }
            None => false,
        }
    }

    fn append_row(&mut self, table: usize) -> bool {
        match self.table_mut(table) {
            Some(table) => {
                wordml::append_row(table);
                true
            }
            None => false,
        }
    }

    fn add_paragraph(&mut self, text: &str, format: &TextFormat) {
        self.push_block(wordml::build_paragraph(text, None, None, format));
    }

    fn add_table(&mut self, rows: usize, cols: usize, bordered: bool) -> usize {
        self.push_block(wordml::build_table(rows, cols, bordered));
        self.table_count().saturating_sub(1)
    }

    fn apply_defaults(&mut self, defaults: &DocumentDefaults) {
        let applied = self
            .styles
            .as_mut()
            .is_some_and(|styles| wordml::apply_style_defaults(styles, defaults));
        if !applied {
            tracing::debug!("样式部件缺少 Normal 样式,跳过文档缺省样式");
        }
    }
}
