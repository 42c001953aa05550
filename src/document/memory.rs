// ==========================================
// Phil-IRI GST 系统 - 内存结构化文档
// ==========================================
// 职责: StructuralDocument 的纯内存实现
// 用途: 引擎级测试、预览,以及不依赖文档编解码的嵌入场景
// ==========================================

use crate::document::capability::{DocumentDefaults, StructuralDocument, TextFormat};

// ==========================================
// 内存文档节点
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryParagraph {
    pub text: String,
    pub format: TextFormat,
    pub tight: bool,
}

impl MemoryParagraph {
    pub fn new(text: impl Into<String>, format: TextFormat) -> Self {
        Self {
            text: text.into(),
            format,
            tight: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryCell {
    pub paragraphs: Vec<MemoryParagraph>,
    pub span: usize, // 网格跨列数
}

impl MemoryCell {
    pub fn new(text: &str) -> Self {
        Self::with_format(text, TextFormat::default())
    }

    pub fn with_format(text: &str, format: TextFormat) -> Self {
        Self {
            paragraphs: vec![MemoryParagraph::new(text, format)],
            span: 1,
        }
    }

    pub fn spanning(text: &str, span: usize) -> Self {
        Self {
            span: span.max(1),
            ..Self::new(text)
        }
    }

    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemoryTable {
    pub rows: Vec<Vec<MemoryCell>>,
    pub columns: usize,
    pub bordered: bool,
}

impl MemoryTable {
    /// 由文本网格构建表格（列数取最宽行）
    pub fn from_texts(rows: &[&[&str]]) -> Self {
        let columns = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        Self {
            rows: rows
                .iter()
                .map(|r| r.iter().map(|text| MemoryCell::new(text)).collect())
                .collect(),
            columns,
            bordered: false,
        }
    }

    /// 网格列 → 物理单元格下标
    fn cell_index(&self, row: usize, col: usize) -> Option<usize> {
        let cells = self.rows.get(row)?;
        let mut start = 0;
        for (index, cell) in cells.iter().enumerate() {
            let end = start + cell.span.max(1);
            if col < end {
                return Some(index);
            }
            start = end;
        }
        None
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&MemoryCell> {
        let index = self.cell_index(row, col)?;
        self.rows.get(row)?.get(index)
    }

    fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut MemoryCell> {
        let index = self.cell_index(row, col)?;
        self.rows.get_mut(row)?.get_mut(index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MemoryBlock {
    Paragraph(MemoryParagraph),
    Table(MemoryTable),
}

// ==========================================
// MemoryDocument - 内存文档
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDocument {
    pub blocks: Vec<MemoryBlock>,
    pub defaults: Option<DocumentDefaults>,
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加表格（链式构建）
    pub fn with_table(mut self, table: MemoryTable) -> Self {
        self.blocks.push(MemoryBlock::Table(table));
        self
    }

    /// 追加段落（链式构建）
    pub fn with_paragraph(mut self, text: &str) -> Self {
        self.blocks
            .push(MemoryBlock::Paragraph(MemoryParagraph::new(text, TextFormat::default())));
        self
    }

    /// 按文档顺序取第 index 个表格
    pub fn table(&self, index: usize) -> Option<&MemoryTable> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                MemoryBlock::Table(table) => Some(table),
                MemoryBlock::Paragraph(_) => None,
            })
            .nth(index)
    }

    fn table_mut(&mut self, index: usize) -> Option<&mut MemoryTable> {
        self.blocks
            .iter_mut()
            .filter_map(|block| match block {
                MemoryBlock::Table(table) => Some(table),
                MemoryBlock::Paragraph(_) => None,
            })
            .nth(index)
    }

    /// 正文段落（不含表格内段落）
    pub fn paragraphs(&self) -> Vec<&MemoryParagraph> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                MemoryBlock::Paragraph(p) => Some(p),
                MemoryBlock::Table(_) => None,
            })
            .collect()
    }
}

impl StructuralDocument for MemoryDocument {
    fn table_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|block| matches!(block, MemoryBlock::Table(_)))
            .count()
    }

    fn row_count(&self, table: usize) -> Option<usize> {
        Some(self.table(table)?.rows.len())
    }

    fn column_count(&self, table: usize) -> Option<usize> {
        Some(self.table(table)?.columns)
    }

    fn row_cell_count(&self, table: usize, row: usize) -> Option<usize> {
        Some(self.table(table)?.rows.get(row)?.len())
    }

    fn cell_text(&self, table: usize, row: usize, col: usize) -> Option<String> {
        Some(self.table(table)?.cell(row, col)?.text())
    }

    fn row_texts(&self, table: usize, row: usize) -> Option<Vec<String>> {
        Some(self.table(table)?.rows.get(row)?.iter().map(MemoryCell::text).collect())
    }

    fn cell_format(&self, table: usize, row: usize, col: usize) -> Option<TextFormat> {
        let cell = self.table(table)?.cell(row, col)?;
        cell.paragraphs.first().map(|p| p.format)
    }

    fn write_cell(&mut self, table: usize, row: usize, col: usize, text: &str, format: &TextFormat) -> bool {
        let Some(cell) = self.table_mut(table).and_then(|t| t.cell_mut(row, col)) else {
            return false;
        };
        cell.paragraphs = vec![MemoryParagraph {
            text: text.to_string(),
            format: *format,
            tight: true,
        }];
        true
    }

    fn tighten_cell(&mut self, table: usize, row: usize, col: usize) -> bool {
        let Some(cell) = self.table_mut(table).and_then(|t| t.cell_mut(row, col)) else {
            return false;
        };
        for paragraph in &mut cell.paragraphs {
            paragraph.tight = true;
        }
        true
    }

    fn append_row(&mut self, table: usize) -> bool {
        let Some(target) = self.table_mut(table) else {
            return false;
        };
        let new_row = match target.rows.last() {
            Some(last) => last
                .iter()
                .map(|cell| MemoryCell {
                    paragraphs: vec![MemoryParagraph::new("", TextFormat::default())],
                    span: cell.span,
                })
                .collect(),
            None => (0..target.columns).map(|_| MemoryCell::new("")).collect(),
        };
        target.rows.push(new_row);
        true
    }

    fn add_paragraph(&mut self, text: &str, format: &TextFormat) {
        self.blocks.push(MemoryBlock::Paragraph(MemoryParagraph {
            text: text.to_string(),
            format: *format,
            tight: true,
        }));
    }

    fn add_table(&mut self, rows: usize, cols: usize, bordered: bool) -> usize {
        let table = MemoryTable {
            rows: (0..rows)
                .map(|_| (0..cols).map(|_| MemoryCell::new("")).collect())
                .collect(),
            columns: cols,
            bordered,
        };
        self.blocks.push(MemoryBlock::Table(table));
        self.table_count() - 1
    }

    fn apply_defaults(&mut self, defaults: &DocumentDefaults) {
        self.defaults = Some(defaults.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_addressing_with_spans() {
        let table = MemoryTable {
            rows: vec![vec![MemoryCell::spanning("wide", 2), MemoryCell::new("c")]],
            columns: 3,
            bordered: false,
        };
        let doc = MemoryDocument::new().with_table(table);
        assert_eq!(doc.cell_text(0, 0, 0).as_deref(), Some("wide"));
        assert_eq!(doc.cell_text(0, 0, 1).as_deref(), Some("wide"));
        assert_eq!(doc.cell_text(0, 0, 2).as_deref(), Some("c"));
        assert_eq!(doc.cell_text(0, 0, 3), None);
        assert_eq!(doc.row_cell_count(0, 0), Some(2));
    }

    #[test]
    fn test_probes_on_missing_structures() {
        let doc = MemoryDocument::new().with_paragraph("only text");
        assert_eq!(doc.table_count(), 0);
        assert_eq!(doc.row_count(0), None);
        assert_eq!(doc.cell_text(3, 0, 0), None);
    }

    #[test]
    fn test_write_and_append() {
        let mut doc = MemoryDocument::new().with_table(MemoryTable::from_texts(&[&["a", "b"]]));
        assert!(doc.write_cell(0, 0, 1, "X", &TextFormat::value()));
        assert!(!doc.write_cell(0, 5, 0, "X", &TextFormat::value()));
        assert!(doc.append_row(0));
        assert_eq!(doc.row_count(0), Some(2));
        assert_eq!(doc.cell_text(0, 1, 0).as_deref(), Some(""));
        assert_eq!(doc.cell_format(0, 0, 1), Some(TextFormat::value()));
    }
}
