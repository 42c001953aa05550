// ==========================================
// Phil-IRI GST 系统 - 回退构建
// ==========================================
// 职责: 模板不可用时从零构建同等版式,保证导出总能成功
// 版式: 两行居中标题 + 3x4 表头信息表 + 结果表（加粗居中表头）
// ==========================================

use crate::document::capability::{StructuralDocument, TextFormat};
use crate::domain::class::ClassMeta;
use crate::domain::roster::ResultRow;
use crate::export::populator::{meta_values, write_result_row, META_VALUE_CELLS, RESULTS_FIRST_ROW};

/// 结果表表头
pub const RESULTS_HEADERS: [&str; 5] = ["#", "NAME", "GENDER", "SCORE", "START LEVEL OF GRADE PASSAGE"];

/// 表头信息标签: (行, 列, 文本)
pub const META_LABEL_CELLS: [(usize, usize, &str); 6] = [
    (0, 0, "Teacher:"),
    (0, 2, "Grade:"),
    (1, 0, "School:"),
    (1, 2, "Section:"),
    (2, 0, "Type of Test:"),
    (2, 2, "Date:"),
];

const TITLE_SIZE_PT: u32 = 14;
const SUBTITLE_SIZE_PT: u32 = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallbackTitles<'a> {
    pub title: &'a str,
    pub subtitle: &'a str,
}

// ==========================================
// FallbackBuilder - 回退构建器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackBuilder;

impl FallbackBuilder {
    pub fn new() -> Self {
        Self
    }

    /// 在文档末尾构建完整版式
    pub fn build_from_scratch<D: StructuralDocument + ?Sized>(
        &self,
        doc: &mut D,
        meta: &ClassMeta,
        rows: &[ResultRow],
        titles: &FallbackTitles<'_>,
        test_type_label: &str,
    ) {
        doc.add_paragraph(
            titles.title,
            &TextFormat::label().centered().with_size_pt(TITLE_SIZE_PT),
        );
        doc.add_paragraph(
            titles.subtitle,
            &TextFormat::label().centered().with_size_pt(SUBTITLE_SIZE_PT),
        );

        // 表头信息表
        let meta_table = doc.add_table(3, 4, false);
        let label_format = TextFormat::label();
        for (row, col, label) in META_LABEL_CELLS {
            doc.write_cell(meta_table, row, col, label, &label_format);
        }
        let value_format = TextFormat::value();
        for ((row, col), value) in META_VALUE_CELLS.iter().zip(meta_values(meta, test_type_label)) {
            doc.write_cell(meta_table, *row, *col, &value, &value_format);
        }

        // 结果表
        let results_table = doc.add_table(1, RESULTS_HEADERS.len(), true);
        let header_format = TextFormat::label().centered();
        for (col, header) in RESULTS_HEADERS.iter().enumerate() {
            doc.write_cell(results_table, 0, col, header, &header_format);
        }
        for (offset, row) in rows.iter().enumerate() {
            doc.append_row(results_table);
            write_result_row(doc, results_table, RESULTS_FIRST_ROW + offset, offset + 1, row);
        }

        tracing::debug!(meta_table, results_table, rows = rows.len(), "回退版式构建完成");
    }
}
