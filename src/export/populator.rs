// ==========================================
// Phil-IRI GST 系统 - 模板填充
// ==========================================
// 职责: 向已定位的模板表格写入取值
// 红线:
// - 只改写取值单元格; 标签单元格（第 0/2 列）原样保留
// - 取值默认大写; 结果表的序号与分数列原样写入
// - 结果表行数不足时追加,多余行清空（保留边框/结构）而不删除
// ==========================================

use crate::document::capability::{StructuralDocument, TextFormat};
use crate::domain::class::ClassMeta;
use crate::domain::roster::ResultRow;
use crate::export::locator::RegionScan;

/// 结果表数据起始行（第 0 行为表头）
pub const RESULTS_FIRST_ROW: usize = 1;

/// 表头信息表取值位置: (行, 列)
pub const META_VALUE_CELLS: [(usize, usize); 6] = [(0, 1), (0, 3), (1, 1), (1, 3), (2, 1), (2, 3)];

/// 表头信息取值（与 META_VALUE_CELLS 一一对应,已大写）
pub fn meta_values(meta: &ClassMeta, test_type_label: &str) -> [String; 6] {
    [
        meta.teacher.to_uppercase(),
        meta.grade.to_string(),
        meta.school.to_uppercase(),
        meta.section.to_uppercase(),
        test_type_label.to_uppercase(),
        meta.date_text.to_uppercase(),
    ]
}

/// 写入一行结果: 序号 / 姓名 / 性别 / 分数 / 起始点
///
/// 返回实际写入的单元格数; 单元格缺失时跳过（尽力写入）
pub fn write_result_row<D: StructuralDocument + ?Sized>(
    doc: &mut D,
    table: usize,
    row_index: usize,
    ordinal: usize,
    row: &ResultRow,
) -> usize {
    let centered = TextFormat::default().centered();
    let cells = [
        (ordinal.to_string(), centered),
        (row.name.to_uppercase(), TextFormat::default()),
        (row.gender.to_uppercase(), centered),
        (row.score.to_string(), centered),
        (row.start.to_uppercase(), centered),
    ];

    let mut written = 0;
    for (col, (text, format)) in cells.iter().enumerate() {
        if doc.write_cell(table, row_index, col, text, format) {
            written += 1;
        } else {
            tracing::debug!(table, row = row_index, col, "结果表单元格缺失,跳过");
        }
    }
    written
}

// ==========================================
// TemplatePopulator - 模板填充器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplatePopulator;

impl TemplatePopulator {
    pub fn new() -> Self {
        Self
    }

    /// 填充模板
    ///
    /// 仅当两个表格都缺失时返回 false; 部分不匹配时尽力写入并返回 true
    pub fn populate<D: StructuralDocument + ?Sized>(
        &self,
        doc: &mut D,
        scan: &RegionScan,
        meta: &ClassMeta,
        rows: &[ResultRow],
        test_type_label: &str,
    ) -> bool {
        if scan.meta_table.is_none() && scan.results_table.is_none() {
            return false;
        }

        if let Some(table) = scan.meta_table {
            self.fill_meta(doc, table, meta, test_type_label);
        }
        if let Some(table) = scan.results_table {
            self.fill_results(doc, table, rows);
        }
        true
    }

    /// 写入 6 个表头取值（下划线,不加粗）
    fn fill_meta<D: StructuralDocument + ?Sized>(
        &self,
        doc: &mut D,
        table: usize,
        meta: &ClassMeta,
        test_type_label: &str,
    ) {
        let value_format = TextFormat::value();
        for ((row, col), value) in META_VALUE_CELLS.iter().zip(meta_values(meta, test_type_label)) {
            if !doc.write_cell(table, *row, *col, &value, &value_format) {
                tracing::debug!(table, row, col, "表头取值单元格缺失,跳过");
            }
        }
    }

    /// 写入结果行,补齐/清空多余行,表头紧凑化
    fn fill_results<D: StructuralDocument + ?Sized>(&self, doc: &mut D, table: usize, rows: &[ResultRow]) {
        let needed = RESULTS_FIRST_ROW + rows.len().max(1);
        let existing = doc.row_count(table).unwrap_or(0);
        for _ in existing..needed {
            if !doc.append_row(table) {
                break;
            }
        }

        for (offset, row) in rows.iter().enumerate() {
            write_result_row(doc, table, RESULTS_FIRST_ROW + offset, offset + 1, row);
        }

        let columns = doc.column_count(table).unwrap_or(0);
        let total_rows = doc.row_count(table).unwrap_or(0);
        let blank = TextFormat::default();
        for row_index in (RESULTS_FIRST_ROW + rows.len())..total_rows {
            for col in 0..columns {
                doc.write_cell(table, row_index, col, "", &blank);
            }
        }

        for col in 0..columns {
            doc.tighten_cell(table, 0, col);
        }

        tracing::debug!(table, rows = rows.len(), total_rows, "结果表填充完成");
    }
}
