// ==========================================
// Phil-IRI GST 系统 - 模板区域定位
// ==========================================
// 职责: 在模板文档中找到表头信息表与结果表
// 规则:
// - 表头信息表: >=3 行, >=4 列, (0,0) 以教师标签开头, (0,2) 以年级标签开头
// - 结果表: 首行文本（大写）同时含姓名/性别/分数标记
// - 文档顺序扫描,各自首个命中生效,两者都找到即停止
// 红线: 结构探测绝不报错; 畸形表格按"不匹配"处理
// ==========================================

use crate::document::capability::StructuralDocument;

/// (教师标签, 年级标签) 前缀组合（英语 / 菲律宾语）
pub const META_LABEL_SETS: [(&str, &str); 2] = [("teacher", "grade"), ("guro", "antas")];

pub const NAME_MARKERS: [&str; 2] = ["NAME", "PANGALAN"];
pub const GENDER_MARKERS: [&str; 2] = ["GENDER", "KASARIAN"];
pub const SCORE_MARKERS: [&str; 2] = ["SCORE", "MARKA"];

// ==========================================
// RegionScan - 扫描结果
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionScan {
    pub meta_table: Option<usize>,
    pub results_table: Option<usize>,
}

impl RegionScan {
    pub fn is_complete(&self) -> bool {
        self.meta_table.is_some() && self.results_table.is_some()
    }

    /// 两个区域都找到时返回定位结果
    pub fn regions(&self) -> Option<TemplateRegions> {
        Some(TemplateRegions {
            meta_table: self.meta_table?,
            results_table: self.results_table?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemplateRegions {
    pub meta_table: usize,
    pub results_table: usize,
}

// ==========================================
// TemplateLocator - 模板区域定位器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateLocator;

impl TemplateLocator {
    pub fn new() -> Self {
        Self
    }

    /// 扫描全部表格
    pub fn scan<D: StructuralDocument + ?Sized>(&self, doc: &D) -> RegionScan {
        let mut scan = RegionScan::default();

        for table in 0..doc.table_count() {
            if scan.meta_table.is_none() && Self::is_meta_table(doc, table) {
                scan.meta_table = Some(table);
            } else if scan.results_table.is_none() && Self::is_results_table(doc, table) {
                scan.results_table = Some(table);
            }
            if scan.is_complete() {
                break;
            }
        }

        tracing::debug!(
            tables = doc.table_count(),
            meta_table = ?scan.meta_table,
            results_table = ?scan.results_table,
            "模板区域扫描完成"
        );
        scan
    }

    /// 定位两个区域; 任一缺失返回 None（正常结果,触发回退构建）
    pub fn find_regions<D: StructuralDocument + ?Sized>(&self, doc: &D) -> Option<TemplateRegions> {
        self.scan(doc).regions()
    }

    /// 表头信息表判定
    pub fn is_meta_table<D: StructuralDocument + ?Sized>(doc: &D, table: usize) -> bool {
        let shape_ok = doc.row_count(table).is_some_and(|rows| rows >= 3)
            && doc.column_count(table).is_some_and(|cols| cols >= 4);
        if !shape_ok {
            return false;
        }

        let (Some(left), Some(right)) = (doc.cell_text(table, 0, 0), doc.cell_text(table, 0, 2)) else {
            return false;
        };
        let left = normalize(&left);
        let right = normalize(&right);

        META_LABEL_SETS
            .iter()
            .any(|(teacher, grade)| left.starts_with(teacher) && right.starts_with(grade))
    }

    /// 结果表判定
    pub fn is_results_table<D: StructuralDocument + ?Sized>(doc: &D, table: usize) -> bool {
        let Some(header) = doc.row_texts(table, 0) else {
            return false;
        };
        let header = header
            .iter()
            .map(|text| text.trim().to_uppercase())
            .collect::<Vec<_>>()
            .join(" ");

        let has = |markers: &[&str]| markers.iter().any(|marker| header.contains(marker));
        has(&NAME_MARKERS) && has(&GENDER_MARKERS) && has(&SCORE_MARKERS)
    }
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::memory::{MemoryDocument, MemoryTable};

    fn meta(left: &str, right: &str) -> MemoryTable {
        MemoryTable::from_texts(&[
            &[left, "", right, ""],
            &["School:", "", "Section:", ""],
            &["Type of Test:", "", "Date:", ""],
        ])
    }

    fn results(header: &[&str]) -> MemoryTable {
        MemoryTable::from_texts(&[header])
    }

    #[test]
    fn test_finds_english_regions() {
        let doc = MemoryDocument::new()
            .with_table(meta("Teacher:", "Grade:"))
            .with_table(results(&["#", "Name", "Gender", "Score", "Start"]));
        assert_eq!(
            TemplateLocator::new().find_regions(&doc),
            Some(TemplateRegions {
                meta_table: 0,
                results_table: 1
            })
        );
    }

    #[test]
    fn test_finds_filipino_regions_case_insensitive() {
        let doc = MemoryDocument::new()
            .with_table(results(&["BLG", "pangalan", "kasarian", "marka"]))
            .with_table(meta("  GURO:", "Antas:"));
        let scan = TemplateLocator::new().scan(&doc);
        assert_eq!(scan.meta_table, Some(1));
        assert_eq!(scan.results_table, Some(0));
    }

    #[test]
    fn test_label_sets_do_not_mix() {
        let doc = MemoryDocument::new()
            .with_table(meta("Teacher:", "Antas:"))
            .with_table(results(&["NAME", "GENDER", "SCORE"]));
        let scan = TemplateLocator::new().scan(&doc);
        assert_eq!(scan.meta_table, None);
        assert_eq!(TemplateLocator::new().find_regions(&doc), None);
    }

    #[test]
    fn test_small_tables_are_not_meta() {
        let narrow = MemoryTable::from_texts(&[&["Teacher:", "x", "Grade:"], &["", "", ""], &["", "", ""]]);
        let short = MemoryTable::from_texts(&[&["Teacher:", "x", "Grade:", "7"]]);
        let doc = MemoryDocument::new().with_table(narrow).with_table(short);
        assert_eq!(TemplateLocator::new().scan(&doc), RegionScan::default());
    }

    #[test]
    fn test_first_match_wins() {
        let doc = MemoryDocument::new()
            .with_table(results(&["NAME", "GENDER", "SCORE"]))
            .with_table(results(&["NAME", "GENDER", "SCORE", "EXTRA"]))
            .with_table(meta("Teacher", "Grade"));
        let scan = TemplateLocator::new().scan(&doc);
        assert_eq!(scan.results_table, Some(0));
        assert_eq!(scan.meta_table, Some(2));
    }

    #[test]
    fn test_missing_marker_is_not_results() {
        let doc = MemoryDocument::new().with_table(results(&["NAME", "GENDER", "TOTAL"]));
        assert!(!TemplateLocator::is_results_table(&doc, 0));
        assert!(!TemplateLocator::is_results_table(&doc, 7));
    }

    #[test]
    fn test_empty_document_is_not_found() {
        let doc = MemoryDocument::new().with_paragraph("no tables here");
        assert_eq!(TemplateLocator::new().find_regions(&doc), None);
    }
}
