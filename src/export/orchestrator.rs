// ==========================================
// Phil-IRI GST 系统 - 导出编排
// ==========================================
// 职责: 班级表头 + 结果行 → 完整的 Word 文档字节流
// 流程:
// 1) 检查文档能力与模板文件（环境错误直接报告,不恢复）
// 2) 结果行按名册规则排序
// 3) 打开模板,应用文档缺省样式
// 4) 定位模板区域 → 填充; 未找到 → 回退构建
// 5) 序列化,游标置于起点
// ==========================================
// 约束: 每次导出独占自己的文档对象,不跨调用共享
// ==========================================

use crate::config::variant_profile::VariantProfile;
use crate::document::capability::{DocumentDefaults, StructuralDocument};
use crate::domain::class::ClassMeta;
use crate::domain::roster::ResultRow;
use crate::domain::types::LanguageVariant;
use crate::engine::roster_sorter::RosterSorter;
use crate::export::error::{ExportError, ExportResult};
use crate::export::fallback::{FallbackBuilder, FallbackTitles};
use crate::export::locator::TemplateLocator;
use crate::export::populator::TemplatePopulator;
use std::io::Cursor;
use std::path::Path;

/// 导出路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportOutcome {
    Template, // 模板填充
    Fallback, // 从零构建
}

// ==========================================
// ExportOrchestrator - 导出编排器
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ExportOrchestrator {
    sorter: RosterSorter,
    locator: TemplateLocator,
    populator: TemplatePopulator,
    fallback: FallbackBuilder,
    defaults: DocumentDefaults,
}

impl ExportOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在已打开的文档上完成排序/定位/填充或回退
    ///
    /// 不涉及文件与序列化; 任何 StructuralDocument 实现均可使用
    pub fn render<D: StructuralDocument + ?Sized>(
        &self,
        doc: &mut D,
        meta: &ClassMeta,
        rows: &[ResultRow],
        profile: &VariantProfile,
    ) -> ExportOutcome {
        let rows = self.sorter.sort(rows.to_vec());
        doc.apply_defaults(&self.defaults);

        let scan = self.locator.scan(doc);
        if scan.is_complete()
            && self
                .populator
                .populate(doc, &scan, meta, &rows, profile.test_type_label)
        {
            return ExportOutcome::Template;
        }

        tracing::warn!(
            meta_table = ?scan.meta_table,
            results_table = ?scan.results_table,
            "模板区域未找到,改用回退版式"
        );
        let titles = FallbackTitles {
            title: profile.title,
            subtitle: profile.subtitle,
        };
        self.fallback
            .build_from_scratch(doc, meta, &rows, &titles, profile.test_type_label);
        ExportOutcome::Fallback
    }

    /// 导出 Word 文档
    ///
    /// # 错误
    /// - 模板路径不是已存在的文件: TemplateNotFound
    /// - 模板不是可读的 .docx: TemplateUnreadable
    #[cfg(feature = "docx")]
    #[tracing::instrument(skip(self, meta, rows), fields(
        export_id = %uuid::Uuid::new_v4(),
        count = rows.len(),
        template = %template_path.display(),
    ))]
    pub fn export_document(
        &self,
        template_path: &Path,
        meta: &ClassMeta,
        rows: &[ResultRow],
        variant: LanguageVariant,
    ) -> ExportResult<Cursor<Vec<u8>>> {
        use crate::document::docx::DocxDocument;

        if !template_path.is_file() {
            return Err(ExportError::TemplateNotFound(template_path.display().to_string()));
        }

        let mut doc = DocxDocument::open(template_path).map_err(|source| ExportError::TemplateUnreadable {
            path: template_path.display().to_string(),
            source,
        })?;

        let profile = VariantProfile::for_variant(variant);
        let outcome = self.render(&mut doc, meta, rows, profile);
        let bytes = doc.to_bytes()?;

        tracing::info!(?outcome, bytes = bytes.len(), "GST 结果文档导出完成");
        Ok(Cursor::new(bytes))
    }

    /// 导出 Word 文档（未启用 docx 特性: 文档能力不可用）
    #[cfg(not(feature = "docx"))]
    pub fn export_document(
        &self,
        template_path: &Path,
        _meta: &ClassMeta,
        _rows: &[ResultRow],
        variant: LanguageVariant,
    ) -> ExportResult<Cursor<Vec<u8>>> {
        tracing::error!(template = %template_path.display(), %variant, "结构化文档能力不可用");
        Err(ExportError::CapabilityUnavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::memory::{MemoryDocument, MemoryTable};

    fn meta() -> ClassMeta {
        ClassMeta {
            teacher: "T".to_string(),
            school: "S".to_string(),
            grade: 7,
            section: "A".to_string(),
            date_text: "D".to_string(),
        }
    }

    fn rows() -> Vec<ResultRow> {
        vec![
            ResultRow::new("Maria", "F", 20, "Grade 5"),
            ResultRow::new("Juan", "M", 20, "Grade 5"),
        ]
    }

    #[test]
    fn test_render_sorts_before_writing() {
        let mut doc = MemoryDocument::new()
            .with_table(MemoryTable::from_texts(&[
                &["Guro", "", "Antas", ""],
                &["Paaralan", "", "Seksiyon", ""],
                &["Uri", "", "Petsa", ""],
            ]))
            .with_table(MemoryTable::from_texts(&[&["#", "PANGALAN", "KASARIAN", "MARKA", "SIMULA"]]));

        let profile = VariantProfile::for_variant(LanguageVariant::Filipino);
        let outcome = ExportOrchestrator::new().render(&mut doc, &meta(), &rows(), profile);

        assert_eq!(outcome, ExportOutcome::Template);
        assert_eq!(doc.cell_text(1, 1, 1).as_deref(), Some("JUAN"));
        assert_eq!(doc.cell_text(1, 2, 1).as_deref(), Some("MARIA"));
        assert_eq!(doc.cell_text(0, 2, 1).as_deref(), Some("SCREENING TEST LEVEL (FILIPINO)"));
        assert_eq!(doc.defaults, Some(DocumentDefaults::default()));
        assert_eq!(doc.table_count(), 2);
    }

    #[test]
    fn test_render_falls_back_when_one_region_missing() {
        let mut doc = MemoryDocument::new()
            .with_table(MemoryTable::from_texts(&[&["NAME", "GENDER", "SCORE"]]));

        let profile = VariantProfile::for_variant(LanguageVariant::English);
        let outcome = ExportOrchestrator::new().render(&mut doc, &meta(), &rows(), profile);

        assert_eq!(outcome, ExportOutcome::Fallback);
        // 原表格不被改动,回退版式追加在其后
        assert_eq!(doc.row_count(0), Some(1));
        assert_eq!(doc.table_count(), 3);
        assert_eq!(doc.row_count(2), Some(3));
        assert_eq!(doc.paragraphs()[0].text, "ENGLISH GST RESULTS");
    }

    #[test]
    fn test_missing_template_is_reported() {
        let result = ExportOrchestrator::new().export_document(
            Path::new("/nonexistent/Portrait_Header-Footer.docx"),
            &meta(),
            &rows(),
            LanguageVariant::English,
        );
        #[cfg(feature = "docx")]
        assert!(matches!(result, Err(ExportError::TemplateNotFound(_))));
        #[cfg(not(feature = "docx"))]
        assert!(matches!(result, Err(ExportError::CapabilityUnavailable)));
    }
}
