// ==========================================
// Phil-IRI GST 系统 - 学习者名册导入器
// ==========================================
// 流程: 文件解析 (CSV/Excel) → 字段映射 → LearnerDraft 列表
// 说明: 只负责读取; 写库由 ClassApi 在同一事务中整表替换
// ==========================================

use crate::domain::learner::LearnerDraft;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::learner_mapper::LearnerFieldMapper;
use std::path::Path;
use tracing::instrument;

#[derive(Default)]
pub struct LearnerImporter {
    parser: UniversalFileParser,
    mapper: LearnerFieldMapper,
}

impl LearnerImporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 读取名册文件
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn load(&self, path: &Path) -> ImportResult<Vec<LearnerDraft>> {
        let records = self.parser.parse(path)?;
        let drafts = self.mapper.map_records(&records)?;
        tracing::info!(rows = records.len(), learners = drafts.len(), "名册文件解析完成");
        Ok(drafts)
    }
}
