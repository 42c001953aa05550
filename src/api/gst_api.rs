// ==========================================
// Phil-IRI GST 系统 - GST 结果 API
// ==========================================
// 职责: GST 结果名册查看、Word 文档导出
// 红线: 屏幕名册与导出名册使用同一构建流程（DISCONTINUE 均剔除）
// ==========================================

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, VariantProfile, DOCX_MIME_TYPE};
use crate::domain::class::ClassMeta;
use crate::domain::roster::ResultRow;
use crate::domain::types::LanguageVariant;
use crate::engine::{PlacementEngine, RosterBuilder};
use crate::export::ExportOrchestrator;
use crate::repository::{ClassRepository, LearnerRepository};

// ==========================================
// ExportedFile - 导出结果（供下载）
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct ExportedFile {
    pub filename: String,
    pub mime_type: String,
    #[serde(skip)]
    pub content: Vec<u8>,
}

// ==========================================
// GstApi - GST 结果 API
// ==========================================
pub struct GstApi {
    class_repo: Arc<ClassRepository>,
    learner_repo: Arc<LearnerRepository>,
    config: Arc<ConfigManager>,
    orchestrator: ExportOrchestrator,
}

impl GstApi {
    pub fn new(
        class_repo: Arc<ClassRepository>,
        learner_repo: Arc<LearnerRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            class_repo,
            learner_repo,
            config,
            orchestrator: ExportOrchestrator::new(),
        }
    }

    /// 按当前阈值配置构建名册引擎
    fn roster_builder(&self) -> ApiResult<RosterBuilder> {
        let policy = self
            .config
            .get_placement_policy()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;
        Ok(RosterBuilder::new(PlacementEngine::new(policy)))
    }

    fn template_path(&self, variant: LanguageVariant) -> ApiResult<PathBuf> {
        self.config
            .resolve_template_path(variant)
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    /// GST 结果名册
    ///
    /// 学习者按姓名读取; 未参加该语言测试的跳过; DISCONTINUE 剔除; 最后按名册规则排序
    #[instrument(skip(self))]
    pub fn gst_roster(&self, class_id: i64, variant: LanguageVariant) -> ApiResult<Vec<ResultRow>> {
        let class = self.class_repo.get(class_id)?;
        let learners = self.learner_repo.list_by_name(class_id)?;
        Ok(self.roster_builder()?.build_gst_rows(class.grade, &learners, variant))
    }

    /// 导出班级的 GST 结果文档
    #[instrument(skip(self))]
    pub fn export_gst(&self, class_id: i64, variant: LanguageVariant) -> ApiResult<ExportedFile> {
        let class = self.class_repo.get(class_id)?;
        let learners = self.learner_repo.list_by_name(class_id)?;
        let rows = self.roster_builder()?.build_gst_rows(class.grade, &learners, variant);

        let template = self.template_path(variant)?;
        let cursor = self
            .orchestrator
            .export_document(&template, &class.meta(), &rows, variant)?;

        let profile = VariantProfile::for_variant(variant);
        let file = ExportedFile {
            filename: profile.download_name(Some(class_id)),
            mime_type: DOCX_MIME_TYPE.to_string(),
            content: cursor.into_inner(),
        };
        info!(class_id, %variant, filename = %file.filename, rows = rows.len(), "GST 结果已导出");
        Ok(file)
    }

    /// 临时导出: 调用方直接提供表头与结果行（英语模板）
    #[instrument(skip(self, meta, rows), fields(count = rows.len()))]
    pub fn export_adhoc(&self, meta: &ClassMeta, rows: &[ResultRow]) -> ApiResult<ExportedFile> {
        let variant = LanguageVariant::English;
        let template = self.template_path(variant)?;
        let cursor = self.orchestrator.export_document(&template, meta, rows, variant)?;

        Ok(ExportedFile {
            filename: VariantProfile::for_variant(variant).download_name(None),
            mime_type: DOCX_MIME_TYPE.to_string(),
            content: cursor.into_inner(),
        })
    }
}
