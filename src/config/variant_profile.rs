// ==========================================
// Phil-IRI GST 系统 - 语言版本导出配置
// ==========================================
// 职责: 每个语言版本的模板文件、标题、测试类型标签、下载文件名
// 说明: 两套标签硬编码,不引入国际化框架
// ==========================================

use crate::domain::types::LanguageVariant;

/// Word 文档 MIME 类型
pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// 共用副标题
pub const STAGE_TWO_SUBTITLE: &str = "STAGE 2 ADMISSION IN PHIL-IRI";

// ==========================================
// VariantProfile - 语言版本导出配置
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantProfile {
    pub variant: LanguageVariant,
    pub template_file: &'static str,   // 模板文件名
    pub title: &'static str,           // 主标题
    pub subtitle: &'static str,        // 副标题
    pub test_type_label: &'static str, // "Type of Test" 取值
    pub file_prefix: &'static str,     // 下载文件名前缀
}

const ENGLISH_PROFILE: VariantProfile = VariantProfile {
    variant: LanguageVariant::English,
    template_file: "Portrait_Header-Footer.docx",
    title: "ENGLISH GST RESULTS",
    subtitle: STAGE_TWO_SUBTITLE,
    test_type_label: "Screening Test Level (English)",
    file_prefix: "ENGLISH_GST_RESULTS",
};

const FILIPINO_PROFILE: VariantProfile = VariantProfile {
    variant: LanguageVariant::Filipino,
    template_file: "Portrait_Header-FIL.docx",
    title: "FILIPINO GST RESULTS",
    subtitle: STAGE_TWO_SUBTITLE,
    test_type_label: "Screening Test Level (Filipino)",
    file_prefix: "FILIPINO_GST_RESULTS",
};

impl VariantProfile {
    /// 按语言版本取配置
    pub fn for_variant(variant: LanguageVariant) -> &'static VariantProfile {
        match variant {
            LanguageVariant::English => &ENGLISH_PROFILE,
            LanguageVariant::Filipino => &FILIPINO_PROFILE,
        }
    }

    /// 下载文件名
    ///
    /// - Some(id): `ENGLISH_GST_RESULTS_{id}.docx`
    /// - None: `ENGLISH_GST_RESULTS.docx`（临时导出）
    pub fn download_name(&self, class_id: Option<i64>) -> String {
        match class_id {
            Some(id) => format!("{}_{}.docx", self.file_prefix, id),
            None => format!("{}.docx", self.file_prefix),
        }
    }
}
