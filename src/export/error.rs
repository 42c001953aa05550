// ==========================================
// Phil-IRI GST 系统 - 导出层错误类型
// ==========================================
// 只有环境错误会到达这里: 文档能力不可用、模板缺失/不可读、序列化失败
// 模板结构不匹配不是错误（回退到从零构建）
// ==========================================

use crate::document::error::DocumentError;
use thiserror::Error;

/// 导出层错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("结构化文档能力不可用: 构建时未启用 docx 特性")]
    CapabilityUnavailable,

    #[error("Word 模板不存在: {0}")]
    TemplateNotFound(String),

    #[error("Word 模板无法读取 ({path}): {source}")]
    TemplateUnreadable {
        path: String,
        #[source]
        source: DocumentError,
    },

    #[error("文档生成失败: {0}")]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
