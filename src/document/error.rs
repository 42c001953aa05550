// ==========================================
// Phil-IRI GST 系统 - 文档层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 只覆盖"包/部件/XML 无法读写"这类环境错误
//       结构不匹配不是错误,由 StructuralDocument 的 Option 返回表达
// ==========================================

use thiserror::Error;

/// 文档层错误类型
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("文档读写失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("文档包格式错误: {0}")]
    Package(String),

    #[error("文档部件缺失: {0}")]
    MissingPart(String),

    #[error("XML 解析失败 (部件 {part}): {message}")]
    Xml { part: String, message: String },

    #[error("XML 序列化失败: {0}")]
    XmlWrite(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type DocumentResult<T> = Result<T, DocumentError>;
