// ==========================================
// Phil-IRI GST 系统 - 结构化文档层
// ==========================================
// 职责: "段落 + 表格 + 单元格"能力接口及其实现
// - capability: 能力接口 (StructuralDocument)
// - memory: 纯内存实现
// - docx: OOXML 文字处理文档实现 (feature = "docx")
// ==========================================

pub mod capability;
pub mod error;
pub mod memory;

#[cfg(feature = "docx")]
pub mod docx;

// 重导出核心类型
pub use capability::{Alignment, DocumentDefaults, StructuralDocument, TextFormat};
pub use error::{DocumentError, DocumentResult};
pub use memory::{MemoryBlock, MemoryCell, MemoryDocument, MemoryParagraph, MemoryTable};

#[cfg(feature = "docx")]
pub use docx::DocxDocument;
