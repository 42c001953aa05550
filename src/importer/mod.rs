// ==========================================
// Phil-IRI GST 系统 - 导入层
// ==========================================
// 职责: 学习者名册文件 (CSV / Excel) → LearnerDraft
// 流程: 文件解析 → 列名映射 → 宽松类型转换
// ==========================================

// 模块声明
pub mod error;
pub mod file_parser;
pub mod learner_importer;
pub mod learner_mapper;

// 重导出核心类型
pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, UniversalFileParser};
pub use learner_importer::LearnerImporter;
pub use learner_mapper::LearnerFieldMapper;
