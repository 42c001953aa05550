// ==========================================
// Phil-IRI GST 系统 - 核心库
// ==========================================
// 职责: 小组筛查测试 (GST) 起始点判定、结果名册排序、Word 结果文档导出
// 技术栈: Rust + SQLite + OOXML
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 配置层 - 阈值与语言版本
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 引擎层 - 判定与名册规则
pub mod engine;

// 文档层 - 结构化文档能力
pub mod document;

// 导出层 - 模板定位/填充/回退
pub mod export;

// 数据仓储层 - 数据访问
pub mod repository;

// 导入层 - 名册文件
pub mod importer;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{GenderBucket, LanguageVariant, StartingPoint};

// 领域实体
pub use domain::{ClassMeta, ClassRecord, FormEntry, Learner, PlacementResult, ResultRow, ScoreInput};

// 配置
pub use config::{PlacementPolicy, VariantProfile};

// 引擎
pub use engine::{PlacementEngine, RosterBuilder, RosterSorter};

// 导出
pub use export::{ExportError, ExportOrchestrator, ExportOutcome, TemplateLocator};

// API
pub use api::{ClassApi, FormApi, GstApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Phil-IRI GST";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert_eq!(APP_NAME, "Phil-IRI GST");
    }
}
