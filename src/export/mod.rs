// ==========================================
// Phil-IRI GST 系统 - 结果名册导出层
// ==========================================
// 流程: 排序 → 打开模板 → 缺省样式 → 定位 → 填充 / 回退构建 → 序列化
// ==========================================

pub mod error;
pub mod fallback;
pub mod locator;
pub mod orchestrator;
pub mod populator;

// 重导出核心类型
pub use error::{ExportError, ExportResult};
pub use fallback::{FallbackBuilder, FallbackTitles, RESULTS_HEADERS};
pub use locator::{RegionScan, TemplateLocator, TemplateRegions};
pub use orchestrator::{ExportOrchestrator, ExportOutcome};
pub use populator::TemplatePopulator;
