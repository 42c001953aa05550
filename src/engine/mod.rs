// ==========================================
// Phil-IRI GST 系统 - 引擎层
// ==========================================
// 职责: 起始点判定、名册排序、名册构建
// 红线: Engine 不拼 SQL,不读写文件; 同样输入必须得到同样输出
// ==========================================

pub mod placement;
pub mod roster_builder;
pub mod roster_sorter;

// 重导出核心引擎
pub use placement::PlacementEngine;
pub use roster_builder::RosterBuilder;
pub use roster_sorter::{RosterKey, RosterSorter};
