// ==========================================
// Phil-IRI GST 系统 - 配置层
// ==========================================
// 职责: 判定阈值、语言版本导出配置、模板目录
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod placement_policy;
pub mod variant_profile;

// 重导出核心配置
pub use config_manager::{config_keys, ConfigManager};
pub use placement_policy::PlacementPolicy;
pub use variant_profile::{VariantProfile, DOCX_MIME_TYPE};
