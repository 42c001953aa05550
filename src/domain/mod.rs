// ==========================================
// Phil-IRI GST 系统 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod class;
pub mod learner;
pub mod roster;
pub mod types;

// 重导出核心类型
pub use class::{clamp_grade, ClassDraft, ClassMeta, ClassRecord};
pub use learner::{normalize_gender, Learner, LearnerDraft, ScoreInput};
pub use roster::{FormEntry, PlacementResult, ResultRow};
pub use types::{GenderBucket, LanguageVariant, StartingPoint};
