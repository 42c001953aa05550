// ==========================================
// Phil-IRI GST 系统 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑（年级夹紧除外: 每个写入点都要保证）
// ==========================================

pub mod class_repo;
pub mod error;
pub mod learner_repo;

// 重导出核心仓储
pub use class_repo::ClassRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use learner_repo::LearnerRepository;
