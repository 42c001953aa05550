// ==========================================
// Phil-IRI GST 系统 - API 层
// ==========================================
// 职责: 提供业务 API 接口,供命令行入口调用
// ==========================================

pub mod class_api;
pub mod error;
pub mod form_api;
pub mod gst_api;

// 重导出核心类型
pub use class_api::ClassApi;
pub use error::{ApiError, ApiResult};
pub use form_api::{FormApi, ScreeningForm};
pub use gst_api::{ExportedFile, GstApi};
