// ==========================================
// Phil-IRI GST 系统 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享连接和 API 实例
// ==========================================

use std::sync::{Arc, Mutex};

use crate::api::{ClassApi, FormApi, GstApi};
use crate::config::config_manager::ConfigManager;
use crate::repository::{ClassRepository, LearnerRepository};

/// 数据库路径环境变量
pub const DB_PATH_ENV: &str = "PHILIRI_GST_DB_PATH";

/// 应用状态
///
/// 所有仓储共享同一个 SQLite 连接
pub struct AppState {
    /// 数据库路径
    pub db_path: String,

    /// 班级 API
    pub class_api: Arc<ClassApi>,

    /// GST 结果 API
    pub gst_api: Arc<GstApi>,

    /// 筛查表格 API
    pub form_api: Arc<FormApi>,

    /// 配置管理器（阈值/模板目录）
    pub config_manager: Arc<ConfigManager>,
}

impl AppState {
    /// 创建新的 AppState 实例
    ///
    /// # 说明
    /// 该方法会:
    /// 1. 打开数据库并建表（幂等）
    /// 2. 无班级时插入缺省班级
    /// 3. 创建所有 API 实例
    pub fn new(db_path: String) -> Result<Self, String> {
        tracing::info!("初始化AppState,数据库路径: {}", db_path);

        let conn = crate::db::open_sqlite_connection(&db_path)
            .map_err(|e| format!("无法打开数据库: {}", e))?;
        crate::db::init_schema(&conn).map_err(|e| format!("数据库建表失败: {}", e))?;
        // 种子数据失败不阻塞启动
        match crate::db::seed_default_class(&conn) {
            Ok(Some(class_id)) => tracing::info!(class_id, "已插入缺省班级"),
            Ok(None) => {}
            Err(e) => tracing::warn!("缺省班级插入失败(将继续启动): {}", e),
        }
        let conn = Arc::new(Mutex::new(conn));

        // ==========================================
        // 初始化Repository层
        // ==========================================
        let class_repo = Arc::new(ClassRepository::from_connection(conn.clone()));
        let learner_repo = Arc::new(LearnerRepository::from_connection(conn.clone()));
        let config_manager = Arc::new(ConfigManager::from_connection(conn));

        // ==========================================
        // 初始化API层
        // ==========================================
        let class_api = Arc::new(ClassApi::new(class_repo.clone(), learner_repo.clone()));
        let gst_api = Arc::new(GstApi::new(
            class_repo.clone(),
            learner_repo.clone(),
            config_manager.clone(),
        ));
        let form_api = Arc::new(FormApi::new(class_repo, learner_repo, config_manager.clone()));

        tracing::info!("AppState初始化完成");

        Ok(Self {
            db_path,
            class_api,
            gst_api,
            form_api,
            config_manager,
        })
    }

    /// 获取数据库路径
    pub fn get_db_path(&self) -> &str {
        &self.db_path
    }
}

// ==========================================
// 默认数据库路径辅助函数
// ==========================================

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 PHILIRI_GST_DB_PATH（非空时）
/// - 否则: 用户数据目录/philiri-gst/philiri_gst.db
/// - 无用户数据目录: ./philiri_gst.db
pub fn get_default_db_path() -> String {
    use std::path::PathBuf;

    // 允许通过环境变量显式指定 DB 路径（便于调试/测试/CI）
    if let Ok(path) = std::env::var(DB_PATH_ENV) {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./philiri_gst.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("philiri-gst");
        // 确保目录存在; 失败时由打开数据库时报错
        std::fs::create_dir_all(&dir).ok();
        path = dir.join("philiri_gst.db");
    }

    path.to_string_lossy().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_default_db_path() {
        let path = get_default_db_path();
        assert!(!path.is_empty());
        assert!(path.ends_with(".db"));
    }

    #[test]
    fn test_app_state_seeds_default_class() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("state.db").to_string_lossy().to_string();

        let state = AppState::new(db_path.clone()).unwrap();
        let classes = state.class_api.list_classes().unwrap();
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].grade, 7);
        assert_eq!(classes[0].screening_level_eng, "GST");
        assert_eq!(state.get_db_path(), db_path);

        // 再次打开不重复插入
        drop(state);
        let state = AppState::new(db_path).unwrap();
        assert_eq!(state.class_api.list_classes().unwrap().len(), 1);
    }
}
