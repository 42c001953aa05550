// ==========================================
// Phil-IRI GST 系统 - 配置管理器
// ==========================================
// 职责: 阈值覆写、模板目录配置
// 存储: config_kv 表 (key-value + scope)
// 优先级: 环境变量 > config_kv > 缺省值
// ==========================================

use crate::config::placement_policy::PlacementPolicy;
use crate::config::variant_profile::VariantProfile;
use crate::db::open_sqlite_connection;
use crate::domain::types::LanguageVariant;
use rusqlite::{params, Connection};
use std::error::Error;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

/// 模板目录环境变量
pub const TEMPLATE_DIR_ENV: &str = "PHILIRI_GST_TEMPLATE_DIR";
/// 缺省模板目录
pub const DEFAULT_TEMPLATE_DIR: &str = "static/docs";
/// 缺省备用模板目录
pub const DEFAULT_TEMPLATE_FALLBACK_DIR: &str = "/mnt/data";

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2, updated_at = datetime('now')",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取 u32 配置,缺失或格式错误时回退缺省值
    fn get_u32_or_default(&self, key: &str, default: u32) -> Result<u32, Box<dyn Error>> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(v) => Ok(v),
                Err(_) => {
                    tracing::warn!(key, value = %raw, default, "配置值格式错误,使用缺省值");
                    Ok(default)
                }
            },
        }
    }

    // ===== 判定阈值配置 =====

    /// 获取判定阈值策略
    ///
    /// # 说明
    /// 覆写后阈值顺序不合法时整体回退缺省策略
    pub fn get_placement_policy(&self) -> Result<PlacementPolicy, Box<dyn Error>> {
        let defaults = PlacementPolicy::default();
        let policy = PlacementPolicy {
            items_total: self.get_u32_or_default(config_keys::ITEMS_TOTAL, defaults.items_total)?,
            discontinue_threshold: self.get_u32_or_default(
                config_keys::DISCONTINUE_THRESHOLD,
                defaults.discontinue_threshold,
            )?,
            one_below_threshold: self.get_u32_or_default(
                config_keys::ONE_BELOW_THRESHOLD,
                defaults.one_below_threshold,
            )?,
        };

        match policy.validate() {
            Ok(()) => Ok(policy),
            Err(reason) => {
                tracing::warn!(%reason, "阈值覆写不合法,使用缺省策略");
                Ok(defaults)
            }
        }
    }

    // ===== 模板路径配置 =====

    /// 获取模板目录
    pub fn get_template_dir(&self) -> Result<PathBuf, Box<dyn Error>> {
        if let Ok(dir) = std::env::var(TEMPLATE_DIR_ENV) {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        Ok(PathBuf::from(
            self.get_config_value(config_keys::TEMPLATE_DIR)?
                .unwrap_or_else(|| DEFAULT_TEMPLATE_DIR.to_string()),
        ))
    }

    /// 获取备用模板目录
    pub fn get_template_fallback_dir(&self) -> Result<PathBuf, Box<dyn Error>> {
        Ok(PathBuf::from(
            self.get_config_value(config_keys::TEMPLATE_FALLBACK_DIR)?
                .unwrap_or_else(|| DEFAULT_TEMPLATE_FALLBACK_DIR.to_string()),
        ))
    }

    /// 解析语言版本的模板路径
    ///
    /// # 逻辑
    /// 1. <template_dir>/<file> 存在 → 使用
    /// 2. 否则 → <fallback_dir>/<file>（不检查存在性,由导出编排器报错）
    pub fn resolve_template_path(&self, variant: LanguageVariant) -> Result<PathBuf, Box<dyn Error>> {
        let profile = VariantProfile::for_variant(variant);
        let primary = self.get_template_dir()?.join(profile.template_file);
        if primary.is_file() {
            return Ok(primary);
        }

        let fallback = self.get_template_fallback_dir()?.join(profile.template_file);
        tracing::debug!(
            primary = %primary.display(),
            fallback = %fallback.display(),
            "主模板不存在,使用备用路径"
        );
        Ok(fallback)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 判定阈值
    pub const ITEMS_TOTAL: &str = "items_total";
    pub const DISCONTINUE_THRESHOLD: &str = "discontinue_threshold";
    pub const ONE_BELOW_THRESHOLD: &str = "one_below_threshold";

    // 模板目录
    pub const TEMPLATE_DIR: &str = "template_dir";
    pub const TEMPLATE_FALLBACK_DIR: &str = "template_fallback_dir";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;

    fn setup() -> ConfigManager {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        ConfigManager::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_policy_defaults_without_overrides() {
        let manager = setup();
        assert_eq!(manager.get_placement_policy().unwrap(), PlacementPolicy::default());
    }

    #[test]
    fn test_policy_overrides() {
        let manager = setup();
        manager.set_global_config_value(config_keys::DISCONTINUE_THRESHOLD, "30").unwrap();
        manager.set_global_config_value(config_keys::ONE_BELOW_THRESHOLD, " 18 ").unwrap();

        let policy = manager.get_placement_policy().unwrap();
        assert_eq!(policy.discontinue_threshold, 30);
        assert_eq!(policy.one_below_threshold, 18);
        assert_eq!(policy.items_total, 40);
    }

    #[test]
    fn test_invalid_overrides_fall_back() {
        let manager = setup();
        manager.set_global_config_value(config_keys::ITEMS_TOTAL, "abc").unwrap();
        assert_eq!(manager.get_placement_policy().unwrap().items_total, 40);

        // 顺序不合法 → 整体缺省
        manager.set_global_config_value(config_keys::ONE_BELOW_THRESHOLD, "35").unwrap();
        assert_eq!(manager.get_placement_policy().unwrap(), PlacementPolicy::default());
    }

    #[test]
    fn test_resolve_template_uses_fallback_dir() {
        let manager = setup();
        let missing = tempfile::tempdir().unwrap();
        let fallback = tempfile::tempdir().unwrap();
        manager
            .set_global_config_value(config_keys::TEMPLATE_FALLBACK_DIR, fallback.path().to_str().unwrap())
            .unwrap();
        manager
            .set_global_config_value(config_keys::TEMPLATE_DIR, missing.path().to_str().unwrap())
            .unwrap();

        // 环境变量可能被外部设置,此处只在未设置时断言
        if std::env::var(TEMPLATE_DIR_ENV).is_err() {
            let path = manager.resolve_template_path(LanguageVariant::Filipino).unwrap();
            assert_eq!(path, fallback.path().join("Portrait_Header-FIL.docx"));

            std::fs::write(missing.path().join("Portrait_Header-FIL.docx"), b"x").unwrap();
            let path = manager.resolve_template_path(LanguageVariant::Filipino).unwrap();
            assert_eq!(path, missing.path().join("Portrait_Header-FIL.docx"));
        }
    }
}
