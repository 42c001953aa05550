// ==========================================
// Phil-IRI GST 系统 - SQLite 连接初始化
// ==========================================
// 目标:
// - 统一所有 Connection::open 的 PRAGMA 行为
// - 统一 busy_timeout,减少偶发 busy 错误
// - 建表 + 缺省班级种子数据
// ==========================================

use crate::domain::class::{DEFAULT_GRADE, DEFAULT_SCREENING_LEVEL};
use rusqlite::{params, Connection, OptionalExtension};
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 当前代码所期望的 schema_version
pub const CURRENT_SCHEMA_VERSION: i64 = 1;

/// 配置 SQLite 连接的统一 PRAGMA
///
/// 说明：
/// - foreign_keys 需要"每个连接"单独开启
/// - busy_timeout 需要"每个连接"单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 初始化 schema（幂等）
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS class (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            teacher TEXT NOT NULL DEFAULT '',
            school TEXT NOT NULL DEFAULT '',
            grade INTEGER NOT NULL DEFAULT 7 CHECK (grade BETWEEN 1 AND 12),
            section TEXT NOT NULL DEFAULT '',
            screening_level_eng TEXT NOT NULL DEFAULT 'GST',
            screening_level_fil TEXT NOT NULL DEFAULT 'GST',
            date_text TEXT NOT NULL DEFAULT ''
        );

        CREATE TABLE IF NOT EXISTS learner (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            class_id INTEGER NOT NULL REFERENCES class(id) ON DELETE CASCADE,
            name TEXT NOT NULL DEFAULT '',
            gender TEXT NOT NULL DEFAULT 'M',
            took_eng INTEGER NOT NULL DEFAULT 1,
            took_fil INTEGER NOT NULL DEFAULT 1,
            eng_literal INTEGER NOT NULL DEFAULT 0,
            eng_inferential INTEGER NOT NULL DEFAULT 0,
            eng_critical INTEGER NOT NULL DEFAULT 0,
            fil_literal INTEGER NOT NULL DEFAULT 0,
            fil_inferential INTEGER NOT NULL DEFAULT 0,
            fil_critical INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_learner_class ON learner(class_id);

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL DEFAULT 'global',
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        params![CURRENT_SCHEMA_VERSION],
    )?;
    Ok(())
}

/// 无班级时插入缺省班级（grade=7, GST, 今日日期）
///
/// # 返回
/// - Some(id): 新插入的班级ID
/// - None: 已有班级,未插入
pub fn seed_default_class(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM class", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(None);
    }

    let today = chrono::Local::now().date_naive().to_string();
    conn.execute(
        "INSERT INTO class (teacher, school, grade, section, screening_level_eng, screening_level_fil, date_text)
         VALUES ('', '', ?1, '', ?2, ?2, ?3)",
        params![DEFAULT_GRADE, DEFAULT_SCREENING_LEVEL, today],
    )?;
    Ok(Some(conn.last_insert_rowid()))
}

/// 读取 schema_version（若表不存在则返回 None）
pub fn read_schema_version(conn: &Connection) -> rusqlite::Result<Option<i64>> {
    let has_table: bool = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type='table' AND name='schema_version' LIMIT 1",
            [],
            |_row| Ok(true),
        )
        .optional()?
        .unwrap_or(false);

    if !has_table {
        return Ok(None);
    }

    let v: Option<i64> = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| row.get(0))?;
    Ok(v)
}
