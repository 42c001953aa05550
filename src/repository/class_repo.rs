// ==========================================
// Phil-IRI GST 系统 - 班级数据仓储
// ==========================================
// 职责: class 表的 CRUD
// 红线: grade 写入前夹紧到 [1, 12]
// ==========================================

use crate::domain::class::{clamp_grade, ClassDraft, ClassRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, OptionalExtension, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const CLASS_COLUMNS: &str =
    "id, teacher, school, grade, section, screening_level_eng, screening_level_fil, date_text";

// ==========================================
// ClassRepository - 班级仓储
// ==========================================
pub struct ClassRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ClassRepository {
    /// 创建新的 ClassRepository 实例
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<ClassRecord> {
        let grade: i64 = row.get(3)?;
        Ok(ClassRecord {
            id: row.get(0)?,
            teacher: row.get(1)?,
            school: row.get(2)?,
            grade: crate::domain::class::clamp_grade(grade),
            section: row.get(4)?,
            screening_level_eng: row.get(5)?,
            screening_level_fil: row.get(6)?,
            date_text: row.get(7)?,
        })
    }

    /// 新建班级,返回新 ID
    pub fn insert(&self, draft: &ClassDraft) -> RepositoryResult<i64> {
        let draft = draft.normalized();
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO class (
                teacher, school, grade, section,
                screening_level_eng, screening_level_fil, date_text
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                draft.teacher,
                draft.school,
                i64::from(draft.clamped_grade()),
                draft.section,
                draft.screening_level_eng,
                draft.screening_level_fil,
                draft.date_text,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// 按主键查询
    ///
    /// # 返回
    /// - Ok(Some(ClassRecord)): 找到班级
    /// - Ok(None): 未找到
    pub fn find_by_id(&self, class_id: i64) -> RepositoryResult<Option<ClassRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM class WHERE id = ?1", CLASS_COLUMNS);
        let record = conn
            .query_row(&sql, params![class_id], Self::map_row)
            .optional()?;
        Ok(record)
    }

    /// 按主键查询（不存在即报错）
    pub fn get(&self, class_id: i64) -> RepositoryResult<ClassRecord> {
        self.find_by_id(class_id)?
            .ok_or_else(|| RepositoryError::NotFound {
                entity: "class".to_string(),
                id: class_id.to_string(),
            })
    }

    /// 全部班级（新建的在前）
    pub fn list_all(&self) -> RepositoryResult<Vec<ClassRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("SELECT {} FROM class ORDER BY id DESC", CLASS_COLUMNS);
        let mut stmt = conn.prepare(&sql)?;
        let classes = stmt
            .query_map([], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(classes)
    }

    /// 更新班级表头信息
    ///
    /// 未提供 grade 时保留当前年级
    pub fn update_meta(&self, class_id: i64, draft: &ClassDraft) -> RepositoryResult<()> {
        let grade = draft.grade.map(|grade| i64::from(clamp_grade(grade)));
        let draft = draft.normalized();
        let conn = self.get_conn()?;
        let affected = conn.execute(
            r#"
            UPDATE class SET
                teacher = ?2, school = ?3, grade = COALESCE(?4, grade), section = ?5,
                screening_level_eng = ?6, screening_level_fil = ?7, date_text = ?8
            WHERE id = ?1
            "#,
            params![
                class_id,
                draft.teacher,
                draft.school,
                grade,
                draft.section,
                draft.screening_level_eng,
                draft.screening_level_fil,
                draft.date_text,
            ],
        )?;

        if affected == 0 {
            return Err(RepositoryError::NotFound {
                entity: "class".to_string(),
                id: class_id.to_string(),
            });
        }
        Ok(())
    }

    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM class", [], |row| row.get(0))?;
        Ok(count)
    }
}
