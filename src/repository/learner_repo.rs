// ==========================================
// Phil-IRI GST 系统 - 学习者数据仓储
// ==========================================
// 职责: learner 表的读写
// 说明: 保存采用"整表替换"（先删后插,同一事务）
// ==========================================

use crate::domain::learner::{Learner, LearnerDraft, ScoreInput};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};

const LEARNER_COLUMNS: &str = "id, class_id, name, gender, took_eng, took_fil, \
     eng_literal, eng_inferential, eng_critical, fil_literal, fil_inferential, fil_critical";

// ==========================================
// LearnerRepository - 学习者仓储
// ==========================================
pub struct LearnerRepository {
    conn: Arc<Mutex<Connection>>,
}

impl LearnerRepository {
    /// 创建新的 LearnerRepository 实例
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

    fn score(row: &Row<'_>, idx: usize) -> SqliteResult<u32> {
        let value: i64 = row.get(idx)?;
        Ok(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
    }

    fn map_row(row: &Row<'_>) -> SqliteResult<Learner> {
        Ok(Learner {
            id: row.get(0)?,
            class_id: row.get(1)?,
            name: row.get(2)?,
            gender: row.get(3)?,
            took_eng: row.get::<_, i64>(4)? != 0,
            took_fil: row.get::<_, i64>(5)? != 0,
            eng: ScoreInput::new(Self::score(row, 6)?, Self::score(row, 7)?, Self::score(row, 8)?),
            fil: ScoreInput::new(Self::score(row, 9)?, Self::score(row, 10)?, Self::score(row, 11)?),
        })
    }

    /// 替换班级的全部学习者
    ///
    /// 删除与插入在同一事务中完成; 返回插入条数
    pub fn replace_for_class(&self, class_id: i64, learners: &[LearnerDraft]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        tx.execute("DELETE FROM learner WHERE class_id = ?1", params![class_id])?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO learner (
                    class_id, name, gender, took_eng, took_fil,
                    eng_literal, eng_inferential, eng_critical,
                    fil_literal, fil_inferential, fil_critical
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
                "#,
            )?;
            for learner in learners {
                stmt.execute(params![
                    class_id,
                    learner.name,
                    learner.gender,
                    learner.took_eng,
                    learner.took_fil,
                    learner.eng.literal,
                    learner.eng.inferential,
                    learner.eng.critical,
                    learner.fil.literal,
                    learner.fil.inferential,
                    learner.fil.critical,
                ])?;
            }
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;
        Ok(learners.len())
    }

    /// 按姓名排序（GST 结果视图）
    pub fn list_by_name(&self, class_id: i64) -> RepositoryResult<Vec<Learner>> {
        self.query_ordered(class_id, "name ASC, id ASC")
    }

    /// 筛查表格顺序: 性别降序, ID 升序
    pub fn list_for_forms(&self, class_id: i64) -> RepositoryResult<Vec<Learner>> {
        self.query_ordered(class_id, "gender DESC, id ASC")
    }

    /// 录入顺序（编辑视图）
    pub fn list_by_id(&self, class_id: i64) -> RepositoryResult<Vec<Learner>> {
        self.query_ordered(class_id, "id ASC")
    }

    fn query_ordered(&self, class_id: i64, order_by: &str) -> RepositoryResult<Vec<Learner>> {
        let conn = self.get_conn()?;
        let sql = format!(
            "SELECT {} FROM learner WHERE class_id = ?1 ORDER BY {}",
            LEARNER_COLUMNS, order_by
        );
        let mut stmt = conn.prepare(&sql)?;
        let learners = stmt
            .query_map(params![class_id], Self::map_row)?
            .collect::<SqliteResult<Vec<_>>>()?;
        Ok(learners)
    }

    pub fn count_for_class(&self, class_id: i64) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM learner WHERE class_id = ?1",
            params![class_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::class::ClassDraft;
    use crate::repository::class_repo::ClassRepository;

    fn setup() -> (ClassRepository, LearnerRepository) {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        (
            ClassRepository::from_connection(conn.clone()),
            LearnerRepository::from_connection(conn),
        )
    }

    fn draft(name: &str, gender: &str) -> LearnerDraft {
        LearnerDraft {
            name: name.to_string(),
            gender: gender.to_string(),
            eng: ScoreInput::new(5, 6, 7),
            ..Default::default()
        }
    }

    #[test]
    fn test_replace_for_class_replaces_everything() {
        let (classes, learners) = setup();
        let class_id = classes.insert(&ClassDraft::default()).unwrap();

        learners
            .replace_for_class(class_id, &[draft("Old", "M")])
            .unwrap();
        let inserted = learners
            .replace_for_class(class_id, &[draft("Zed", "M"), draft("Amy", "F")])
            .unwrap();
        assert_eq!(inserted, 2);

        let by_name = learners.list_by_name(class_id).unwrap();
        let names: Vec<&str> = by_name.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["Amy", "Zed"]);
        assert_eq!(by_name[0].eng, ScoreInput::new(5, 6, 7));
        assert!(by_name[0].took_eng && by_name[0].took_fil);
    }

    #[test]
    fn test_form_order_gender_desc_then_id() {
        let (classes, learners) = setup();
        let class_id = classes.insert(&ClassDraft::default()).unwrap();
        learners
            .replace_for_class(class_id, &[draft("B", "F"), draft("C", "M"), draft("A", "M")])
            .unwrap();

        let ordered = learners.list_for_forms(class_id).unwrap();
        let names: Vec<&str> = ordered.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_unknown_class_is_rejected_by_foreign_key() {
        let (_, learners) = setup();
        let result = learners.replace_for_class(999, &[draft("X", "M")]);
        assert!(matches!(result, Err(RepositoryError::ForeignKeyViolation(_))));
        assert_eq!(learners.count_for_class(999).unwrap(), 0);
    }
}
