// ==========================================
// Phil-IRI GST 系统 - 班级 API
// ==========================================
// 职责: 班级新建/表头维护、学习者名册保存与文件导入
// 红线: grade 在每个写入点夹紧到 [1, 12]
// ==========================================

use std::path::Path;
use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::class::{ClassDraft, ClassRecord};
use crate::domain::learner::{Learner, LearnerDraft};
use crate::importer::{LearnerFieldMapper, LearnerImporter};
use crate::repository::{ClassRepository, LearnerRepository};

// ==========================================
// ClassApi - 班级 API
// ==========================================
pub struct ClassApi {
    class_repo: Arc<ClassRepository>,
    learner_repo: Arc<LearnerRepository>,
    importer: LearnerImporter,
    mapper: LearnerFieldMapper,
}

impl ClassApi {
    pub fn new(class_repo: Arc<ClassRepository>, learner_repo: Arc<LearnerRepository>) -> Self {
        Self {
            class_repo,
            learner_repo,
            importer: LearnerImporter::new(),
            mapper: LearnerFieldMapper::new(),
        }
    }

    /// 新建班级
    ///
    /// # 说明
    /// - 文本字段去空白,年级夹紧（缺省 7）
    /// - 筛查等级按输入保存,空值不补缺省
    #[instrument(skip(self, draft))]
    pub fn create_class(&self, draft: &ClassDraft) -> ApiResult<i64> {
        let draft = draft.normalized();

        let class_id = self.class_repo.insert(&draft)?;
        info!(class_id, grade = draft.clamped_grade(), "班级已创建");
        Ok(class_id)
    }

    /// 更新班级表头信息
    #[instrument(skip(self, draft))]
    pub fn update_class_meta(&self, class_id: i64, draft: &ClassDraft) -> ApiResult<()> {
        self.class_repo.update_meta(class_id, draft)?;
        debug!(class_id, "班级表头已更新");
        Ok(())
    }

    pub fn get_class(&self, class_id: i64) -> ApiResult<ClassRecord> {
        Ok(self.class_repo.get(class_id)?)
    }

    /// 全部班级（新建的在前）
    pub fn list_classes(&self) -> ApiResult<Vec<ClassRecord>> {
        Ok(self.class_repo.list_all()?)
    }

    /// 编辑视图: 按录入顺序列出学习者
    pub fn list_learners(&self, class_id: i64) -> ApiResult<Vec<Learner>> {
        self.class_repo.get(class_id)?;
        Ok(self.learner_repo.list_by_id(class_id)?)
    }

    /// 保存学习者名册（整表替换）
    ///
    /// # 参数
    /// - payload: 宽松 JSON 行（字段缺失/类型错误按缺省值处理）
    ///
    /// # 返回
    /// 保存的学习者数量
    #[instrument(skip(self, payload), fields(count = payload.len()))]
    pub fn save_learners(&self, class_id: i64, payload: &[Value]) -> ApiResult<usize> {
        let drafts: Vec<LearnerDraft> = payload
            .iter()
            .map(|row| self.mapper.learner_from_json(row))
            .collect();
        self.replace_learners(class_id, &drafts)
    }

    /// 从 CSV / Excel 名册文件导入（整表替换）
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn import_learners(&self, class_id: i64, path: &Path) -> ApiResult<usize> {
        // 先确认班级存在,避免解析完大文件才报错
        self.class_repo.get(class_id)?;

        let drafts = self.importer.load(path)?;
        if drafts.is_empty() {
            return Err(ApiError::ValidationError(format!(
                "名册文件中没有有效的学习者: {}",
                path.display()
            )));
        }
        self.replace_learners(class_id, &drafts)
    }

    fn replace_learners(&self, class_id: i64, drafts: &[LearnerDraft]) -> ApiResult<usize> {
        self.class_repo.get(class_id)?;
        let saved = self.learner_repo.replace_for_class(class_id, drafts)?;
        info!(class_id, saved, "学习者名册已保存");
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;
    use serde_json::json;
    use std::sync::Mutex;

    fn api() -> ClassApi {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        ClassApi::new(
            Arc::new(ClassRepository::from_connection(conn.clone())),
            Arc::new(LearnerRepository::from_connection(conn)),
        )
    }

    #[test]
    fn test_create_class_keeps_screening_levels_as_given() {
        let api = api();
        let id = api
            .create_class(&ClassDraft {
                teacher: " Ms. Reyes ".to_string(),
                screening_level_fil: "Stage 2".to_string(),
                ..Default::default()
            })
            .unwrap();

        let class = api.get_class(id).unwrap();
        assert_eq!(class.teacher, "Ms. Reyes");
        assert_eq!(class.grade, 7);
        assert_eq!(class.screening_level_eng, "");
        assert_eq!(class.screening_level_fil, "Stage 2");
    }

    #[test]
    fn test_save_learners_replaces_roster() {
        let api = api();
        let id = api.create_class(&ClassDraft::default()).unwrap();

        api.save_learners(id, &[json!({"name": "Old"})]).unwrap();
        let saved = api
            .save_learners(
                id,
                &[
                    json!({"name": " Juan ", "gender": "m", "eng_literal": "10"}),
                    json!({"name": "Maria", "gender": "Female", "took_eng": null}),
                ],
            )
            .unwrap();
        assert_eq!(saved, 2);

        let learners = api.list_learners(id).unwrap();
        assert_eq!(learners.len(), 2);
        assert_eq!(learners[0].name, "Juan");
        assert_eq!(learners[0].eng.literal, 10);
        assert_eq!(learners[1].gender, "F");
        assert!(!learners[1].took_eng);
    }

    #[test]
    fn test_save_learners_unknown_class() {
        let result = api().save_learners(404, &[json!({"name": "X"})]);
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[test]
    fn test_update_missing_class() {
        let result = api().update_class_meta(9, &ClassDraft::default());
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }
}
