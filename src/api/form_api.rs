// ==========================================
// Phil-IRI GST 系统 - 筛查表格 API
// ==========================================
// 职责: Phil-IRI Form 1A/1B 数据（男/女分列,英语与菲律宾语并列）
// ==========================================

use std::sync::Arc;

use serde::Serialize;
use tracing::instrument;

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, PlacementPolicy};
use crate::domain::class::ClassRecord;
use crate::domain::roster::FormEntry;
use crate::engine::{PlacementEngine, RosterBuilder};
use crate::repository::{ClassRepository, LearnerRepository};

/// 筛查表格
#[derive(Debug, Clone, Serialize)]
pub struct ScreeningForm {
    pub class: ClassRecord,
    pub males: Vec<FormEntry>,
    pub females: Vec<FormEntry>,
    pub policy: PlacementPolicy, // 满分与阈值（表头显示用）
}

pub struct FormApi {
    class_repo: Arc<ClassRepository>,
    learner_repo: Arc<LearnerRepository>,
    config: Arc<ConfigManager>,
}

impl FormApi {
    pub fn new(
        class_repo: Arc<ClassRepository>,
        learner_repo: Arc<LearnerRepository>,
        config: Arc<ConfigManager>,
    ) -> Self {
        Self {
            class_repo,
            learner_repo,
            config,
        }
    }

    /// 班级筛查表格数据
    ///
    /// 学习者按表格顺序读取（性别降序, ID 升序）后分列
    #[instrument(skip(self))]
    pub fn screening_form(&self, class_id: i64) -> ApiResult<ScreeningForm> {
        let class = self.class_repo.get(class_id)?;
        let learners = self.learner_repo.list_for_forms(class_id)?;
        let policy = self
            .config
            .get_placement_policy()
            .map_err(|e| ApiError::ConfigError(e.to_string()))?;

        let builder = RosterBuilder::new(PlacementEngine::new(policy));
        let (males, females) = builder.build_form_entries(class.grade, &learners);

        Ok(ScreeningForm {
            class,
            males,
            females,
            policy: *builder.engine().policy(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::class::ClassDraft;
    use crate::domain::learner::{LearnerDraft, ScoreInput};
    use crate::domain::types::StartingPoint;
    use rusqlite::Connection;
    use std::sync::Mutex;

    #[test]
    fn test_screening_form_splits_by_gender() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let classes = Arc::new(ClassRepository::from_connection(conn.clone()));
        let learners = Arc::new(LearnerRepository::from_connection(conn.clone()));
        let api = FormApi::new(
            classes.clone(),
            learners.clone(),
            Arc::new(ConfigManager::from_connection(conn)),
        );

        let id = classes
            .insert(&ClassDraft {
                grade: Some(4),
                ..Default::default()
            })
            .unwrap();
        learners
            .replace_for_class(
                id,
                &[
                    LearnerDraft {
                        name: "Ana".to_string(),
                        gender: "F".to_string(),
                        took_fil: false,
                        eng: ScoreInput::new(10, 10, 10),
                        ..Default::default()
                    },
                    LearnerDraft {
                        name: "Ben".to_string(),
                        gender: "M".to_string(),
                        ..Default::default()
                    },
                    LearnerDraft {
                        name: "Cy".to_string(),
                        gender: "X".to_string(),
                        ..Default::default()
                    },
                ],
            )
            .unwrap();

        let form = api.screening_form(id).unwrap();
        assert_eq!(form.policy, PlacementPolicy::default());
        assert_eq!(form.males.len(), 1);
        assert_eq!(form.females.len(), 1);

        let ben = &form.males[0];
        assert_eq!(ben.eng.map(|p| p.starting_point), Some(StartingPoint::Grade(1)));
        let ana = &form.females[0];
        assert_eq!(ana.eng.map(|p| p.total), Some(30));
        assert_eq!(ana.eng.map(|p| p.starting_point), Some(StartingPoint::Discontinue));
        assert!(ana.fil.is_none());
    }

    #[test]
    fn test_screening_form_uses_configured_policy() {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::configure_sqlite_connection(&conn).unwrap();
        crate::db::init_schema(&conn).unwrap();
        let conn = Arc::new(Mutex::new(conn));
        let classes = Arc::new(ClassRepository::from_connection(conn.clone()));
        let learners = Arc::new(LearnerRepository::from_connection(conn.clone()));
        let config = Arc::new(ConfigManager::from_connection(conn));
        config
            .set_global_config_value(crate::config::config_keys::DISCONTINUE_THRESHOLD, "35")
            .unwrap();
        let api = FormApi::new(classes.clone(), learners.clone(), config);

        let id = classes
            .insert(&ClassDraft {
                grade: Some(4),
                ..Default::default()
            })
            .unwrap();
        learners
            .replace_for_class(
                id,
                &[LearnerDraft {
                    name: "Ana".to_string(),
                    gender: "F".to_string(),
                    eng: ScoreInput::new(10, 10, 10),
                    ..Default::default()
                }],
            )
            .unwrap();

        let form = api.screening_form(id).unwrap();
        assert_eq!(form.policy.discontinue_threshold, 35);
        // 30 < 35: 不再 DISCONTINUE; 年级 4 → base 3 → Grade 2
        let ana = &form.females[0];
        assert_eq!(ana.eng.map(|p| p.starting_point), Some(StartingPoint::Grade(2)));
    }
}
