// ==========================================
// Phil-IRI GST 系统 - 名册构建引擎
// ==========================================
// 职责: 学习者记录 → GST 结果名册 / 筛查表格数据
// 红线: DISCONTINUE 的学习者不出现在结果名册中（屏幕与导出一致）
// ==========================================

use crate::domain::learner::Learner;
use crate::domain::roster::{FormEntry, ResultRow};
use crate::domain::types::{GenderBucket, LanguageVariant};
use crate::engine::placement::PlacementEngine;
use crate::engine::roster_sorter::RosterSorter;
use tracing::instrument;

// ==========================================
// RosterBuilder - 名册构建引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct RosterBuilder {
    engine: PlacementEngine,
    sorter: RosterSorter,
}

impl RosterBuilder {
    pub fn new(engine: PlacementEngine) -> Self {
        Self {
            engine,
            sorter: RosterSorter::new(),
        }
    }

    pub fn engine(&self) -> &PlacementEngine {
        &self.engine
    }

    /// 构建 GST 结果名册
    ///
    /// 流程:
    /// 1) 跳过未参加该语言测试的学习者
    /// 2) 计算总分与起始点（使用班级年级）
    /// 3) 剔除 DISCONTINUE
    /// 4) 按名册规则排序
    #[instrument(skip(self, learners), fields(count = learners.len()))]
    pub fn build_gst_rows(&self, grade: u8, learners: &[Learner], variant: LanguageVariant) -> Vec<ResultRow> {
        let mut discontinued = 0usize;
        let rows: Vec<ResultRow> = learners
            .iter()
            .filter(|learner| learner.took(variant))
            .filter_map(|learner| {
                let result = self.engine.evaluate(i64::from(grade), learner.scores(variant));
                if result.starting_point.is_discontinue() {
                    discontinued += 1;
                    return None;
                }
                Some(ResultRow {
                    name: learner.name.clone(),
                    gender: learner.gender.clone(),
                    score: result.total,
                    start: result.starting_point.label(),
                })
            })
            .collect();

        tracing::debug!(rows = rows.len(), discontinued, %variant, "GST 名册构建完成");
        self.sorter.sort(rows)
    }

    /// 构建筛查表格数据（男/女分列）
    ///
    /// # 说明
    /// - 男: 性别以 M 开头; 女: 以 F 开头; 其他不进入任一列
    /// - 每个学习者按参加的语言测试分别给出判定结果
    pub fn build_form_entries(&self, grade: u8, learners: &[Learner]) -> (Vec<FormEntry>, Vec<FormEntry>) {
        let mut males = Vec::new();
        let mut females = Vec::new();

        for learner in learners {
            let placement = |variant: LanguageVariant| {
                learner
                    .took(variant)
                    .then(|| self.engine.evaluate(i64::from(grade), learner.scores(variant)))
            };
            let entry = FormEntry {
                learner_id: learner.id,
                name: learner.name.clone(),
                gender: learner.gender.clone(),
                eng: placement(LanguageVariant::English),
                fil: placement(LanguageVariant::Filipino),
            };

            match GenderBucket::from_text(&learner.gender) {
                GenderBucket::Male => males.push(entry),
                GenderBucket::Female => females.push(entry),
                GenderBucket::Other => {
                    tracing::debug!(learner_id = learner.id, gender = %learner.gender, "性别未识别,不进入筛查表格");
                }
            }
        }

        (males, females)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::learner::ScoreInput;
    use crate::domain::types::StartingPoint;

    fn learner(id: i64, name: &str, gender: &str, eng: ScoreInput, took_fil: bool) -> Learner {
        Learner {
            id,
            class_id: 1,
            name: name.to_string(),
            gender: gender.to_string(),
            took_eng: true,
            took_fil,
            eng,
            fil: ScoreInput::new(1, 1, 1),
        }
    }

    #[test]
    fn test_gst_rows_drop_discontinue_and_sort() {
        let builder = RosterBuilder::default();
        let learners = vec![
            learner(1, "Ana", "F", ScoreInput::new(10, 10, 9), true),
            learner(2, "Maria", "F", ScoreInput::new(8, 6, 6), true),
            learner(3, "Juan", "M", ScoreInput::new(2, 2, 1), true),
        ];

        let rows = builder.build_gst_rows(7, &learners, LanguageVariant::English);
        assert_eq!(
            rows,
            vec![
                ResultRow::new("Juan", "M", 5, "Grade 4"),
                ResultRow::new("Maria", "F", 20, "Grade 5"),
            ]
        );
    }

    #[test]
    fn test_gst_rows_skip_learners_who_did_not_take_test() {
        let builder = RosterBuilder::default();
        let learners = vec![
            learner(1, "Ana", "F", ScoreInput::default(), false),
            learner(2, "Ben", "M", ScoreInput::default(), true),
        ];

        let rows = builder.build_gst_rows(4, &learners, LanguageVariant::Filipino);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].name, "Ben");
        assert_eq!(rows[0].score, 3);
        assert_eq!(rows[0].start, "Grade 1");
    }

    #[test]
    fn test_form_entries_split_by_gender() {
        let builder = RosterBuilder::default();
        let learners = vec![
            learner(1, "Ana", "F", ScoreInput::new(10, 10, 10), false),
            learner(2, "Ben", "M", ScoreInput::new(5, 5, 5), true),
            learner(3, "Kit", "X", ScoreInput::default(), true),
        ];

        let (males, females) = builder.build_form_entries(7, &learners);
        assert_eq!(males.len(), 1);
        assert_eq!(females.len(), 1);
        assert_eq!(females[0].eng.map(|r| r.starting_point), Some(StartingPoint::Discontinue));
        assert_eq!(females[0].fil, None);
        assert_eq!(males[0].eng.map(|r| r.total), Some(15));
    }
}
