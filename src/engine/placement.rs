// ==========================================
// Phil-IRI GST 系统 - 起始点判定引擎
// ==========================================
// 红线: 起始点是"等级制",高分永远不会得到更低的起始年级
// ==========================================
// 职责: 分项成绩 → 总分; 总分 + 年级 → 起始点
// 输入: ScoreInput + 班级年级
// 输出: PlacementResult (不落库,每次查看/导出重新计算)
// ==========================================

use crate::config::placement_policy::PlacementPolicy;
use crate::domain::learner::ScoreInput;
use crate::domain::roster::PlacementResult;
use crate::domain::types::StartingPoint;
use tracing::instrument;

// ==========================================
// PlacementEngine - 起始点判定引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct PlacementEngine {
    policy: PlacementPolicy,
}

impl PlacementEngine {
    /// 创建判定引擎（阈值策略不可变）
    pub fn new(policy: PlacementPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &PlacementPolicy {
        &self.policy
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算总分
    ///
    /// 缺失值按 0 计; 不会失败; 结果 >= 0
    pub fn compute_total(literal: Option<u32>, inferential: Option<u32>, critical: Option<u32>) -> u32 {
        ScoreInput::new(
            literal.unwrap_or(0),
            inferential.unwrap_or(0),
            critical.unwrap_or(0),
        )
        .total()
    }

    /// 判定起始点
    ///
    /// 规则（顺序执行,命中即返回）:
    /// 1) total >= discontinue_threshold → DISCONTINUE
    /// 2) base = max(1, grade - 1)
    /// 3) total >= one_below_threshold → Grade max(1, base - 1)
    /// 4) 其他 → Grade max(1, base - 2)
    ///
    /// 边界处理:
    /// - grade 越界不报错,调用方负责夹紧; 引擎内部同样按 1 取下限
    pub fn starting_point_for(&self, grade: i64, total: u32) -> StartingPoint {
        if total >= self.policy.discontinue_threshold {
            return StartingPoint::Discontinue;
        }

        let base = grade.saturating_sub(1).max(1);
        let level = if total >= self.policy.one_below_threshold {
            base.saturating_sub(1).max(1)
        } else {
            base.saturating_sub(2).max(1)
        };

        StartingPoint::Grade(level.min(i64::from(u8::MAX)) as u8)
    }

    /// 单个学习者判定
    #[instrument(skip(self), level = "trace")]
    pub fn evaluate(&self, grade: i64, scores: &ScoreInput) -> PlacementResult {
        let total = scores.total();
        PlacementResult {
            total,
            starting_point: self.starting_point_for(grade, total),
        }
    }
}
