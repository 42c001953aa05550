// ==========================================
// Phil-IRI GST 系统 - 判定阈值策略
// ==========================================
// 职责: 判定引擎所需的不可变阈值配置
// 缺省: 满分 40 / 停止阈值 28 / 低一级阈值 16
// ==========================================

use serde::{Deserialize, Serialize};

/// 缺省满分
pub const DEFAULT_ITEMS_TOTAL: u32 = 40;
/// 缺省停止阈值（>= 即 DISCONTINUE）
pub const DEFAULT_DISCONTINUE_THRESHOLD: u32 = 28;
/// 缺省低一级阈值（16..27 从低一级开始, 0..15 从低两级开始）
pub const DEFAULT_ONE_BELOW_THRESHOLD: u32 = 16;

// ==========================================
// PlacementPolicy - 判定阈值
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementPolicy {
    pub items_total: u32,
    pub discontinue_threshold: u32,
    pub one_below_threshold: u32,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            items_total: DEFAULT_ITEMS_TOTAL,
            discontinue_threshold: DEFAULT_DISCONTINUE_THRESHOLD,
            one_below_threshold: DEFAULT_ONE_BELOW_THRESHOLD,
        }
    }
}

impl PlacementPolicy {
    /// 构造并校验
    ///
    /// # 约束
    /// one_below_threshold <= discontinue_threshold <= items_total
    pub fn new(items_total: u32, discontinue_threshold: u32, one_below_threshold: u32) -> Result<Self, String> {
        let policy = Self {
            items_total,
            discontinue_threshold,
            one_below_threshold,
        };
        policy.validate()?;
        Ok(policy)
    }

    /// 校验阈值顺序
    pub fn validate(&self) -> Result<(), String> {
        if self.one_below_threshold > self.discontinue_threshold {
            return Err(format!(
                "one_below_threshold={} 大于 discontinue_threshold={}",
                self.one_below_threshold, self.discontinue_threshold
            ));
        }
        if self.discontinue_threshold > self.items_total {
            return Err(format!(
                "discontinue_threshold={} 大于 items_total={}",
                self.discontinue_threshold, self.items_total
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = PlacementPolicy::default();
        assert_eq!(policy.items_total, 40);
        assert_eq!(policy.discontinue_threshold, 28);
        assert_eq!(policy.one_below_threshold, 16);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn test_policy_rejects_inverted_thresholds() {
        assert!(PlacementPolicy::new(40, 10, 20).is_err());
        assert!(PlacementPolicy::new(20, 28, 16).is_err());
        assert!(PlacementPolicy::new(50, 35, 20).is_ok());
    }
}
