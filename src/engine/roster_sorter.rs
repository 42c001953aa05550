// ==========================================
// Phil-IRI GST 系统 - 名册排序引擎
// ==========================================
// 职责: 名册行的确定性排序（屏幕显示与文档导出共用）
// 排序键: (性别分组, 去空白大写姓名)
// 红线: 稳定排序,同键保持输入顺序
// ==========================================

use crate::domain::learner::Learner;
use crate::domain::roster::{FormEntry, ResultRow};
use crate::domain::types::GenderBucket;

// ==========================================
// RosterKey - 可排序的名册条目
// ==========================================
pub trait RosterKey {
    fn display_name(&self) -> &str;
    fn gender_text(&self) -> &str;
}

impl RosterKey for ResultRow {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn gender_text(&self) -> &str {
        &self.gender
    }
}

impl RosterKey for Learner {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn gender_text(&self) -> &str {
        &self.gender
    }
}

impl RosterKey for FormEntry {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn gender_text(&self) -> &str {
        &self.gender
    }
}

// ==========================================
// RosterSorter - 名册排序引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct RosterSorter {
    // 无状态引擎,不需要注入依赖
}

impl RosterSorter {
    pub fn new() -> Self {
        Self {}
    }

    /// 排序键
    pub fn sort_key<T: RosterKey>(entry: &T) -> (GenderBucket, String) {
        (
            GenderBucket::from_text(entry.gender_text()),
            entry.display_name().trim().to_uppercase(),
        )
    }

    /// 排序名册（稳定排序）
    ///
    /// 排序键:
    /// 1) 性别分组: M → 0, F → 1, 其他 → 2
    /// 2) 姓名: trim + 大写
    pub fn sort<T: RosterKey>(&self, mut rows: Vec<T>) -> Vec<T> {
        // sort_by_cached_key 为稳定排序
        rows.sort_by_cached_key(|row| Self::sort_key(row));
        rows
    }
}
