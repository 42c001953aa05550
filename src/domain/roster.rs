// ==========================================
// Phil-IRI GST 系统 - 名册领域模型
// ==========================================
// 职责: 判定结果 / 导出行 / 表格行的数据结构
// 红线: 判定结果是派生数据,不落库
// ==========================================

use crate::domain::types::StartingPoint;
use serde::{Deserialize, Serialize};

// ==========================================
// PlacementResult - 判定结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacementResult {
    pub total: u32,
    pub starting_point: StartingPoint,
}

// ==========================================
// ResultRow - 结果名册行
// ==========================================
// 每次导出请求临时构建
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    pub name: String,
    pub gender: String,
    pub score: u32,
    pub start: String,
}

impl ResultRow {
    pub fn new(name: impl Into<String>, gender: impl Into<String>, score: u32, start: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gender: gender.into(),
            score,
            start: start.into(),
        }
    }
}

// ==========================================
// FormEntry - 筛查表格行 (Form 1A/1B)
// ==========================================
// 未参加某语言测试时对应字段为 None
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormEntry {
    pub learner_id: i64,
    pub name: String,
    pub gender: String,
    pub eng: Option<PlacementResult>,
    pub fil: Option<PlacementResult>,
}
