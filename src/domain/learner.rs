// ==========================================
// Phil-IRI GST 系统 - 学习者领域模型
// ==========================================
// 对齐: schema learner 表
// 说明: 英语/菲律宾语各有一组独立分项成绩
// ==========================================

use crate::domain::types::LanguageVariant;
use serde::{Deserialize, Serialize};

// ==========================================
// ScoreInput - 分项成绩
// ==========================================
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreInput {
    pub literal: u32,     // 字面理解
    pub inferential: u32, // 推理理解
    pub critical: u32,    // 批判理解
}

impl ScoreInput {
    pub fn new(literal: u32, inferential: u32, critical: u32) -> Self {
        Self {
            literal,
            inferential,
            critical,
        }
    }

    /// 总分（饱和加法,不会溢出）
    pub fn total(&self) -> u32 {
        self.literal
            .saturating_add(self.inferential)
            .saturating_add(self.critical)
    }
}

// ==========================================
// Learner - 学习者记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Learner {
    pub id: i64,
    pub class_id: i64,
    pub name: String,
    pub gender: String, // 单个大写字母
    pub took_eng: bool,
    pub took_fil: bool,
    pub eng: ScoreInput,
    pub fil: ScoreInput,
}

impl Learner {
    /// 是否参加了该语言版本的测试
    pub fn took(&self, variant: LanguageVariant) -> bool {
        match variant {
            LanguageVariant::English => self.took_eng,
            LanguageVariant::Filipino => self.took_fil,
        }
    }

    /// 该语言版本的分项成绩
    pub fn scores(&self, variant: LanguageVariant) -> &ScoreInput {
        match variant {
            LanguageVariant::English => &self.eng,
            LanguageVariant::Filipino => &self.fil,
        }
    }
}

// ==========================================
// LearnerDraft - 学习者保存输入（已清洗）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerDraft {
    pub name: String,
    pub gender: String,
    pub took_eng: bool,
    pub took_fil: bool,
    pub eng: ScoreInput,
    pub fil: ScoreInput,
}

impl Default for LearnerDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            gender: "M".to_string(),
            took_eng: true,
            took_fil: true,
            eng: ScoreInput::default(),
            fil: ScoreInput::default(),
        }
    }
}

/// 性别标准化: 取首字符并大写（缺省 "M"）
pub fn normalize_gender(raw: &str) -> String {
    raw.trim()
        .chars()
        .next()
        .map(|c| c.to_uppercase().collect::<String>())
        .unwrap_or_else(|| "M".to_string())
}
