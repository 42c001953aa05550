// ==========================================
// Phil-IRI GST 系统 - 班级领域模型
// ==========================================
// 对齐: schema class 表
// 红线: grade 在每个写入点夹紧到 [1, 12]
// ==========================================

use serde::{Deserialize, Serialize};

/// 年级下限
pub const MIN_GRADE: i64 = 1;
/// 年级上限
pub const MAX_GRADE: i64 = 12;
/// 缺省年级
pub const DEFAULT_GRADE: i64 = 7;
/// 缺省筛查等级标签
pub const DEFAULT_SCREENING_LEVEL: &str = "GST";

/// 年级夹紧到 [1, 12]
pub fn clamp_grade(grade: i64) -> u8 {
    grade.clamp(MIN_GRADE, MAX_GRADE) as u8
}

// ==========================================
// ClassRecord - 班级记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassRecord {
    pub id: i64,
    pub teacher: String,
    pub school: String,
    pub grade: u8, // 已夹紧
    pub section: String,
    pub screening_level_eng: String, // 英语筛查等级
    pub screening_level_fil: String, // 菲律宾语筛查等级
    pub date_text: String,           // 日期（自由文本）
}

impl ClassRecord {
    /// 提取导出所需的表头信息
    pub fn meta(&self) -> ClassMeta {
        ClassMeta {
            teacher: self.teacher.clone(),
            school: self.school.clone(),
            grade: self.grade,
            section: self.section.clone(),
            date_text: self.date_text.clone(),
        }
    }
}

// ==========================================
// ClassDraft - 班级新建/更新输入
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassDraft {
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub grade: Option<i64>,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub screening_level_eng: String,
    #[serde(default)]
    pub screening_level_fil: String,
    #[serde(default)]
    pub date_text: String,
}

impl ClassDraft {
    /// 标准化: 文本去空白 + 年级夹紧（缺省 7）
    pub fn normalized(&self) -> ClassDraft {
        ClassDraft {
            teacher: self.teacher.trim().to_string(),
            school: self.school.trim().to_string(),
            grade: Some(clamp_grade(self.grade.unwrap_or(DEFAULT_GRADE)) as i64),
            section: self.section.trim().to_string(),
            screening_level_eng: self.screening_level_eng.trim().to_string(),
            screening_level_fil: self.screening_level_fil.trim().to_string(),
            date_text: self.date_text.trim().to_string(),
        }
    }

    /// 夹紧后的年级
    pub fn clamped_grade(&self) -> u8 {
        clamp_grade(self.grade.unwrap_or(DEFAULT_GRADE))
    }
}

// ==========================================
// ClassMeta - 文档表头字段
// ==========================================
// 测试类型标签由语言版本提供,不在此结构内
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClassMeta {
    #[serde(default)]
    pub teacher: String,
    #[serde(default)]
    pub school: String,
    #[serde(default = "default_meta_grade")]
    pub grade: u8,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub date_text: String,
}

fn default_meta_grade() -> u8 {
    DEFAULT_GRADE as u8
}
