// ==========================================
// Phil-IRI GST 系统 - 领域类型定义
// ==========================================
// 依据: Phil-IRI 小组筛查测试 (GST) 判定规则
// 红线: 起始点是"等级制",不是评分制
// ==========================================

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 语言版本 (Language Variant)
// ==========================================
// 英语/菲律宾语两套独立的分项成绩与模板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LanguageVariant {
    English,  // 英语
    Filipino, // 菲律宾语
}

impl LanguageVariant {
    /// 全部语言版本（固定顺序）
    pub const ALL: [LanguageVariant; 2] = [LanguageVariant::English, LanguageVariant::Filipino];

    /// 短代码（用于命令行/路由）
    pub fn code(&self) -> &'static str {
        match self {
            LanguageVariant::English => "en",
            LanguageVariant::Filipino => "fil",
        }
    }

    /// 解析命令行语言选择: 单个版本代码,或 "all" 表示全部版本
    pub fn parse_selection(raw: &str) -> Result<Vec<LanguageVariant>, String> {
        if raw.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::ALL.to_vec());
        }
        raw.parse().map(|variant| vec![variant])
    }
}

impl fmt::Display for LanguageVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LanguageVariant::English => write!(f, "ENGLISH"),
            LanguageVariant::Filipino => write!(f, "FILIPINO"),
        }
    }
}

impl FromStr for LanguageVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if let Some(variant) = Self::ALL.into_iter().find(|v| v.code() == normalized) {
            return Ok(variant);
        }
        match normalized.as_str() {
            "eng" | "english" => Ok(LanguageVariant::English),
            "filipino" => Ok(LanguageVariant::Filipino),
            other => Err(format!("未知语言版本: {}", other)),
        }
    }
}

// ==========================================
// 性别分组 (Gender Bucket)
// ==========================================
// 排序顺序: Male < Female < Other
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GenderBucket {
    Male,   // "M" 开头
    Female, // "F" 开头
    Other,  // 其他
}

impl GenderBucket {
    /// 由性别文本判定分组（去空白 + 大写后按首字母）
    pub fn from_text(gender: &str) -> Self {
        let normalized = gender.trim().to_uppercase();
        if normalized.starts_with('M') {
            GenderBucket::Male
        } else if normalized.starts_with('F') {
            GenderBucket::Female
        } else {
            GenderBucket::Other
        }
    }
}

// ==========================================
// 起始点 (Starting Point)
// ==========================================
// 取值: DISCONTINUE 或 Grade N (N >= 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StartingPoint {
    Discontinue, // 成绩达标,停止继续筛查
    Grade(u8),   // 从第 N 年级阅读材料开始
}

impl StartingPoint {
    /// 文本标签 "DISCONTINUE" 定义
    pub const DISCONTINUE_LABEL: &'static str = "DISCONTINUE";

    pub fn is_discontinue(&self) -> bool {
        matches!(self, StartingPoint::Discontinue)
    }

    /// 起始年级（DISCONTINUE 返回 None）
    pub fn grade_level(&self) -> Option<u8> {
        match self {
            StartingPoint::Discontinue => None,
            StartingPoint::Grade(level) => Some(*level),
        }
    }

    /// 显示标签
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StartingPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StartingPoint::Discontinue => write!(f, "{}", Self::DISCONTINUE_LABEL),
            StartingPoint::Grade(level) => write!(f, "Grade {}", level),
        }
    }
}

impl Serialize for StartingPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_bucket_from_text() {
        assert_eq!(GenderBucket::from_text("M"), GenderBucket::Male);
        assert_eq!(GenderBucket::from_text(" male "), GenderBucket::Male);
        assert_eq!(GenderBucket::from_text("f"), GenderBucket::Female);
        assert_eq!(GenderBucket::from_text(""), GenderBucket::Other);
        assert_eq!(GenderBucket::from_text("X"), GenderBucket::Other);
        assert!(GenderBucket::Male < GenderBucket::Female);
        assert!(GenderBucket::Female < GenderBucket::Other);
    }

    #[test]
    fn test_starting_point_display() {
        assert_eq!(StartingPoint::Discontinue.to_string(), "DISCONTINUE");
        assert_eq!(StartingPoint::Grade(5).to_string(), "Grade 5");
        assert_eq!(StartingPoint::Grade(1).grade_level(), Some(1));
        assert_eq!(StartingPoint::Discontinue.grade_level(), None);
    }

    #[test]
    fn test_language_variant_parse() {
        assert_eq!("en".parse::<LanguageVariant>(), Ok(LanguageVariant::English));
        assert_eq!(" FIL ".parse::<LanguageVariant>(), Ok(LanguageVariant::Filipino));
        assert!("es".parse::<LanguageVariant>().is_err());
        for variant in LanguageVariant::ALL {
            assert_eq!(variant.code().parse::<LanguageVariant>(), Ok(variant));
        }
    }

    #[test]
    fn test_language_variant_selection() {
        assert_eq!(
            LanguageVariant::parse_selection(" ALL "),
            Ok(vec![LanguageVariant::English, LanguageVariant::Filipino])
        );
        assert_eq!(LanguageVariant::parse_selection("fil"), Ok(vec![LanguageVariant::Filipino]));
        assert!(LanguageVariant::parse_selection("both").is_err());
        assert_eq!(LanguageVariant::Filipino.to_string(), "FILIPINO");
    }
}
