// ==========================================
// Phil-IRI GST 系统 - 学习者字段映射器
// ==========================================
// 职责: 原始行 / 宽松 JSON → LearnerDraft
// 规则:
// - 姓名去空白; 性别取首字符大写（缺省 "M"）
// - 参加标志缺省为 true
// - 分项成绩强制为非负整数（无法解析 → 0,小数截断）
// ==========================================

use crate::domain::learner::{normalize_gender, LearnerDraft, ScoreInput};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::RawRecord;
use serde_json::Value;
use std::collections::HashMap;

/// 标准字段 → 可接受的列名别名（已标准化）
const FIELD_ALIASES: [(&str, &[&str]); 10] = [
    ("name", &["name", "learner_name", "learner", "pangalan", "full_name"]),
    ("gender", &["gender", "sex", "kasarian"]),
    ("took_eng", &["took_eng", "took_english"]),
    ("took_fil", &["took_fil", "took_filipino"]),
    ("eng_literal", &["eng_literal", "english_literal"]),
    ("eng_inferential", &["eng_inferential", "english_inferential"]),
    ("eng_critical", &["eng_critical", "english_critical"]),
    ("fil_literal", &["fil_literal", "filipino_literal"]),
    ("fil_inferential", &["fil_inferential", "filipino_inferential"]),
    ("fil_critical", &["fil_critical", "filipino_critical"]),
];

/// 列名标准化: 小写,非字母数字 → '_'
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect()
}

/// 文本成绩 → 非负整数
pub fn coerce_score_text(raw: &str) -> u32 {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<i64>() {
        return clamp_score(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => clamp_score(value.trunc() as i64),
        _ => 0,
    }
}

/// JSON 成绩 → 非负整数
pub fn coerce_score_value(value: &Value) -> u32 {
    match value {
        Value::Number(number) => {
            if let Some(int) = number.as_i64() {
                clamp_score(int)
            } else if let Some(uint) = number.as_u64() {
                u32::try_from(uint).unwrap_or(u32::MAX)
            } else {
                number
                    .as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| clamp_score(f.trunc() as i64))
                    .unwrap_or(0)
            }
        }
        Value::String(text) => coerce_score_text(text),
        _ => 0,
    }
}

/// 按别名查找标准字段
fn lookup<'a>(row: &HashMap<String, &'a str>, key: &str) -> Option<&'a str> {
    let aliases: &[&str] = FIELD_ALIASES
        .iter()
        .find(|(standard, _)| *standard == key)
        .map(|(_, aliases)| *aliases)
        .unwrap_or(&[]);
    aliases.iter().find_map(|alias| row.get(*alias).copied())
}

fn clamp_score(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

/// 文本标志（空值视为参加）
pub fn parse_flag_text(raw: &str) -> bool {
    match raw.trim().to_lowercase().as_str() {
        "0" | "false" | "no" | "n" | "hindi" => false,
        _ => true,
    }
}

/// JSON 标志: 缺失 → true, null → false
pub fn coerce_flag_value(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(text)) => parse_flag_text(text),
        Some(_) => true,
    }
}

// ==========================================
// LearnerFieldMapper - 学习者字段映射器
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct LearnerFieldMapper;

impl LearnerFieldMapper {
    pub fn new() -> Self {
        Self
    }

    /// 宽松 JSON（保存接口载荷）→ LearnerDraft
    pub fn learner_from_json(&self, payload: &Value) -> LearnerDraft {
        let text = |key: &str| payload.get(key).and_then(Value::as_str).unwrap_or("").to_string();
        let score = |key: &str| payload.get(key).map(coerce_score_value).unwrap_or(0);

        LearnerDraft {
            name: text("name").trim().to_string(),
            gender: normalize_gender(&text("gender")),
            took_eng: coerce_flag_value(payload.get("took_eng")),
            took_fil: coerce_flag_value(payload.get("took_fil")),
            eng: ScoreInput::new(score("eng_literal"), score("eng_inferential"), score("eng_critical")),
            fil: ScoreInput::new(score("fil_literal"), score("fil_inferential"), score("fil_critical")),
        }
    }

    /// 原始行 → LearnerDraft（姓名为空返回 None）
    pub fn map_record(&self, record: &RawRecord) -> Option<LearnerDraft> {
        let row: HashMap<String, &str> = record
            .iter()
            .map(|(header, value)| (normalize_header(header), value.as_str()))
            .collect();

        let field = |key: &str| lookup(&row, key);

        let name = field("name").unwrap_or("").trim();
        if name.is_empty() {
            return None;
        }

        let score = |key: &str| field(key).map(coerce_score_text).unwrap_or(0);
        let flag = |key: &str| field(key).map(parse_flag_text).unwrap_or(true);

        Some(LearnerDraft {
            name: name.to_string(),
            gender: normalize_gender(field("gender").unwrap_or("")),
            took_eng: flag("took_eng"),
            took_fil: flag("took_fil"),
            eng: ScoreInput::new(score("eng_literal"), score("eng_inferential"), score("eng_critical")),
            fil: ScoreInput::new(score("fil_literal"), score("fil_inferential"), score("fil_critical")),
        })
    }

    /// 批量映射
    ///
    /// # 错误
    /// - 表头中没有任何姓名列: MissingColumn("name")
    pub fn map_records(&self, records: &[RawRecord]) -> ImportResult<Vec<LearnerDraft>> {
        let has_name_column = records.iter().any(|record| {
            record
                .keys()
                .map(|header| normalize_header(header))
                .any(|header| FIELD_ALIASES[0].1.contains(&header.as_str()))
        });
        if !records.is_empty() && !has_name_column {
            return Err(ImportError::MissingColumn("name".to_string()));
        }

        let drafts: Vec<LearnerDraft> = records.iter().filter_map(|r| self.map_record(r)).collect();
        if drafts.len() < records.len() {
            tracing::debug!(skipped = records.len() - drafts.len(), "跳过姓名为空的行");
        }
        Ok(drafts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, &str)]) -> RawRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_score_coercion() {
        assert_eq!(coerce_score_text(" 12 "), 12);
        assert_eq!(coerce_score_text("7.9"), 7);
        assert_eq!(coerce_score_text("-3"), 0);
        assert_eq!(coerce_score_text("abc"), 0);
        assert_eq!(coerce_score_value(&json!(9)), 9);
        assert_eq!(coerce_score_value(&json!(4.6)), 4);
        assert_eq!(coerce_score_value(&json!("10")), 10);
        assert_eq!(coerce_score_value(&json!(null)), 0);
        assert_eq!(coerce_score_value(&json!(-1)), 0);
    }

    #[test]
    fn test_flag_parsing() {
        assert!(parse_flag_text(""));
        assert!(parse_flag_text("Yes"));
        assert!(parse_flag_text("oo"));
        assert!(!parse_flag_text("0"));
        assert!(!parse_flag_text("Hindi"));
        assert!(coerce_flag_value(None));
        assert!(!coerce_flag_value(Some(&json!(null))));
        assert!(!coerce_flag_value(Some(&json!(false))));
        assert!(coerce_flag_value(Some(&json!(1))));
    }

    #[test]
    fn test_learner_from_json_is_lenient() {
        let draft = LearnerFieldMapper::new().learner_from_json(&json!({
            "name": "  Juan ",
            "gender": "male",
            "took_fil": false,
            "eng_literal": "8",
            "eng_inferential": 6.5,
            "eng_critical": "x"
        }));

        assert_eq!(draft.name, "Juan");
        assert_eq!(draft.gender, "M");
        assert!(draft.took_eng);
        assert!(!draft.took_fil);
        assert_eq!(draft.eng, ScoreInput::new(8, 6, 0));
        assert_eq!(draft.fil, ScoreInput::default());
    }

    #[test]
    fn test_map_record_with_aliases() {
        let mapper = LearnerFieldMapper::new();
        let draft = mapper
            .map_record(&record(&[
                ("Pangalan", "Maria Clara"),
                ("Kasarian", "f"),
                ("Took English", "no"),
                ("FIL Literal", "5"),
            ]))
            .unwrap();

        assert_eq!(draft.name, "Maria Clara");
        assert_eq!(draft.gender, "F");
        assert!(!draft.took_eng);
        assert!(draft.took_fil);
        assert_eq!(draft.fil.literal, 5);
    }

    #[test]
    fn test_map_records_skips_blank_names_and_requires_name_column() {
        let mapper = LearnerFieldMapper::new();
        let drafts = mapper
            .map_records(&[record(&[("name", "A"), ("gender", "")]), record(&[("name", ""), ("gender", "F")])])
            .unwrap();
        assert_eq!(drafts.len(), 1);
        assert_eq!(drafts[0].gender, "M");

        let result = mapper.map_records(&[record(&[("student", "A")])]);
        assert!(matches!(result, Err(ImportError::MissingColumn(col)) if col == "name"));
    }
}
