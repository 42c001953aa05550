// ==========================================
// 名册导入集成测试
// ==========================================
// 测试目标: CSV 名册文件 → ClassApi.import_learners → 名册/表格
// 覆盖范围: 列名别名、空行跳过、宽松数值、缺少姓名列、格式不支持
// ==========================================


use philiri_gst::api::ApiError;
use philiri_gst::app::AppState;
use philiri_gst::domain::class::ClassDraft;
use philiri_gst::domain::types::LanguageVariant;
use std::io::Write;
use std::path::PathBuf;
use test_helpers::create_test_db;

fn write_csv(dir: &std::path::Path, name: &str, lines: &[&str]) -> PathBuf {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    for line in lines {
        writeln!(file, "{}", line).unwrap();
    }
    path
}

fn setup() -> (tempfile::TempDir, AppState, i64) {
    let (dir, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();
    let class_id = state
        .class_api
        .create_class(&ClassDraft {
            grade: Some(5),
            ..Default::default()
        })
        .unwrap();
    (dir, state, class_id)
}

#[test]
fn test_import_csv_roster_with_aliases() {
    let (dir, state, class_id) = setup();
    let path = write_csv(
        dir.path(),
        "roster.csv",
        &[
            "Pangalan,Kasarian,Took English,ENG Literal,ENG Inferential,ENG Critical",
            "Ana Cruz,Female,yes,8,8,4",
            ",,,,,",
            "Ben Lim,M,,3,abc,1.9",
            "Cora Diaz,F,no,10,10,10",
        ],
    );

    let saved = state.class_api.import_learners(class_id, &path).unwrap();
    assert_eq!(saved, 3);

    // 年级 5: base 4; 20 → Grade 3; 4 → Grade 2; Cora 未参加英语
    let rows = state.gst_api.gst_roster(class_id, LanguageVariant::English).unwrap();
    let summary: Vec<(String, u32, String)> = rows
        .into_iter()
        .map(|r| (r.name, r.score, r.start))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Ben Lim".to_string(), 4, "Grade 2".to_string()),
            ("Ana Cruz".to_string(), 20, "Grade 3".to_string()),
        ]
    );
}

#[test]
fn test_import_replaces_previous_roster() {
    let (dir, state, class_id) = setup();
    let first = write_csv(dir.path(), "first.csv", &["name,gender", "A,M", "B,F"]);
    let second = write_csv(dir.path(), "second.csv", &["name,gender", "C,F"]);

    state.class_api.import_learners(class_id, &first).unwrap();
    state.class_api.import_learners(class_id, &second).unwrap();

    let learners = state.class_api.list_learners(class_id).unwrap();
    assert_eq!(learners.len(), 1);
    assert_eq!(learners[0].name, "C");
}

#[test]
fn test_import_errors() {
    let (dir, state, class_id) = setup();

    let no_name = write_csv(dir.path(), "no_name.csv", &["student,gender", "A,M"]);
    let result = state.class_api.import_learners(class_id, &no_name);
    assert!(matches!(result, Err(ApiError::ValidationError(_))));

    let text = write_csv(dir.path(), "roster.txt", &["name", "A"]);
    let result = state.class_api.import_learners(class_id, &text);
    assert!(matches!(result, Err(ApiError::ImportError(_))));

    let result = state.class_api.import_learners(class_id + 100, &text);
    assert!(matches!(result, Err(ApiError::NotFound(_))));

    // 失败的导入不改动已有名册
    assert!(state.class_api.list_learners(class_id).unwrap().is_empty());
}
