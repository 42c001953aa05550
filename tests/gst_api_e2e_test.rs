// ==========================================
// GST API 端到端测试
// ==========================================
// 测试目标: AppState → ClassApi 保存 → GstApi 名册/导出 → FormApi 表格
// 覆盖范围: 年级 7 场景、屏幕名册与导出一致、文件名与 MIME、模板缺失
// ==========================================


use philiri_gst::api::ApiError;
use philiri_gst::app::AppState;
use philiri_gst::config::{config_keys, DOCX_MIME_TYPE};
use philiri_gst::domain::class::ClassDraft;
use philiri_gst::domain::roster::ResultRow;
use philiri_gst::domain::types::LanguageVariant;
use serde_json::json;
use test_helpers::create_test_db;

/// 初始化应用状态,模板目录与备用目录都指向临时目录
fn setup(template_dir: &std::path::Path) -> (tempfile::TempDir, AppState) {
    let (db_dir, db_path) = create_test_db().unwrap();
    let state = AppState::new(db_path).unwrap();
    let dir = template_dir.to_string_lossy();
    state
        .config_manager
        .set_global_config_value(config_keys::TEMPLATE_DIR, &dir)
        .unwrap();
    state
        .config_manager
        .set_global_config_value(config_keys::TEMPLATE_FALLBACK_DIR, &dir)
        .unwrap();
    (db_dir, state)
}

fn grade_seven_class(state: &AppState) -> i64 {
    let class_id = state
        .class_api
        .create_class(&ClassDraft {
            teacher: "Ms. Dela Cruz".to_string(),
            school: "Rizal NHS".to_string(),
            grade: Some(7),
            section: "Sampaguita".to_string(),
            date_text: "2025-06-03".to_string(),
            ..Default::default()
        })
        .unwrap();

    state
        .class_api
        .save_learners(
            class_id,
            &[
                json!({"name": "Pedro", "gender": "M", "eng_literal": 10, "eng_inferential": 10, "eng_critical": 9}),
                json!({"name": "Maria", "gender": "F", "eng_literal": 10, "eng_inferential": 5, "eng_critical": 5}),
                json!({"name": "Juan", "gender": "M", "eng_literal": "2", "eng_inferential": 2, "eng_critical": 1}),
                json!({"name": "Lito", "gender": "M", "took_eng": false, "fil_literal": 3}),
            ],
        )
        .unwrap();
    class_id
}

// ==========================================
// 名册测试
// ==========================================

#[test]
fn test_grade_seven_gst_roster() {
    let templates = tempfile::tempdir().unwrap();
    let (_db, state) = setup(templates.path());
    let class_id = grade_seven_class(&state);

    let rows = state.gst_api.gst_roster(class_id, LanguageVariant::English).unwrap();
    assert_eq!(
        rows,
        vec![
            ResultRow::new("Juan", "M", 5, "Grade 4"),
            ResultRow::new("Maria", "F", 20, "Grade 5"),
        ]
    );

    // Lito 只参加了菲律宾语测试
    let fil_rows = state.gst_api.gst_roster(class_id, LanguageVariant::Filipino).unwrap();
    let names: Vec<&str> = fil_rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Juan", "Lito", "Pedro", "Maria"]);
}

#[test]
fn test_screening_form_for_grade_seven() {
    let templates = tempfile::tempdir().unwrap();
    let (_db, state) = setup(templates.path());
    let class_id = grade_seven_class(&state);

    let form = state.form_api.screening_form(class_id).unwrap();
    assert_eq!(form.class.grade, 7);
    assert_eq!(form.males.len(), 3);
    assert_eq!(form.females.len(), 1);
    assert!(form.males.iter().any(|entry| entry.name == "Lito" && entry.eng.is_none()));
}

// ==========================================
// 导出测试
// ==========================================

#[cfg(feature = "docx")]
#[test]
fn test_export_gst_matches_on_screen_roster() {
    use philiri_gst::document::{DocxDocument, StructuralDocument};

    let templates = tempfile::tempdir().unwrap();
    test_helpers::write_template(
        templates.path(),
        "Portrait_Header-Footer.docx",
        &test_helpers::ENGLISH_LABELS,
        0,
    )
    .unwrap();
    let (_db, state) = setup(templates.path());
    let class_id = grade_seven_class(&state);

    let file = state.gst_api.export_gst(class_id, LanguageVariant::English).unwrap();
    assert_eq!(file.filename, format!("ENGLISH_GST_RESULTS_{}.docx", class_id));
    assert_eq!(file.mime_type, DOCX_MIME_TYPE);

    let doc = DocxDocument::from_bytes(&file.content).unwrap();
    assert_eq!(doc.row_count(1), Some(3));
    assert_eq!(doc.row_texts(1, 1).unwrap(), vec!["1", "JUAN", "M", "5", "GRADE 4"]);
    assert_eq!(doc.row_texts(1, 2).unwrap(), vec!["2", "MARIA", "F", "20", "GRADE 5"]);
    assert_eq!(doc.cell_text(0, 0, 1).as_deref(), Some("MS. DELA CRUZ"));
}

#[cfg(feature = "docx")]
#[test]
fn test_export_adhoc_uses_legacy_filename() {
    let templates = tempfile::tempdir().unwrap();
    test_helpers::write_tableless_template(templates.path(), "Portrait_Header-Footer.docx").unwrap();
    let (_db, state) = setup(templates.path());

    let meta = philiri_gst::ClassMeta {
        teacher: "T".to_string(),
        grade: 3,
        ..Default::default()
    };
    let file = state
        .gst_api
        .export_adhoc(&meta, &[ResultRow::new("Ana", "F", 3, "Grade 1")])
        .unwrap();
    assert_eq!(file.filename, "ENGLISH_GST_RESULTS.docx");
    assert!(!file.content.is_empty());
}

#[test]
fn test_export_without_template_reports_error() {
    let templates = tempfile::tempdir().unwrap();
    let (_db, state) = setup(templates.path());
    let class_id = grade_seven_class(&state);

    let result = state.gst_api.export_gst(class_id, LanguageVariant::Filipino);
    match result {
        Err(ApiError::ExportError(msg)) => assert!(!msg.is_empty()),
        other => panic!("Expected ExportError, got {:?}", other.map(|f| f.filename)),
    }
}
