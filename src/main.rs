// ==========================================
// Phil-IRI GST 系统 - 命令行入口
// ==========================================
// 用法:
//   philiri-gst init
//   philiri-gst import <class_id> <file>
//   philiri-gst export <class_id> <en|fil|all> [out_dir]
// 数据库: PHILIRI_GST_DB_PATH 或用户数据目录
// ==========================================

use std::error::Error;
use std::path::{Path, PathBuf};

use philiri_gst::app::{get_default_db_path, AppState};
use philiri_gst::domain::types::LanguageVariant;
use philiri_gst::logging;

const USAGE: &str = "用法:
  philiri-gst init
  philiri-gst import <class_id> <file>
  philiri-gst export <class_id> <en|fil|all> [out_dir]";

fn main() {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if let Err(e) = run(&args) {
        tracing::error!("命令执行失败: {}", e);
        eprintln!("错误: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<(), Box<dyn Error>> {
    let Some(command) = args.first() else {
        println!("{}", USAGE);
        return Ok(());
    };

    let db_path = get_default_db_path();
    tracing::info!("{} v{} - 使用数据库: {}", philiri_gst::APP_NAME, philiri_gst::VERSION, db_path);
    let state = AppState::new(db_path)?;

    match (command.as_str(), &args[1..]) {
        ("init", []) => {
            for class in state.class_api.list_classes()? {
                println!("班级 #{}: 年级 {} {}", class.id, class.grade, class.section);
            }
        }
        ("import", [class_id, file]) => {
            let class_id = parse_class_id(class_id)?;
            let saved = state.class_api.import_learners(class_id, Path::new(file))?;
            println!("已导入 {} 名学习者到班级 #{}", saved, class_id);
        }
        ("export", [class_id, variant, rest @ ..]) if rest.len() <= 1 => {
            let class_id = parse_class_id(class_id)?;
            let variants = LanguageVariant::parse_selection(variant)?;
            let out_dir = rest.first().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
            std::fs::create_dir_all(&out_dir)?;

            for variant in variants {
                let file = state.gst_api.export_gst(class_id, variant)?;
                let target = out_dir.join(&file.filename);
                std::fs::write(&target, &file.content)?;
                println!("{}", target.display());
            }
        }
        _ => {
            return Err(format!("无法识别的命令: {}\n{}", args.join(" "), USAGE).into());
        }
    }

    Ok(())
}

fn parse_class_id(raw: &str) -> Result<i64, Box<dyn Error>> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| format!("班级ID必须是整数: {}", raw).into())
}
