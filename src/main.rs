// ==========================================
// 卡牌评级工坊排班系统 - 命令行入口
// ==========================================
// 用法:
//   card-grading-aps [db_path] [plan_date] [--keep-existing] [--log-json]
//
// - db_path 缺省: 环境变量 CARD_GRADING_APS_DB_PATH, 否则用户数据目录
// - plan_date 缺省: 本地今日（YYYY-MM-DD）
// - --keep-existing: 不清理当日已有排班明细
// - --log-json: 日志以 JSON 行输出到 stderr
//
// 报告以 JSON 输出到 stdout, 运行失败时退出码非 0
// ==========================================

use anyhow::{anyhow, Context};
use card_grading_aps::config::ConfigManager;
use card_grading_aps::db::{ensure_schema, open_sqlite_connection};
use card_grading_aps::engine::{PlanningOrchestrator, PlanningPorts, PlanningRunOptions};
use card_grading_aps::logging;
use card_grading_aps::repository::{
    EmployeeRepository, ScheduleEntryRepository, WorkItemRepository,
};
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

/// 命令行参数
#[derive(Debug, Default, PartialEq)]
struct CliArgs {
    db_path: Option<String>,
    plan_date: Option<String>,
    keep_existing: bool,
    log_json: bool,
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> CliArgs {
    let mut cli = CliArgs::default();
    for arg in args {
        match arg.trim() {
            "--keep-existing" => cli.keep_existing = true,
            "--log-json" => cli.log_json = true,
            "" => {}
            other if cli.db_path.is_none() => cli.db_path = Some(other.to_string()),
            other if cli.plan_date.is_none() => cli.plan_date = Some(other.to_string()),
            _ => {}
        }
    }
    cli
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = parse_args(std::env::args().skip(1));

    if cli.log_json {
        logging::init_json();
    } else {
        logging::init();
    }

    let db_path = cli.db_path.unwrap_or_else(get_default_db_path);
    let plan_date = match cli.plan_date {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .with_context(|| format!("排班日期格式错误（应为 YYYY-MM-DD）: {}", raw))?,
        None => Local::now().date_naive(),
    };

    tracing::info!("==================================================");
    tracing::info!("{} v{}", card_grading_aps::APP_NAME, card_grading_aps::VERSION);
    tracing::info!("使用数据库: {}", db_path);
    tracing::info!("==================================================");

    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("无法打开数据库: {}", db_path))?;
    ensure_schema(&conn).context("初始化数据库表结构失败")?;
    let conn = Arc::new(Mutex::new(conn));

    let config = ConfigManager::from_connection(conn.clone())
        .map_err(|e| anyhow!("初始化配置管理器失败: {}", e))?;
    let ports = PlanningPorts::new(
        Arc::new(EmployeeRepository::new(conn.clone())),
        Arc::new(WorkItemRepository::new(conn.clone())),
        Arc::new(ScheduleEntryRepository::new(conn)),
    );

    let orchestrator = PlanningOrchestrator::new(Arc::new(config), ports);
    let options = PlanningRunOptions {
        clear_existing: cli.keep_existing.then_some(false),
        deadline: None,
    };
    let report = orchestrator.run(plan_date, options);

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// 获取默认数据库路径
///
/// # 返回
/// - 环境变量 CARD_GRADING_APS_DB_PATH（非空时）
/// - 用户数据目录/card-grading-aps/card_grading_aps.db
/// - 以上都不可用时: ./card_grading_aps.db
fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("CARD_GRADING_APS_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./card_grading_aps.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("card-grading-aps");
        // 目录创建失败时退回当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("card_grading_aps.db");
        }
    }

    path.to_string_lossy().to_string()
}
