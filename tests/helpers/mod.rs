// ==========================================
// 集成测试公共辅助
// ==========================================

#![allow(dead_code)]

pub mod memory_ports;
pub mod test_data_builder;

use card_grading_aps::db::{ensure_schema, open_sqlite_connection};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tempfile::NamedTempFile;

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - Arc<Mutex<Connection>>: 共享连接
pub fn create_test_db() -> (NamedTempFile, Arc<Mutex<Connection>>) {
    let temp_file = NamedTempFile::new().expect("创建临时文件失败");
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = open_sqlite_connection(&db_path).expect("打开数据库失败");
    ensure_schema(&conn).expect("初始化 schema 失败");

    (temp_file, Arc::new(Mutex::new(conn)))
}
