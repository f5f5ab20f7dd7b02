// ==========================================
// 卡牌评级工坊排班系统 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::planning_config::{
    hm, DEFAULT_BREAK_MINUTES, DEFAULT_MINUTES_PER_CARD, DEFAULT_SCAN_MINUTES_PER_ORDER,
    DEFAULT_WORKDAY_END, DEFAULT_WORKDAY_START,
};
use crate::config::planning_config_trait::PlanningConfigReader;
use crate::db::open_sqlite_connection;
use chrono::NaiveTime;
use rusqlite::{params, Connection};
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(e)),
        }
    }

    /// 写入 global scope 的配置值（UPSERT）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = ?2",
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取 i64 配置，缺失或格式错误时回退默认值
    fn get_i64_or_default(&self, key: &str, default: i64) -> Result<i64, Box<dyn Error>> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => Ok(raw.trim().parse::<i64>().unwrap_or_else(|_| {
                tracing::warn!(config_key = key, raw_value = %raw, "配置格式错误，使用默认值");
                default
            })),
        }
    }

    /// 读取 HH:MM 时间配置，缺失或格式错误时回退默认值
    fn get_time_or_default(&self, key: &str, default: NaiveTime) -> Result<NaiveTime, Box<dyn Error>> {
        match self.get_config_value(key)? {
            None => Ok(default),
            Some(raw) => Ok(NaiveTime::parse_from_str(raw.trim(), "%H:%M").unwrap_or_else(|_| {
                tracing::warn!(config_key = key, raw_value = %raw, "时间配置格式错误，使用默认值");
                default
            })),
        }
    }
}

// ==========================================
// PlanningConfigReader Trait 实现
// ==========================================
impl PlanningConfigReader for ConfigManager {
    fn get_workday_start(&self) -> Result<NaiveTime, Box<dyn Error>> {
        self.get_time_or_default(config_keys::WORKDAY_START, hm(DEFAULT_WORKDAY_START))
    }

    fn get_workday_end(&self) -> Result<NaiveTime, Box<dyn Error>> {
        self.get_time_or_default(config_keys::WORKDAY_END, hm(DEFAULT_WORKDAY_END))
    }

    fn get_break_minutes(&self) -> Result<i64, Box<dyn Error>> {
        self.get_i64_or_default(config_keys::BREAK_MINUTES, DEFAULT_BREAK_MINUTES)
    }

    fn get_minutes_per_card(&self) -> Result<i64, Box<dyn Error>> {
        self.get_i64_or_default(config_keys::MINUTES_PER_CARD, DEFAULT_MINUTES_PER_CARD)
    }

    fn get_scan_minutes_per_order(&self) -> Result<i64, Box<dyn Error>> {
        self.get_i64_or_default(config_keys::SCAN_MINUTES_PER_ORDER, DEFAULT_SCAN_MINUTES_PER_ORDER)
    }

    fn get_clear_existing_entries(&self) -> Result<bool, Box<dyn Error>> {
        let value = self.get_config_value(config_keys::CLEAR_EXISTING_ENTRIES)?;
        Ok(match value.as_deref().map(|v| v.trim().to_lowercase()) {
            None => true,
            Some(v) => matches!(v.as_str(), "1" | "true" | "yes" | "y" | "on"),
        })
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 工作时段
    pub const WORKDAY_START: &str = "workday_start";
    pub const WORKDAY_END: &str = "workday_end";
    pub const BREAK_MINUTES: &str = "break_minutes";

    // 工时口径
    pub const MINUTES_PER_CARD: &str = "minutes_per_card";
    pub const SCAN_MINUTES_PER_ORDER: &str = "scan_minutes_per_order";

    // 运行选项
    pub const CLEAR_EXISTING_ENTRIES: &str = "clear_existing_entries";
}
