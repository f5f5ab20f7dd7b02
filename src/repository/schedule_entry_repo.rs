// ==========================================
// 卡牌评级工坊排班系统 - 排班明细仓储
// ==========================================
// 红线: 明细只是排班结果快照, 不反向修改工单
// ==========================================

use crate::domain::{DelayCode, ScheduleEntry, Stage};
use crate::engine::ports::ScheduleEntrySink;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
const DATE_FMT: &str = "%Y-%m-%d";

struct ScheduleEntryRow {
    entry_id: String,
    work_item_id: String,
    employee_id: String,
    plan_date: String,
    start_at: String,
    end_at: String,
    duration_minutes: i64,
    stage: String,
    delay_code: String,
    card_count: u32,
}

fn field_error(field: &str, entry_id: &str, message: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::FieldValueError {
        field: field.to_string(),
        message: format!("entry_id={}, {}", entry_id, message),
    }
}

impl ScheduleEntryRow {
    fn into_domain(self) -> RepositoryResult<ScheduleEntry> {
        let id = self.entry_id.as_str();
        let plan_date = NaiveDate::parse_from_str(&self.plan_date, DATE_FMT)
            .map_err(|e| field_error("plan_date", id, e))?;
        let start_at = NaiveDateTime::parse_from_str(&self.start_at, DATETIME_FMT)
            .map_err(|e| field_error("start_at", id, e))?;
        let end_at = NaiveDateTime::parse_from_str(&self.end_at, DATETIME_FMT)
            .map_err(|e| field_error("end_at", id, e))?;
        let stage = Stage::from_str(&self.stage)
            .ok_or_else(|| field_error("stage", id, format!("未知阶段 {}", self.stage)))?;

        Ok(ScheduleEntry {
            plan_date,
            start_at,
            end_at,
            stage,
            delay_code: DelayCode::from_code(Some(self.delay_code.as_str())),
            duration_minutes: self.duration_minutes,
            card_count: self.card_count,
            work_item_id: self.work_item_id,
            employee_id: self.employee_id,
            entry_id: self.entry_id,
        })
    }
}

// ==========================================
// ScheduleEntryRepository - 排班明细仓储
// ==========================================
pub struct ScheduleEntryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ScheduleEntryRepository {
    /// 从已有连接创建仓储实例
    pub fn new(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    /// 获取数据库连接
    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 插入单条明细
    pub fn insert(&self, entry: &ScheduleEntry) -> RepositoryResult<()> {
        let conn = self.get_conn()?;

        conn.execute(
            r#"
            INSERT INTO schedule_entry (
                entry_id, work_item_id, employee_id, plan_date, start_at, end_at,
                duration_minutes, stage, delay_code, card_count
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
            params![
                entry.entry_id,
                entry.work_item_id,
                entry.employee_id,
                entry.plan_date.format(DATE_FMT).to_string(),
                entry.start_at.format(DATETIME_FMT).to_string(),
                entry.end_at.format(DATETIME_FMT).to_string(),
                entry.duration_minutes,
                entry.stage.to_db_str(),
                entry.delay_code.as_code(),
                entry.card_count,
            ],
        )?;

        Ok(())
    }

    /// 删除某排班日期的全部明细
    ///
    /// # 返回
    /// 删除条数（无数据时为 0，可重复调用）
    pub fn delete_by_plan_date(&self, plan_date: NaiveDate) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let affected = conn.execute(
            "DELETE FROM schedule_entry WHERE plan_date = ?1",
            params![plan_date.format(DATE_FMT).to_string()],
        )?;
        Ok(affected)
    }

    /// 查询某排班日期的全部明细（按员工、开始时间排序）
    pub fn find_by_plan_date(&self, plan_date: NaiveDate) -> RepositoryResult<Vec<ScheduleEntry>> {
        let rows = {
            let conn = self.get_conn()?;
            let mut stmt = conn.prepare(
                r#"
                SELECT entry_id, work_item_id, employee_id, plan_date, start_at, end_at,
                       duration_minutes, stage, delay_code, card_count
                FROM schedule_entry
                WHERE plan_date = ?1
                ORDER BY employee_id, start_at
                "#,
            )?;

            let rows = stmt
                .query_map(params![plan_date.format(DATE_FMT).to_string()], |row| {
                    Ok(ScheduleEntryRow {
                        entry_id: row.get(0)?,
                        work_item_id: row.get(1)?,
                        employee_id: row.get(2)?,
                        plan_date: row.get(3)?,
                        start_at: row.get(4)?,
                        end_at: row.get(5)?,
                        duration_minutes: row.get(6)?,
                        stage: row.get(7)?,
                        delay_code: row.get(8)?,
                        card_count: row.get(9)?,
                    })
                })?
                .collect::<SqliteResult<Vec<ScheduleEntryRow>>>()?;
            rows
        };

        rows.into_iter().map(ScheduleEntryRow::into_domain).collect()
    }
}

impl ScheduleEntrySink for ScheduleEntryRepository {
    fn clear_schedule_entries_for_date(&self, plan_date: NaiveDate) -> RepositoryResult<usize> {
        self.delete_by_plan_date(plan_date)
    }

    fn create_schedule_entry(&self, entry: &ScheduleEntry) -> RepositoryResult<()> {
        self.insert(entry)
    }
}
