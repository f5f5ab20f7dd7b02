// ==========================================
// 卡牌评级工坊排班系统 - 员工数据仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::{EmployeeProfile, Stage};
use crate::engine::ports::EmployeeSource;
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection, Result as SqliteResult};
use std::sync::{Arc, Mutex};

// ==========================================
// EmployeeRepository - 员工仓储
// ==========================================

/// 员工仓储
/// 职责: 管理 employee / employee_role 表
pub struct EmployeeRepository {
    conn: Arc<Mutex<Connection>>,
}

impl EmployeeRepository {
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

    /// 插入或更新员工及其角色
    ///
    /// # 参数
    /// - profile: 员工档案
    /// - roles: 角色列表（整体替换）
    pub fn upsert(&self, profile: &EmployeeProfile, roles: &[&str]) -> RepositoryResult<()> {
        let mut conn = self.get_conn()?;
        let tx = conn.transaction()?;

        tx.execute(
            r#"
            INSERT OR REPLACE INTO employee (employee_id, display_name, work_hours_per_day, is_active)
            VALUES (?1, ?2, ?3, ?4)
            "#,
            params![
                profile.employee_id,
                profile.display_name,
                profile.work_hours_per_day,
                if profile.is_active { 1 } else { 0 },
            ],
        )?;

        tx.execute(
            "DELETE FROM employee_role WHERE employee_id = ?1",
            params![profile.employee_id],
        )?;
        for role in roles {
            tx.execute(
                "INSERT INTO employee_role (employee_id, role) VALUES (?1, ?2)",
                params![profile.employee_id, role],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// 查询持有指定角色的在职员工
    ///
    /// # 返回
    /// 按 employee_id 升序（保证同负载时的选择稳定）
    pub fn list_active_by_role(&self, role: &str) -> RepositoryResult<Vec<EmployeeProfile>> {
        let conn = self.get_conn()?;

        let mut stmt = conn.prepare(
            r#"
            SELECT e.employee_id, e.display_name, e.work_hours_per_day, e.is_active
            FROM employee e
            JOIN employee_role r ON r.employee_id = e.employee_id
            WHERE r.role = ?1 AND e.is_active = 1
            ORDER BY e.employee_id
            "#,
        )?;

        let employees = stmt
            .query_map(params![role], |row| {
                Ok(EmployeeProfile {
                    employee_id: row.get(0)?,
                    display_name: row.get(1)?,
                    work_hours_per_day: row.get(2)?,
                    is_active: row.get::<_, i64>(3)? != 0,
                })
            })?
            .collect::<SqliteResult<Vec<EmployeeProfile>>>()?;

        Ok(employees)
    }
}

impl EmployeeSource for EmployeeRepository {
    fn list_eligible_employees(&self, stage: Stage) -> RepositoryResult<Vec<EmployeeProfile>> {
        self.list_active_by_role(stage.role())
    }
}
