// ==========================================
// 卡牌评级工坊排班系统 - 员工领域模型
// ==========================================

use serde::{Deserialize, Serialize};

/// 员工档案 (排班期间只读)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeProfile {
    pub employee_id: String,
    pub display_name: String,
    /// 每日工作小时数
    pub work_hours_per_day: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl EmployeeProfile {
    /// 每日产能（分钟）
    pub fn daily_capacity_minutes(&self) -> i64 {
        i64::from(self.work_hours_per_day) * 60
    }
}
