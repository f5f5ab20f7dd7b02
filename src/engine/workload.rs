// ==========================================
// 卡牌评级工坊排班系统 - 员工负载跟踪
// ==========================================
// 职责: 单次阶段排班内, 每名员工的累计分钟数与最后结束时间
// 用途: 贪心分配的负载键 (最少负载优先)
// 红线: 不设产能上限, 负载率可超过 100%（仅作展示）
// 红线: 仅在一次阶段排班内存活, 不落库
// ==========================================

use crate::domain::EmployeeProfile;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

// ==========================================
// WorkloadState - 单员工负载
// ==========================================
#[derive(Debug, Clone, Serialize)]
pub struct WorkloadState {
    pub employee: EmployeeProfile,
    pub assigned_minutes: i64,               // 累计已分配分钟
    pub last_end_at: Option<NaiveDateTime>,  // 最后一项任务的结束时间
    pub active_day: NaiveDate,               // 当前排到的日期（只前进）
    pub assigned_count: usize,               // 已分配工单数
}

impl WorkloadState {
    /// 以排班日期创建空负载
    pub fn new(employee: EmployeeProfile, plan_date: NaiveDate) -> Self {
        Self {
            employee,
            assigned_minutes: 0,
            last_end_at: None,
            active_day: plan_date,
            assigned_count: 0,
        }
    }

    /// 记录一次成功分配
    pub fn record_assignment(&mut self, duration_minutes: i64, start: NaiveDateTime, end: NaiveDateTime) {
        self.assigned_minutes = self.assigned_minutes.saturating_add(duration_minutes);
        self.last_end_at = Some(end);
        self.assigned_count += 1;
        if start.date() > self.active_day {
            self.active_day = start.date();
        }
    }

    /// 负载率（%）= 累计分钟 / (每日工时 × 60) × 100
    pub fn workload_percentage(&self) -> f64 {
        let capacity = self.employee.daily_capacity_minutes();
        if capacity <= 0 {
            return 0.0;
        }
        self.assigned_minutes as f64 / capacity as f64 * 100.0
    }

    /// 是否超过单日产能
    pub fn is_saturated(&self) -> bool {
        self.workload_percentage() > 100.0
    }
}

// ==========================================
// WorkloadTracker - 阶段负载池
// ==========================================
// 保持员工输入顺序, 同负载时先入者优先
#[derive(Debug, Clone, Default)]
pub struct WorkloadTracker {
    states: Vec<WorkloadState>,
}

impl WorkloadTracker {
    /// 为一组员工创建负载池
    pub fn new(employees: Vec<EmployeeProfile>, plan_date: NaiveDate) -> Self {
        Self {
            states: employees
                .into_iter()
                .map(|e| WorkloadState::new(e, plan_date))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// 当前负载最小的员工下标
    ///
    /// 同负载取池中靠前者（确定性）
    pub fn least_loaded(&self) -> Option<usize> {
        self.states
            .iter()
            .enumerate()
            .min_by_key(|(idx, s)| (s.assigned_minutes, *idx))
            .map(|(idx, _)| idx)
    }

    /// 当前负载最小的员工（可修改, 供分配后记账）
    pub fn least_loaded_mut(&mut self) -> Option<&mut WorkloadState> {
        let idx = self.least_loaded()?;
        self.states.get_mut(idx)
    }

    /// 负载快照
    pub fn states(&self) -> &[WorkloadState] {
        &self.states
    }
}
