// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use card_grading_aps::domain::{EmployeeProfile, Stage, WorkItem};
use chrono::{NaiveDate, NaiveDateTime};

/// 默认排班日期
pub fn plan_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

/// 排班日期当天的时刻
pub fn at(h: u32, m: u32) -> NaiveDateTime {
    plan_date().and_hms_opt(h, m, 0).unwrap()
}

// ==========================================
// EmployeeProfile 构建器
// ==========================================

pub struct EmployeeBuilder {
    employee_id: String,
    display_name: String,
    work_hours_per_day: u32,
    is_active: bool,
}

impl EmployeeBuilder {
    pub fn new(employee_id: &str) -> Self {
        Self {
            employee_id: employee_id.to_string(),
            display_name: format!("员工 {}", employee_id),
            work_hours_per_day: 8,
            is_active: true,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.display_name = name.to_string();
        self
    }

    pub fn hours(mut self, hours: u32) -> Self {
        self.work_hours_per_day = hours;
        self
    }

    pub fn inactive(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn build(self) -> EmployeeProfile {
        EmployeeProfile {
            employee_id: self.employee_id,
            display_name: self.display_name,
            work_hours_per_day: self.work_hours_per_day,
            is_active: self.is_active,
        }
    }
}

// ==========================================
// WorkItem 构建器
// ==========================================

pub struct WorkItemBuilder {
    work_item_id: String,
    order_label: Option<String>,
    card_count: Option<u32>,
    delay_code: Option<String>,
    stage: Stage,
    submitted_on: NaiveDate,
}

impl WorkItemBuilder {
    pub fn new(work_item_id: &str, stage: Stage) -> Self {
        Self {
            work_item_id: work_item_id.to_string(),
            order_label: None,
            card_count: Some(1),
            delay_code: None,
            stage,
            submitted_on: plan_date(),
        }
    }

    pub fn label(mut self, label: &str) -> Self {
        self.order_label = Some(label.to_string());
        self
    }

    pub fn cards(mut self, count: u32) -> Self {
        self.card_count = Some(count);
        self
    }

    pub fn no_cards(mut self) -> Self {
        self.card_count = None;
        self
    }

    pub fn delay(mut self, code: &str) -> Self {
        self.delay_code = Some(code.to_string());
        self
    }

    pub fn submitted_on(mut self, date: NaiveDate) -> Self {
        self.submitted_on = date;
        self
    }

    pub fn build(self) -> WorkItem {
        WorkItem {
            work_item_id: self.work_item_id,
            order_label: self.order_label,
            card_count: self.card_count,
            delay_code: self.delay_code,
            stage: self.stage,
            submitted_on: self.submitted_on,
        }
    }
}
