// ==========================================
// 内存版外部协作者 - 用于集成测试
// ==========================================

use card_grading_aps::domain::{EmployeeProfile, ScheduleEntry, Stage, WorkItem};
use card_grading_aps::engine::{EmployeeSource, PlanningPorts, ScheduleEntrySink, WorkItemSource};
use card_grading_aps::repository::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

/// 内存工坊: 员工按阶段登记, 工单按阶段排队, 明细写入内存
#[derive(Default)]
pub struct MemoryWorkshop {
    employees: HashMap<Stage, Vec<EmployeeProfile>>,
    items: HashMap<Stage, Vec<WorkItem>>,
    failing_sources: HashSet<Stage>,
    failing_items: HashSet<String>,
    entries: Mutex<Vec<ScheduleEntry>>,
}

impl MemoryWorkshop {
    pub fn new() -> Self {
        Self::default()
    }

    /// 员工登记到若干阶段
    pub fn with_employee(mut self, employee: EmployeeProfile, stages: &[Stage]) -> Self {
        for stage in stages {
            self.employees.entry(*stage).or_default().push(employee.clone());
        }
        self
    }

    /// 工单按自身阶段入队
    pub fn with_item(mut self, item: WorkItem) -> Self {
        self.items.entry(item.stage).or_default().push(item);
        self
    }

    /// 某阶段读取工单时报错
    pub fn with_failing_source(mut self, stage: Stage) -> Self {
        self.failing_sources.insert(stage);
        self
    }

    /// 某工单写入明细时报错
    pub fn with_failing_item(mut self, work_item_id: &str) -> Self {
        self.failing_items.insert(work_item_id.to_string());
        self
    }

    /// 预置已有明细
    pub fn with_existing_entry(self, entry: ScheduleEntry) -> Self {
        self.entries.lock().unwrap().push(entry);
        self
    }

    pub fn entries(&self) -> Vec<ScheduleEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn entries_for(&self, stage: Stage) -> Vec<ScheduleEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.stage == stage)
            .collect()
    }

    pub fn into_ports(self) -> (Arc<Self>, PlanningPorts) {
        let shared = Arc::new(self);
        let ports = PlanningPorts::new(shared.clone(), shared.clone(), shared.clone());
        (shared, ports)
    }
}

impl EmployeeSource for MemoryWorkshop {
    fn list_eligible_employees(&self, stage: Stage) -> RepositoryResult<Vec<EmployeeProfile>> {
        Ok(self
            .employees
            .get(&stage)
            .map(|list| list.iter().filter(|e| e.is_active).cloned().collect())
            .unwrap_or_default())
    }
}

impl WorkItemSource for MemoryWorkshop {
    fn list_pending_work_items(&self, stage: Stage) -> RepositoryResult<Vec<WorkItem>> {
        if self.failing_sources.contains(&stage) {
            return Err(RepositoryError::DatabaseQueryError(format!(
                "work item source unavailable for {}",
                stage
            )));
        }
        Ok(self.items.get(&stage).cloned().unwrap_or_default())
    }
}

impl ScheduleEntrySink for MemoryWorkshop {
    fn clear_schedule_entries_for_date(&self, plan_date: NaiveDate) -> RepositoryResult<usize> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|e| e.plan_date != plan_date);
        Ok(before - entries.len())
    }

    fn create_schedule_entry(&self, entry: &ScheduleEntry) -> RepositoryResult<()> {
        if self.failing_items.contains(&entry.work_item_id) {
            return Err(RepositoryError::DatabaseQueryError("disk full".to_string()));
        }
        self.entries.lock().unwrap().push(entry.clone());
        Ok(())
    }
}
