// ==========================================
// 卡牌评级工坊排班系统 - 引擎层外部协作接口
// ==========================================
// 职责: 定义排班引擎依赖的数据来源/落库 trait，实现依赖倒置
// 说明: Engine 层定义 trait，Repository 层实现（SQLite），测试可替换为内存实现
// ==========================================

use crate::domain::{EmployeeProfile, ScheduleEntry, Stage, WorkItem};
use crate::repository::error::RepositoryResult;
use chrono::NaiveDate;
use std::sync::Arc;

/// 员工来源：某阶段可用（在职且持有对应角色）的员工
pub trait EmployeeSource {
    fn list_eligible_employees(&self, stage: Stage) -> RepositoryResult<Vec<EmployeeProfile>>;
}

/// 工单来源：某阶段待处理工单
///
/// 返回顺序应为 时效等级 → 提交日期，但引擎会再次稳定排序，不依赖此约定
pub trait WorkItemSource {
    fn list_pending_work_items(&self, stage: Stage) -> RepositoryResult<Vec<WorkItem>>;
}

/// 排班明细落库
pub trait ScheduleEntrySink {
    /// 清理某日已有明细（幂等），返回删除条数
    fn clear_schedule_entries_for_date(&self, plan_date: NaiveDate) -> RepositoryResult<usize>;

    /// 写入单条明细；失败不影响同批次其他工单
    fn create_schedule_entry(&self, entry: &ScheduleEntry) -> RepositoryResult<()>;
}

/// 排班编排所需的外部协作者集合
///
/// 将 3 个依赖合并为 1 个结构体参数，便于测试时整体替换
#[derive(Clone)]
pub struct PlanningPorts {
    pub employees: Arc<dyn EmployeeSource>,
    pub work_items: Arc<dyn WorkItemSource>,
    pub sink: Arc<dyn ScheduleEntrySink>,
}

impl PlanningPorts {
    pub fn new(
        employees: Arc<dyn EmployeeSource>,
        work_items: Arc<dyn WorkItemSource>,
        sink: Arc<dyn ScheduleEntrySink>,
    ) -> Self {
        Self {
            employees,
            work_items,
            sink,
        }
    }
}
