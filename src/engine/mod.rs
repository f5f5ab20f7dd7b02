// ==========================================
// 卡牌评级工坊排班系统 - 引擎层
// ==========================================
// 职责: 实现排班业务规则
// 红线: 引擎只通过 ports 访问数据, 不直接依赖 SQLite
// ==========================================

pub mod duration;
pub mod error;
pub mod orchestrator;
pub mod ports;
pub mod priority;
pub mod report;
pub mod stage_assignment;
pub mod time_slot;
pub mod workload;

// 重导出核心引擎
pub use duration::DurationRule;
pub use error::{PlanningError, PlanningResult};
pub use orchestrator::{PlanningOrchestrator, PlanningRunOptions};
pub use ports::{EmployeeSource, PlanningPorts, ScheduleEntrySink, WorkItemSource};
pub use priority::PriorityClassifier;
pub use report::{
    EmployeeWorkloadSummary, FailedItem, PlanningReport, SkipReason, SkippedItem, StageOutcome,
    StageReport,
};
pub use stage_assignment::{StageAssignment, StageAssignmentEngine};
pub use time_slot::TimeSlotPlanner;
pub use workload::{WorkloadState, WorkloadTracker};
